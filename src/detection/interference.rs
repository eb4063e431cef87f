use super::fov::FieldOfView;
use crate::constants::{MU_EARTH, R_EARTH};
use crate::models::{ObserverLocation, SkySample, StateVector, Trajectory};
use std::ops::AddAssign;
use tracing::trace;

/// Work dropped while answering a query. Skips never flip a verdict by themselves,
/// but a verdict with skips is less certain than one without.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipSummary {
    /// Objects whose orbit or elements could not be propagated.
    pub objects: usize,
    /// Individual samples with an undefined sky position.
    pub samples: usize,
}

impl SkipSummary {
    pub fn is_empty(&self) -> bool {
        self.objects == 0 && self.samples == 0
    }
}

impl AddAssign for SkipSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.objects += rhs.objects;
        self.samples += rhs.samples;
    }
}

/// The first sample of an object found inside the field of view.
#[derive(Debug, Clone, PartialEq)]
pub struct Intrusion {
    pub object: String,
    pub sample: SkySample,
}

/// Answer to "does anything cross this field of view during this exposure".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationVerdict {
    pub intruder: Option<Intrusion>,
    /// Objects whose trajectories were examined before the answer was known.
    pub checked: usize,
    pub skipped: SkipSummary,
}

impl ObservationVerdict {
    pub fn interference(&self) -> bool {
        self.intruder.is_some()
    }
}

/// Result of scanning one raw trajectory.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scan {
    pub hit: Option<SkySample>,
    pub skipped_samples: usize,
}

/// Transforms each sample into sky coordinates and stops at the first one inside `fov`.
///
/// Samples whose transform is undefined are counted and ignored. Sample order only
/// affects which hit is reported and how much work is done, never whether one exists.
pub fn scan(states: &[StateVector], observer: &ObserverLocation, fov: &FieldOfView) -> Scan {
    let mut skipped_samples = 0;
    for state in states {
        match SkySample::from_eci(&state.position, observer, state.epoch) {
            Ok(sample) if fov.contains(&sample) => {
                return Scan {
                    hit: Some(sample),
                    skipped_samples,
                }
            }
            Ok(_) => {}
            Err(e) => {
                trace!(error = %e, "sample skipped");
                skipped_samples += 1;
            }
        }
    }
    Scan {
        hit: None,
        skipped_samples,
    }
}

/// True if any sample of the trajectory lies inside the field of view.
pub fn intersects(states: &[StateVector], observer: &ObserverLocation, fov: &FieldOfView) -> bool {
    scan(states, observer, fov).hit.is_some()
}

/// First already-transformed sample inside the field of view.
pub fn first_intrusion<'a>(trajectory: &'a Trajectory, fov: &FieldOfView) -> Option<&'a SkySample> {
    trajectory.samples().iter().find(|s| fov.contains(s))
}

/// Upper bound on the apparent angular rate of a circular orbit at `altitude_km`,
/// reached at zenith for an observer directly underneath [deg/s].
pub fn peak_angular_rate(altitude_km: f64) -> f64 {
    let speed = (MU_EARTH / (R_EARTH + altitude_km)).sqrt();
    (speed / altitude_km).to_degrees()
}

/// Largest cadence that still puts at least one sample inside a box of `radius_deg`
/// for a satellite crossing it at `angular_rate_deg_s`.
pub fn recommended_cadence(radius_deg: f64, angular_rate_deg_s: f64) -> f64 {
    2.0 * radius_deg / angular_rate_deg_s
}
