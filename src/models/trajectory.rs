use crate::coordinates::{to_equatorial, to_topocentric, Aer};
use crate::errors::GeometryError;
use crate::models::{ObserverLocation, StateVector};
use hifitime::Epoch;
use nalgebra as na;
use tracing::debug;

/// One trajectory sample in observer-relative sky coordinates, all angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkySample {
    pub epoch: Epoch,
    pub azimuth: f64,
    pub elevation: f64,
    pub range_km: f64,
    pub right_ascension: f64,
    pub declination: f64,
}

impl SkySample {
    /// Runs the full pipeline for an inertial position: ECI → az/el/range → RA/Dec.
    pub fn from_eci(
        position: &na::Vector3<f64>,
        observer: &ObserverLocation,
        epoch: Epoch,
    ) -> Result<Self, GeometryError> {
        let aer = to_topocentric(position, observer, &epoch)?;
        Self::from_horizontal(&aer, observer, epoch)
    }

    pub fn from_horizontal(
        aer: &Aer,
        observer: &ObserverLocation,
        epoch: Epoch,
    ) -> Result<Self, GeometryError> {
        let radec = to_equatorial(aer.azimuth, aer.elevation, observer, &epoch)?;
        Ok(Self {
            epoch,
            azimuth: aer.azimuth,
            elevation: aer.elevation,
            range_km: aer.range_km,
            right_ascension: radec.right_ascension,
            declination: radec.declination,
        })
    }
}

/// Ordered sky track of one object as seen by one observer.
///
/// Both producers feed this type: the analytic constellation sampler (via
/// [`Trajectory::from_states`]) and catalog passes (via `Pass::trajectory`).
/// Samples whose transform is undefined are dropped and counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<SkySample>,
    skipped: usize,
}

impl Trajectory {
    pub fn new(samples: Vec<SkySample>, skipped: usize) -> Self {
        Self { samples, skipped }
    }

    pub fn from_states(states: &[StateVector], observer: &ObserverLocation) -> Self {
        let mut trajectory = Self::default();
        for state in states {
            trajectory.push(SkySample::from_eci(&state.position, observer, state.epoch));
        }
        trajectory
    }

    /// Appends a transformed sample, or counts it as skipped if the transform failed.
    pub fn push(&mut self, sample: Result<SkySample, GeometryError>) {
        match sample {
            Ok(sample) => self.samples.push(sample),
            Err(e) => {
                debug!(error = %e, "dropping trajectory sample");
                self.skipped += 1;
            }
        }
    }

    pub fn samples(&self) -> &[SkySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples dropped because their geometry was undefined.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
