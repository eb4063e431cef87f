use crate::detection::{scan, Intrusion, ObservationVerdict, ObservationWindow};
use crate::errors::{Error, InvalidParameterError};
use crate::models::{ObserverLocation, OrbitalElements, Satellite, SatelliteId};
use crate::physics::TwoBodyPropagator;
use hifitime::Epoch;
use tracing::{debug, info, warn};

/// Reference epoch of freshly built shells: J2000, 2000-01-01 12:00 UTC.
pub fn j2000() -> Epoch {
    Epoch::from_gregorian_utc_at_noon(2000, 1, 1)
}

/// Knobs that are not part of the shell geometry.
#[derive(Debug, Clone, Copy)]
pub struct ConstellationBuilder {
    planes: usize,
    sats_per_plane: usize,
    altitude_km: f64,
    inclination_deg: f64,
    reference_epoch: Epoch,
    propagator: TwoBodyPropagator,
}

impl ConstellationBuilder {
    pub fn new(planes: usize, sats_per_plane: usize, altitude_km: f64, inclination_deg: f64) -> Self {
        Self {
            planes,
            sats_per_plane,
            altitude_km,
            inclination_deg,
            reference_epoch: j2000(),
            propagator: TwoBodyPropagator::default(),
        }
    }

    pub fn reference_epoch(mut self, epoch: Epoch) -> Self {
        self.reference_epoch = epoch;
        self
    }

    pub fn propagator(mut self, propagator: TwoBodyPropagator) -> Self {
        self.propagator = propagator;
        self
    }

    pub fn build(self) -> Result<Constellation, Error> {
        if self.planes == 0 {
            return Err(InvalidParameterError::new("planes", "must be at least 1").into());
        }
        if self.sats_per_plane == 0 {
            return Err(InvalidParameterError::new("sats_per_plane", "must be at least 1").into());
        }
        if !self.altitude_km.is_finite() || self.altitude_km <= 0.0 {
            return Err(InvalidParameterError::new(
                "altitude",
                format!("must be a positive number of km, got {}", self.altitude_km),
            )
            .into());
        }
        if !self.inclination_deg.is_finite() {
            return Err(InvalidParameterError::new("inclination", "must be finite").into());
        }

        let mut satellites = Vec::with_capacity(self.planes * self.sats_per_plane);
        for plane in 0..self.planes {
            let raan = plane as f64 * 360.0 / self.planes as f64;
            for slot in 0..self.sats_per_plane {
                let arglat = slot as f64 * 360.0 / self.sats_per_plane as f64;
                let elements =
                    OrbitalElements::circular(self.altitude_km, self.inclination_deg, raan, arglat)?;
                let state = self.propagator.initial_state(&elements, self.reference_epoch)?;
                satellites.push(Satellite::new(
                    SatelliteId { plane, slot },
                    elements,
                    self.reference_epoch,
                    state,
                ));
            }
        }

        info!(
            planes = self.planes,
            sats_per_plane = self.sats_per_plane,
            altitude_km = self.altitude_km,
            inclination_deg = self.inclination_deg,
            "built constellation shell"
        );
        Ok(Constellation {
            planes: self.planes,
            sats_per_plane: self.sats_per_plane,
            satellites,
            propagator: self.propagator,
        })
    }
}

/// A single circular shell: `planes` evenly spaced in RAAN, each holding
/// `sats_per_plane` satellites evenly spaced in argument of latitude.
///
/// Every plane starts its first satellite at the ascending node; there is no
/// interplane phasing offset.
#[derive(Debug, Clone)]
pub struct Constellation {
    planes: usize,
    sats_per_plane: usize,
    satellites: Vec<Satellite>,
    propagator: TwoBodyPropagator,
}

impl Constellation {
    pub fn build(
        planes: usize,
        sats_per_plane: usize,
        altitude_km: f64,
        inclination_deg: f64,
    ) -> Result<Self, Error> {
        ConstellationBuilder::new(planes, sats_per_plane, altitude_km, inclination_deg).build()
    }

    pub fn planes(&self) -> usize {
        self.planes
    }

    pub fn sats_per_plane(&self) -> usize {
        self.sats_per_plane
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn get(&self, plane: usize, slot: usize) -> Option<&Satellite> {
        if plane >= self.planes || slot >= self.sats_per_plane {
            return None;
        }
        self.satellites.get(plane * self.sats_per_plane + slot)
    }

    /// Plane-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Satellite> {
        self.satellites.iter()
    }

    /// Moves every satellite's current state to `target`. Satellites whose state
    /// cannot be computed keep their previous state and are returned by id.
    pub fn propagate_to(&mut self, target: Epoch) -> Vec<SatelliteId> {
        let mut failed = Vec::new();
        for satellite in &mut self.satellites {
            match self.propagator.propagate(satellite, target) {
                Ok(moved) => *satellite = moved,
                Err(e) => {
                    warn!(satellite = %satellite.id(), error = %e, "propagation failed");
                    failed.push(satellite.id());
                }
            }
        }
        failed
    }

    /// Does any satellite of the shell cross the field of view during the exposure?
    ///
    /// Propagates the whole shell to the window start, then samples each satellite
    /// at the window cadence and stops at the first sample inside the field of view.
    /// Satellites or samples that cannot be computed are skipped and counted.
    pub fn check_observation(
        &mut self,
        window: &ObservationWindow,
        observer: &ObserverLocation,
    ) -> Result<ObservationVerdict, Error> {
        let failed = self.propagate_to(window.start);
        let mut verdict = ObservationVerdict::default();
        verdict.skipped.objects = failed.len();

        for satellite in &self.satellites {
            if failed.contains(&satellite.id()) {
                continue;
            }
            let states = match self.propagator.sample(
                satellite,
                window.start,
                window.duration_s,
                window.cadence_s,
            ) {
                Ok(states) => states,
                Err(e) => {
                    warn!(satellite = %satellite.id(), error = %e, "sampling failed");
                    verdict.skipped.objects += 1;
                    continue;
                }
            };

            verdict.checked += 1;
            let result = scan(&states, observer, &window.fov);
            verdict.skipped.samples += result.skipped_samples;
            if let Some(sample) = result.hit {
                debug!(satellite = %satellite.id(), azimuth = sample.azimuth, elevation = sample.elevation, "field of view crossed");
                verdict.intruder = Some(Intrusion {
                    object: satellite.id().to_string(),
                    sample,
                });
                break;
            }
        }

        if !verdict.skipped.is_empty() {
            warn!(
                objects = verdict.skipped.objects,
                samples = verdict.skipped.samples,
                "observation check skipped work"
            );
        }
        info!(
            interference = verdict.interference(),
            checked = verdict.checked,
            "observation checked"
        );
        Ok(verdict)
    }
}
