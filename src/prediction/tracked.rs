use super::pass::{PassSample, Visibility};
use crate::catalog::TleRecord;
use crate::coordinates::sun::{is_eclipsed, sun_position};
use crate::coordinates::to_topocentric;
use crate::constants::TWILIGHT_SUN_ELEVATION;
use crate::errors::PredictionError;
use crate::models::ObserverLocation;
use hifitime::Epoch;
use nalgebra as na;
use sgp4::{Constants, Elements};
use std::fmt;
use tracing::debug;

/// A catalog object with its SGP4 model initialised.
///
/// SGP4 positions are in TEME, which is used as ECI directly: the difference is far
/// below the resolution of a pass prediction.
pub struct TrackedObject {
    name: String,
    norad_id: u64,
    epoch: Epoch,
    constants: Constants,
}

impl fmt::Debug for TrackedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedObject")
            .field("name", &self.name)
            .field("norad_id", &self.norad_id)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl TrackedObject {
    pub fn from_tle(record: &TleRecord) -> Result<Self, PredictionError> {
        let malformed = |reason: String| PredictionError::MalformedTle {
            name: record.name.clone(),
            reason,
        };
        let elements = Elements::from_tle(
            Some(record.name.clone()),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )
        .map_err(|e| malformed(format!("{:?}", e)))?;
        let constants = Constants::from_elements(&elements).map_err(|e| malformed(format!("{:?}", e)))?;

        let datetime = elements.datetime.and_utc();
        let epoch = Epoch::from_unix_seconds(
            datetime.timestamp() as f64 + f64::from(datetime.timestamp_subsec_nanos()) * 1e-9,
        );
        debug!(name = %record.name, norad_id = elements.norad_id, %epoch, "tracking object");

        Ok(Self {
            name: record.name.clone(),
            norad_id: elements.norad_id,
            epoch,
            constants,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn norad_id(&self) -> u64 {
        self.norad_id
    }

    /// Epoch of the element set.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Inertial position [km].
    pub fn position_at(&self, epoch: Epoch) -> Result<na::Vector3<f64>, PredictionError> {
        let minutes = (epoch - self.epoch).to_seconds() / 60.0;
        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PredictionError::Propagation {
                name: self.name.clone(),
                reason: format!("{:?}", e),
            })?;
        Ok(na::Vector3::from(prediction.position))
    }

    pub fn elevation(&self, observer: &ObserverLocation, epoch: Epoch) -> Result<f64, PredictionError> {
        let position = self.position_at(epoch)?;
        Ok(to_topocentric(&position, observer, &epoch)?.elevation)
    }

    /// Full look angles and visibility flag at one instant.
    pub fn look(&self, observer: &ObserverLocation, epoch: Epoch) -> Result<PassSample, PredictionError> {
        let position = self.position_at(epoch)?;
        let aer = to_topocentric(&position, observer, &epoch)?;
        let visibility = visibility(&position, observer, epoch)?;
        Ok(PassSample {
            epoch,
            azimuth: aer.azimuth,
            elevation: aer.elevation,
            range_km: aer.range_km,
            visibility,
            position,
        })
    }
}

/// Optical visibility of an object at `position` from `observer`.
pub fn visibility(
    position: &na::Vector3<f64>,
    observer: &ObserverLocation,
    epoch: Epoch,
) -> Result<Visibility, PredictionError> {
    let sun = sun_position(&epoch);
    if is_eclipsed(position, &sun) {
        return Ok(Visibility::Eclipsed);
    }
    let sun_elevation = to_topocentric(&sun, observer, &epoch)?.elevation;
    if sun_elevation <= TWILIGHT_SUN_ELEVATION {
        Ok(Visibility::Visible)
    } else {
        Ok(Visibility::Daylight)
    }
}
