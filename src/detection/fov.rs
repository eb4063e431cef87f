use crate::constants::DEFAULT_CADENCE_S;
use crate::errors::InvalidParameterError;
use crate::models::SkySample;
use crate::physics::sample_epochs;
use hifitime::{Duration, Epoch};
use std::ops::RangeInclusive;

/// Where the instrument points, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FovCenter {
    Equatorial { right_ascension: f64, declination: f64 },
    Horizontal { azimuth: f64, elevation: f64 },
}

/// Square angular window around a pointing.
///
/// Membership is a bounding box in angle space: both coordinates must lie within
/// `radius` of the centre, bounds inclusive. This is not a great-circle test. It
/// over-covers the corners, stretches near the poles, and does not wrap across
/// the 0°/360° seam, so a target at RA 359° is not near a centre at RA 1°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfView {
    center: FovCenter,
    radius_deg: f64,
}

impl FieldOfView {
    pub fn new(center: FovCenter, radius_deg: f64) -> Result<Self, InvalidParameterError> {
        if !radius_deg.is_finite() || radius_deg < 0.0 {
            return Err(InvalidParameterError::new(
                "fov",
                format!("radius must be a non-negative angle, got {radius_deg}"),
            ));
        }
        let (a, b) = match center {
            FovCenter::Equatorial {
                right_ascension,
                declination,
            } => (right_ascension, declination),
            FovCenter::Horizontal { azimuth, elevation } => (azimuth, elevation),
        };
        if !a.is_finite() || !b.is_finite() {
            return Err(InvalidParameterError::new("fov", "centre must be finite"));
        }
        Ok(Self { center, radius_deg })
    }

    pub fn equatorial(ra: f64, dec: f64, radius_deg: f64) -> Result<Self, InvalidParameterError> {
        Self::new(
            FovCenter::Equatorial {
                right_ascension: ra,
                declination: dec,
            },
            radius_deg,
        )
    }

    pub fn horizontal(
        azimuth: f64,
        elevation: f64,
        radius_deg: f64,
    ) -> Result<Self, InvalidParameterError> {
        Self::new(FovCenter::Horizontal { azimuth, elevation }, radius_deg)
    }

    pub fn center(&self) -> FovCenter {
        self.center
    }

    pub fn radius_deg(&self) -> f64 {
        self.radius_deg
    }

    pub fn contains(&self, sample: &SkySample) -> bool {
        match self.center {
            FovCenter::Equatorial {
                right_ascension,
                declination,
            } => {
                self.axis(right_ascension).contains(&sample.right_ascension)
                    && self.axis(declination).contains(&sample.declination)
            }
            FovCenter::Horizontal { azimuth, elevation } => {
                self.axis(azimuth).contains(&sample.azimuth)
                    && self.axis(elevation).contains(&sample.elevation)
            }
        }
    }

    /// The az/el box of a horizontal pointing, used to prune catalog passes.
    pub fn az_el_window(&self) -> Option<AzElWindow> {
        match self.center {
            FovCenter::Horizontal { azimuth, elevation } => Some(AzElWindow {
                azimuth: self.axis(azimuth),
                elevation: self.axis(elevation),
            }),
            FovCenter::Equatorial { .. } => None,
        }
    }

    fn axis(&self, center: f64) -> RangeInclusive<f64> {
        (center - self.radius_deg)..=(center + self.radius_deg)
    }
}

/// Inclusive azimuth and elevation ranges, degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct AzElWindow {
    pub azimuth: RangeInclusive<f64>,
    pub elevation: RangeInclusive<f64>,
}

impl AzElWindow {
    pub fn contains(&self, azimuth: f64, elevation: f64) -> bool {
        self.azimuth.contains(&azimuth) && self.elevation.contains(&elevation)
    }
}

/// A planned exposure: where, when, for how long, and how finely to sample it.
///
/// The cadence trades fidelity for cost. A transit that starts and ends between two
/// samples is missed; see [`super::interference::recommended_cadence`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationWindow {
    pub fov: FieldOfView,
    pub start: Epoch,
    pub duration_s: f64,
    pub cadence_s: f64,
}

impl ObservationWindow {
    pub fn new(
        fov: FieldOfView,
        start: Epoch,
        duration_s: f64,
    ) -> Result<Self, InvalidParameterError> {
        Self::with_cadence(fov, start, duration_s, DEFAULT_CADENCE_S)
    }

    /// Start given in Unix seconds, as observation requests arrive.
    pub fn from_unix(
        fov: FieldOfView,
        start_unix: f64,
        duration_s: f64,
    ) -> Result<Self, InvalidParameterError> {
        if !start_unix.is_finite() {
            return Err(InvalidParameterError::new("obs_time", "must be finite"));
        }
        Self::new(fov, Epoch::from_unix_seconds(start_unix), duration_s)
    }

    pub fn with_cadence(
        fov: FieldOfView,
        start: Epoch,
        duration_s: f64,
        cadence_s: f64,
    ) -> Result<Self, InvalidParameterError> {
        if !duration_s.is_finite() || duration_s < 0.0 {
            return Err(InvalidParameterError::new(
                "obs_len",
                format!("must be a non-negative number of seconds, got {duration_s}"),
            ));
        }
        if !cadence_s.is_finite() || cadence_s <= 0.0 {
            return Err(InvalidParameterError::new(
                "cadence",
                format!("must be a positive number of seconds, got {cadence_s}"),
            ));
        }
        Ok(Self {
            fov,
            start,
            duration_s,
            cadence_s,
        })
    }

    pub fn end(&self) -> Epoch {
        self.start + Duration::from_seconds(self.duration_s)
    }

    pub fn sample_epochs(&self) -> Vec<Epoch> {
        // Inputs were validated at construction
        sample_epochs(self.start, self.duration_s, self.cadence_s).unwrap_or_default()
    }
}
