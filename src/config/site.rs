use crate::errors::InvalidParameterError;
use crate::models::ObserverLocation;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sign convention of a configured longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LongitudeConvention {
    #[default]
    East,
    West,
}

/// A named telescope site as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
    #[serde(default)]
    pub longitude_convention: LongitudeConvention,
}

impl Site {
    /// Resolves the configured convention to an east-positive observer.
    pub fn observer(&self) -> Result<ObserverLocation, InvalidParameterError> {
        match self.longitude_convention {
            LongitudeConvention::East => {
                ObserverLocation::new(self.latitude_deg, self.longitude_deg, self.altitude_m)
            }
            LongitudeConvention::West => {
                ObserverLocation::from_west_longitude(self.latitude_deg, self.longitude_deg, self.altitude_m)
            }
        }
    }
}

lazy_static! {
    /// Sites known without any configuration file.
    pub static ref DEFAULT_SITES: BTreeMap<String, Site> = {
        let mut sites = BTreeMap::new();
        // Cerro Tololo Inter-American Observatory
        sites.insert(
            "ctio".to_string(),
            Site {
                latitude_deg: -30.169,
                longitude_deg: 70.804,
                altitude_m: 2200.0,
                longitude_convention: LongitudeConvention::West,
            },
        );
        sites
    };
}
