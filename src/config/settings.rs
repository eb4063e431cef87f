use super::site::{Site, DEFAULT_SITES};
use crate::catalog::DEFAULT_CATALOG_URL;
use crate::constants::DEFAULT_CADENCE_S;
use crate::errors::{ConfigError, InvalidParameterError};
use crate::models::ObserverLocation;
use crate::prediction::{PassPredictor, SearchOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Run configuration. Every field has a default, so a TOML file only needs the
/// values it changes:
///
/// ```toml
/// forecast_days = 2.0
/// min_elevation_deg = 30.0
///
/// [sites.lapalma]
/// latitude_deg = 28.76
/// longitude_deg = 17.89
/// altitude_m = 2396.0
/// longitude_convention = "west"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog_url: String,
    /// Age after which the cached catalog is downloaded again [h].
    pub catalog_max_age_hours: i64,
    pub forecast_days: f64,
    pub min_duration_s: f64,
    pub min_elevation_deg: f64,
    pub cadence_s: f64,
    pub search_step_s: f64,
    pub max_pass_s: f64,
    /// Extra or overriding sites; the built-in table is always available.
    pub sites: BTreeMap<String, Site>,
}

impl Default for Settings {
    fn default() -> Self {
        let search = SearchOptions::default();
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_max_age_hours: 24,
            forecast_days: 4.0,
            min_duration_s: 1.0,
            min_elevation_deg: 25.0,
            cadence_s: DEFAULT_CADENCE_S,
            search_step_s: search.step_s,
            max_pass_s: search.max_pass_s,
            sites: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading settings");
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Settings from `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), InvalidParameterError> {
        let positive = [
            ("forecast_days", self.forecast_days),
            ("cadence_s", self.cadence_s),
            ("search_step_s", self.search_step_s),
            ("max_pass_s", self.max_pass_s),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(InvalidParameterError::new(name, format!("must be positive, got {value}")));
            }
        }
        if !self.min_duration_s.is_finite() || !self.min_elevation_deg.is_finite() {
            return Err(InvalidParameterError::new("thresholds", "must be finite"));
        }
        Ok(())
    }

    /// Looks a site up in the configured table, then in the built-in one.
    pub fn site(&self, name: &str) -> Result<ObserverLocation, ConfigError> {
        let site = self
            .sites
            .get(name)
            .or_else(|| DEFAULT_SITES.get(name))
            .ok_or_else(|| ConfigError::UnknownSite(name.to_string()))?;
        Ok(site.observer()?)
    }

    pub fn site_names(&self) -> Vec<String> {
        let mut names: Vec<String> = DEFAULT_SITES.keys().chain(self.sites.keys()).cloned().collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            step_s: self.search_step_s,
            max_pass_s: self.max_pass_s,
        }
    }

    pub fn predictor(&self) -> PassPredictor {
        PassPredictor::new(self.search_options())
            .with_thresholds(self.min_duration_s, self.min_elevation_deg)
            .with_cadence(self.cadence_s)
    }
}
