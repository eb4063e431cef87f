use super::filter::{filter_valid, obstruction, prune_visible};
use super::pass::Pass;
use super::tracked::TrackedObject;
use super::transits::{predict_transits, CancellationToken, SearchOptions};
use crate::catalog::TleRecord;
use crate::constants::DEFAULT_CADENCE_S;
use crate::detection::{first_intrusion, FieldOfView, Intrusion, ObservationVerdict, ObservationWindow, SkipSummary};
use crate::errors::{Error, InvalidParameterError, PredictionError};
use crate::models::ObserverLocation;
use hifitime::{Duration, Epoch};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A catalog object left out of a batch, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedObject {
    pub name: String,
    pub error: PredictionError,
}

/// Passes of a whole catalog plus the objects that could not be processed.
#[derive(Debug, Clone, Default)]
pub struct Forecast {
    pub passes: Vec<Pass>,
    pub skipped: Vec<SkippedObject>,
}

impl Forecast {
    pub fn skip_summary(&self) -> SkipSummary {
        SkipSummary {
            objects: self.skipped.len(),
            samples: 0,
        }
    }
}

/// Runs transit searches over a catalog.
///
/// Each object is processed on its own. A malformed element set or a propagation
/// failure drops that object into [`Forecast::skipped`]; cancellation or an expired
/// deadline aborts the whole batch.
#[derive(Debug, Clone)]
pub struct PassPredictor {
    options: SearchOptions,
    min_duration_s: f64,
    min_elevation_deg: f64,
    cadence_s: f64,
}

impl Default for PassPredictor {
    fn default() -> Self {
        Self {
            options: SearchOptions::default(),
            min_duration_s: 20.0,
            min_elevation_deg: 25.0,
            cadence_s: DEFAULT_CADENCE_S,
        }
    }
}

impl PassPredictor {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Thresholds for [`PassPredictor::visible_passes`]: duration in seconds and peak
    /// elevation in degrees, both strict.
    pub fn with_thresholds(mut self, min_duration_s: f64, min_elevation_deg: f64) -> Self {
        self.min_duration_s = min_duration_s;
        self.min_elevation_deg = min_elevation_deg;
        self
    }

    pub fn with_cadence(mut self, cadence_s: f64) -> Self {
        self.cadence_s = cadence_s;
        self
    }

    /// Every pass of every object overlapping `[start, end]`.
    pub fn forecast(
        &self,
        catalog: &[TleRecord],
        observer: &ObserverLocation,
        start: Epoch,
        end: Epoch,
        token: &CancellationToken,
    ) -> Result<Forecast, PredictionError> {
        self.per_object(catalog, token, |object| {
            predict_transits(object, *observer, start, end, self.options, token.clone()).collect()
        })
    }

    /// Visible parts of all passes that satisfy the duration and elevation thresholds.
    pub fn visible_passes(
        &self,
        catalog: &[TleRecord],
        observer: &ObserverLocation,
        start: Epoch,
        end: Epoch,
        token: &CancellationToken,
    ) -> Result<Forecast, PredictionError> {
        self.per_object(catalog, token, |object| {
            let mut visible = Vec::new();
            for pass in predict_transits(object, *observer, start, end, self.options, token.clone()) {
                if let Some(pruned) = prune_visible(&pass?, None)? {
                    visible.push(pruned);
                }
            }
            filter_valid(visible, self.min_duration_s, self.min_elevation_deg)
        })
    }

    /// Catalog passes that are visible inside a horizontal field of view during an
    /// exposure of `obs_len_s` seconds starting at `obs_start`.
    pub fn satellite_obstruction(
        &self,
        catalog: &[TleRecord],
        observer: &ObserverLocation,
        fov: &FieldOfView,
        obs_start: Epoch,
        obs_len_s: f64,
        token: &CancellationToken,
    ) -> Result<Forecast, Error> {
        let window = fov.az_el_window().ok_or_else(|| {
            InvalidParameterError::new("fov", "obstruction search needs an azimuth/elevation pointing")
        })?;
        if !obs_len_s.is_finite() || obs_len_s < 0.0 {
            return Err(InvalidParameterError::new("obs_len", "must be a non-negative number of seconds").into());
        }
        let obs_end = obs_start + Duration::from_seconds(obs_len_s);

        let forecast = self.per_object(catalog, token, |object| {
            let mut obstructing = Vec::new();
            for pass in predict_transits(object, *observer, obs_start, obs_end, self.options, token.clone()) {
                if let Some(part) = obstruction(&pass?, &window, obs_start, obs_end)? {
                    obstructing.push(part);
                }
            }
            Ok(obstructing)
        })?;
        Ok(forecast)
    }

    /// Interference check of an exposure against catalog objects, sharing the
    /// detector used for the analytic constellation.
    pub fn check_observation(
        &self,
        catalog: &[TleRecord],
        observer: &ObserverLocation,
        window: &ObservationWindow,
        token: &CancellationToken,
    ) -> Result<ObservationVerdict, PredictionError> {
        let end = window.end();
        let mut verdict = ObservationVerdict::default();

        for record in catalog {
            token.check()?;
            let result = TrackedObject::from_tle(record).and_then(|object| {
                let object = Arc::new(object);
                let mut skipped_samples = 0;
                for pass in predict_transits(object, *observer, window.start, end, self.options, token.clone()) {
                    let Some(part) = pass?.clip(window.start, end) else {
                        continue;
                    };
                    let trajectory = part.trajectory(window.cadence_s)?;
                    skipped_samples += trajectory.skipped();
                    if let Some(sample) = first_intrusion(&trajectory, &window.fov) {
                        return Ok((Some(*sample), skipped_samples));
                    }
                }
                Ok((None, skipped_samples))
            });

            match result {
                Ok((hit, skipped_samples)) => {
                    verdict.checked += 1;
                    verdict.skipped.samples += skipped_samples;
                    if let Some(sample) = hit {
                        debug!(object = %record.name, "field of view crossed");
                        verdict.intruder = Some(Intrusion {
                            object: record.name.clone(),
                            sample,
                        });
                        break;
                    }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(object = %record.name, error = %e, "object skipped");
                    verdict.skipped.objects += 1;
                }
            }
        }

        info!(
            interference = verdict.interference(),
            checked = verdict.checked,
            skipped = verdict.skipped.objects,
            "catalog observation checked"
        );
        Ok(verdict)
    }

    /// Applies `search` to every catalog object with failure isolation.
    fn per_object<F>(
        &self,
        catalog: &[TleRecord],
        token: &CancellationToken,
        mut search: F,
    ) -> Result<Forecast, PredictionError>
    where
        F: FnMut(Arc<TrackedObject>) -> Result<Vec<Pass>, PredictionError>,
    {
        let mut forecast = Forecast::default();
        for record in catalog {
            token.check()?;
            let result = TrackedObject::from_tle(record).and_then(|object| search(Arc::new(object)));
            match result {
                Ok(passes) => {
                    debug!(object = %record.name, passes = passes.len(), "object processed");
                    forecast.passes.extend(passes);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(object = %record.name, error = %e, "object skipped");
                    forecast.skipped.push(SkippedObject {
                        name: record.name.clone(),
                        error: e,
                    });
                }
            }
        }
        info!(
            objects = catalog.len(),
            passes = forecast.passes.len(),
            skipped = forecast.skipped.len(),
            "forecast complete"
        );
        Ok(forecast)
    }
}
