use super::pass::{Pass, Visibility};
use crate::detection::AzElWindow;
use crate::errors::PredictionError;
use hifitime::Epoch;

/// Cuts a pass down to its optically visible part, optionally also restricted to an
/// az/el window. `None` when no part qualifies.
pub fn prune_visible(pass: &Pass, window: Option<&AzElWindow>) -> Result<Option<Pass>, PredictionError> {
    pass.prune(|sample| {
        sample.visibility == Visibility::Visible
            && window.map_or(true, |w| w.contains(sample.azimuth, sample.elevation))
    })
}

/// A pass qualifies when it lasts longer than `min_duration_s` and peaks strictly
/// above `min_elevation_deg`.
pub fn is_valid_pass(pass: &Pass, min_duration_s: f64, min_elevation_deg: f64) -> Result<bool, PredictionError> {
    if pass.duration_s() <= min_duration_s {
        return Ok(false);
    }
    Ok(pass.peak()?.elevation > min_elevation_deg)
}

pub fn filter_valid(
    passes: Vec<Pass>,
    min_duration_s: f64,
    min_elevation_deg: f64,
) -> Result<Vec<Pass>, PredictionError> {
    let mut valid = Vec::with_capacity(passes.len());
    for pass in passes {
        if is_valid_pass(&pass, min_duration_s, min_elevation_deg)? {
            valid.push(pass);
        }
    }
    Ok(valid)
}

/// The part of a pass that is visible, inside the az/el window and inside the
/// exposure `[obs_start, obs_end]`. Kept only if it has a positive duration.
pub fn obstruction(
    pass: &Pass,
    window: &AzElWindow,
    obs_start: Epoch,
    obs_end: Epoch,
) -> Result<Option<Pass>, PredictionError> {
    let Some(clipped) = pass.clip(obs_start, obs_end) else {
        return Ok(None);
    };
    Ok(prune_visible(&clipped, Some(window))?.filter(|p| p.duration_s() > 0.0))
}
