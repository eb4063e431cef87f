use crate::errors::ReportError;
use crate::prediction::Pass;
use chrono::{DateTime, Utc};
use hifitime::Epoch;
use serde::Serialize;

/// One report row. Dates use `%x` (mm/dd/yy) and times `%X` (HH:MM:SS), both UTC.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassMetrics {
    pub sat_name: String,
    /// Whole seconds, truncated.
    pub duration: i64,
    pub start_date: String,
    #[serde(rename = "start_time_GMT")]
    pub start_time_gmt: String,
    #[serde(rename = "end_time_GMT")]
    pub end_time_gmt: String,
    #[serde(rename = "peak_time_GMT")]
    pub peak_time_gmt: String,
    pub peak_azimuth: f64,
    pub peak_elevation: f64,
    pub start_azimuth: f64,
    pub start_elevation: f64,
    pub end_azimuth: f64,
    pub end_elevation: f64,
}

pub(crate) fn to_utc(epoch: Epoch) -> Result<DateTime<Utc>, ReportError> {
    let unix = epoch.to_unix_seconds();
    let secs = unix.floor();
    let nanos = ((unix - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos).ok_or_else(|| ReportError::Timestamp(epoch.to_string()))
}

impl TryFrom<&Pass> for PassMetrics {
    type Error = ReportError;

    fn try_from(pass: &Pass) -> Result<Self, Self::Error> {
        let start = pass.at(pass.start())?;
        let end = pass.at(pass.end())?;
        let peak = pass.peak()?;

        let start_utc = to_utc(pass.start())?;
        Ok(Self {
            sat_name: pass.name().to_string(),
            duration: pass.duration_s() as i64,
            start_date: start_utc.format("%x").to_string(),
            start_time_gmt: start_utc.format("%X").to_string(),
            end_time_gmt: to_utc(pass.end())?.format("%X").to_string(),
            peak_time_gmt: to_utc(peak.epoch)?.format("%X").to_string(),
            peak_azimuth: peak.azimuth,
            peak_elevation: peak.elevation,
            start_azimuth: start.azimuth,
            start_elevation: start.elevation,
            end_azimuth: end.azimuth,
            end_elevation: end.elevation,
        })
    }
}
