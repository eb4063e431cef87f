use thiserror::Error;

/// Bad constellation geometry or observation request. Fatal: the caller must fix the inputs.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid parameter `{name}`: {reason}")]
pub struct InvalidParameterError {
    pub name: &'static str,
    pub reason: String,
}

impl InvalidParameterError {
    pub fn new(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: reason.into(),
        }
    }
}

/// Degenerate or undefined orbital state. Fatal for that satellite only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    #[error("invalid gravitational parameter: {0} km³/s²")]
    InvalidGravitationalParameter(f64),
    #[error("orbit periapsis {periapsis_km:.1} km is below the Earth's surface")]
    SubSurfaceOrbit { periapsis_km: f64 },
    #[error("eccentricity {0} does not describe a closed orbit")]
    UnboundOrbit(f64),
    #[error("non-finite orbital state")]
    NonFiniteState,
    #[error("invalid sampling: {0}")]
    InvalidSampling(String),
}

/// Undefined coordinate transform. Fatal for that sample only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("non-finite input to {0}")]
    NonFiniteInput(&'static str),
    #[error("position coincides with the observer")]
    CoincidentWithObserver,
    #[error("undefined {0}")]
    UndefinedAngle(&'static str),
}

/// Failure while predicting passes of one catalog object. The batch skips the object and continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("malformed TLE for {name}: {reason}")]
    MalformedTle { name: String, reason: String },
    #[error("SGP4 propagation failed for {name}: {reason}")]
    Propagation { name: String, reason: String },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("transit search cancelled")]
    Cancelled,
    #[error("transit search deadline exceeded")]
    DeadlineExceeded,
}

impl PredictionError {
    /// Cancellation and deadlines stop the whole batch; everything else only skips one object.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Catalog retrieval failure. Fatal for the run, no automatic retry.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("catalog cache I/O error: {0}")]
    Cache(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown telescope site `{0}`")]
    UnknownSite(String),
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("epoch {0} cannot be written as a calendar date")]
    Timestamp(String),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// Top-level error of a full run: one fatal cause.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),
    #[error(transparent)]
    Propagation(#[from] PropagationError),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
