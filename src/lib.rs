pub mod catalog;
pub mod config;
pub mod constants;
pub mod constellation;
pub mod coordinates;
pub mod detection;
pub mod errors;
pub mod models;
pub mod physics;
pub mod prediction;
pub mod report;

pub use constellation::Constellation;
pub use detection::{FieldOfView, ObservationVerdict, ObservationWindow};
pub use errors::Error;
pub use models::ObserverLocation;
pub use prediction::{PassPredictor, TrackedObject};
