pub mod elements;
pub mod observer;
pub mod state;
pub mod trajectory;

pub use elements::OrbitalElements;
pub use observer::ObserverLocation;
pub use state::{Satellite, SatelliteId, StateVector};
pub use trajectory::{SkySample, Trajectory};
