pub mod fov;
pub mod interference;

pub use fov::{AzElWindow, FieldOfView, FovCenter, ObservationWindow};
pub use interference::{
    first_intrusion, intersects, scan, Intrusion, ObservationVerdict, Scan, SkipSummary,
};
