pub mod orbital;
pub mod propagation;

pub use orbital::OrbitalMechanics;
pub use propagation::{sample_epochs, TwoBodyPropagator};
