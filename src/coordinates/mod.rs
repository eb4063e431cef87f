pub mod coordinate_transformation;
pub mod equatorial;
pub mod sun;
pub mod topocentric;

pub use equatorial::{to_equatorial, to_horizontal, RaDec};
pub use topocentric::{from_topocentric, to_topocentric, Aer};
