pub const MU_EARTH: f64 = 398_600.4418; // Earth's gravitational parameter (km³/s²)
pub const R_EARTH: f64 = 6378.137; // Equatorial radius of Earth (km)

pub const EARTH_ANGULAR_VELOCITY: f64 = 7.2921150e-5; // Earth's rotation rate (rad/s)
pub const WGS84_A: f64 = 6378.137; // Semi-major axis [km]
pub const WGS84_F: f64 = 1.0 / 298.257223563; // Flattening

// Sun
pub const R_SUN: f64 = 696_000.0; // Solar radius (km)
pub const AU: f64 = 149_597_870.7; // Astronomical unit (km)
pub const TWILIGHT_SUN_ELEVATION: f64 = -12.0; // Sky is dark below this solar elevation (deg)

// Time
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5; // Julian date of 1970-01-01T00:00:00 UTC
pub const JD_J2000: f64 = 2_451_545.0;

// Sampling
pub const DEFAULT_CADENCE_S: f64 = 5.0;

// Math
pub const PI: f64 = std::f64::consts::PI;
pub const TWO_PI: f64 = 2.0 * PI;
