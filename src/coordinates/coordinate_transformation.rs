use crate::constants::*;
use hifitime::Epoch;
use nalgebra as na;

/// Julian date (UTC) of an epoch.
pub fn julian_date(epoch: &Epoch) -> f64 {
    JD_UNIX_EPOCH + epoch.to_unix_seconds() / SECONDS_PER_DAY
}

/// Greenwich Mean Sidereal Time in radians, [0, 2π).
pub fn gmst(epoch: &Epoch) -> f64 {
    let jd = julian_date(epoch);
    let d = jd - JD_J2000;
    // Julian centuries from J2000.0
    let t = d / 36525.0;

    let gmst_deg = 280.46061837 + 360.98564736629 * d + 0.000387933 * t * t
        - t * t * t / 38_710_000.0;

    normalize_degrees(gmst_deg).to_radians()
}

/// Rotate an inertial vector into the Earth-fixed frame.
pub fn eci_to_ecef(eci: &na::Vector3<f64>, gmst: f64) -> na::Vector3<f64> {
    earth_rotation(gmst).inverse() * eci
}

pub fn ecef_to_eci(ecef: &na::Vector3<f64>, gmst: f64) -> na::Vector3<f64> {
    earth_rotation(gmst) * ecef
}

fn earth_rotation(gmst: f64) -> na::Rotation3<f64> {
    na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), gmst)
}

/// Rotation taking Earth-fixed offsets into local East-North-Up at a geodetic site.
pub fn enu_rotation(latitude_deg: f64, longitude_deg: f64) -> na::Matrix3<f64> {
    let lat = latitude_deg.to_radians();
    let lon = longitude_deg.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    na::Matrix3::new(
        -sin_lon,
        cos_lon,
        0.0,
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        cos_lat * cos_lon,
        cos_lat * sin_lon,
        sin_lat,
    )
}

/// Wrap an angle in degrees to [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative angles up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
