use super::coordinate_transformation::julian_date;
use crate::constants::{AU, JD_J2000, R_EARTH, R_SUN};
use hifitime::Epoch;
use nalgebra as na;

/// Geocentric inertial position of the Sun [km], low-precision almanac model (~0.01°).
pub fn sun_position(epoch: &Epoch) -> na::Vector3<f64> {
    let n = julian_date(epoch) - JD_J2000;

    let mean_longitude = (280.460 + 0.985_647_4 * n).to_radians();
    let mean_anomaly = (357.528 + 0.985_600_3 * n).to_radians();
    let ecliptic_longitude = mean_longitude
        + (1.915_f64.to_radians()) * mean_anomaly.sin()
        + (0.020_f64.to_radians()) * (2.0 * mean_anomaly).sin();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();
    let distance = (1.000_14 - 0.016_71 * mean_anomaly.cos() - 0.000_14 * (2.0 * mean_anomaly).cos()) * AU;

    na::Vector3::new(
        distance * ecliptic_longitude.cos(),
        distance * obliquity.cos() * ecliptic_longitude.sin(),
        distance * obliquity.sin() * ecliptic_longitude.sin(),
    )
}

/// Whether a satellite at `satellite` [km, ECI] sits in the Earth's umbra.
///
/// Conical shadow: the satellite is eclipsed when the Earth's disc, seen from the
/// satellite, is larger than the Sun's and covers its centre.
pub fn is_eclipsed(satellite: &na::Vector3<f64>, sun: &na::Vector3<f64>) -> bool {
    let r_sat = satellite.norm();
    if r_sat <= R_EARTH {
        return true;
    }
    let to_sun = sun - satellite;
    let to_earth = -satellite;

    let earth_semi_diameter = (R_EARTH / r_sat).asin();
    let sun_semi_diameter = (R_SUN / to_sun.norm()).asin();
    let separation = to_sun.angle(&to_earth);

    earth_semi_diameter > sun_semi_diameter && separation < earth_semi_diameter - sun_semi_diameter
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case(2024, 3, 20, 0.0; "march equinox")]
    #[test_case(2024, 6, 20, 23.44; "june solstice")]
    #[test_case(2024, 12, 21, -23.44; "december solstice")]
    fn solar_declination_through_the_year(year: i32, month: u8, day: u8, expected: f64) {
        let sun = sun_position(&Epoch::from_gregorian_utc_at_noon(year, month, day));
        let declination = (sun.z / sun.norm()).asin().to_degrees();
        assert_abs_diff_eq!(declination, expected, epsilon = 0.5);
        assert_abs_diff_eq!(sun.norm() / AU, 1.0, epsilon = 0.02);
    }

    #[test]
    fn satellite_behind_earth_is_eclipsed() {
        let sun = na::Vector3::new(AU, 0.0, 0.0);
        let behind = na::Vector3::new(-(R_EARTH + 550.0), 0.0, 0.0);
        let beside = na::Vector3::new(0.0, R_EARTH + 550.0, 0.0);
        let in_front = na::Vector3::new(R_EARTH + 550.0, 0.0, 0.0);

        assert!(is_eclipsed(&behind, &sun));
        assert!(!is_eclipsed(&beside, &sun));
        assert!(!is_eclipsed(&in_front, &sun));
    }
}
