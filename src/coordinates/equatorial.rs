use super::coordinate_transformation::{gmst, normalize_degrees};
use crate::errors::GeometryError;
use crate::models::ObserverLocation;
use hifitime::Epoch;

/// Sky equatorial coordinates of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaDec {
    pub right_ascension: f64, // degrees, [0, 360)
    pub declination: f64,     // degrees, [-90, 90]
}

/// Below this the hour angle is undefined (celestial pole, or an observer standing on a pole).
const DEGENERATE: f64 = 1e-12;

/// Local mean sidereal time at the observer, in degrees.
pub fn local_sidereal_time(observer: &ObserverLocation, epoch: &Epoch) -> f64 {
    normalize_degrees(gmst(epoch).to_degrees() + observer.longitude_deg())
}

/// Convert topocentric azimuth/elevation (degrees) to right ascension/declination.
/// The result depends on time and place through the local sidereal time.
pub fn to_equatorial(
    azimuth: f64,
    elevation: f64,
    observer: &ObserverLocation,
    epoch: &Epoch,
) -> Result<RaDec, GeometryError> {
    if !azimuth.is_finite() || !elevation.is_finite() {
        return Err(GeometryError::NonFiniteInput("to_equatorial"));
    }

    let az = azimuth.to_radians();
    let el = elevation.to_radians();
    let (sin_lat, cos_lat) = observer.latitude_deg().to_radians().sin_cos();

    let sin_dec = (el.sin() * sin_lat + el.cos() * cos_lat * az.cos()).clamp(-1.0, 1.0);
    let dec = sin_dec.asin();

    // Both atan2 arguments carry a common positive factor cos(dec)·cos(lat), dropped here.
    let y = -az.sin() * el.cos() * cos_lat;
    let x = el.sin() - sin_lat * sin_dec;
    if y.abs() < DEGENERATE && x.abs() < DEGENERATE {
        return Err(GeometryError::UndefinedAngle("hour angle"));
    }
    let hour_angle = y.atan2(x).to_degrees();

    let right_ascension = normalize_degrees(local_sidereal_time(observer, epoch) - hour_angle);
    let declination = dec.to_degrees();
    if !right_ascension.is_finite() || !declination.is_finite() {
        return Err(GeometryError::UndefinedAngle("right ascension/declination"));
    }

    Ok(RaDec {
        right_ascension,
        declination,
    })
}

/// Inverse of [`to_equatorial`]: azimuth and elevation (degrees) of a sky position.
pub fn to_horizontal(
    radec: &RaDec,
    observer: &ObserverLocation,
    epoch: &Epoch,
) -> Result<(f64, f64), GeometryError> {
    if !radec.right_ascension.is_finite() || !radec.declination.is_finite() {
        return Err(GeometryError::NonFiniteInput("to_horizontal"));
    }

    let hour_angle = (local_sidereal_time(observer, epoch) - radec.right_ascension).to_radians();
    let dec = radec.declination.to_radians();
    let (sin_lat, cos_lat) = observer.latitude_deg().to_radians().sin_cos();

    let sin_el = (dec.sin() * sin_lat + dec.cos() * cos_lat * hour_angle.cos()).clamp(-1.0, 1.0);
    let el = sin_el.asin();

    let y = -hour_angle.sin() * dec.cos() * cos_lat;
    let x = dec.sin() - sin_lat * sin_el;
    if y.abs() < DEGENERATE && x.abs() < DEGENERATE {
        return Err(GeometryError::UndefinedAngle("azimuth"));
    }

    Ok((normalize_degrees(y.atan2(x).to_degrees()), el.to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    fn ctio() -> ObserverLocation {
        ObserverLocation::from_west_longitude(-30.169, 70.804, 2200.0).unwrap()
    }

    fn epoch() -> Epoch {
        Epoch::from_unix_seconds(1_581_066_487.79)
    }

    #[test]
    fn zenith_declination_equals_latitude() {
        let radec = to_equatorial(0.0, 90.0, &ctio(), &epoch()).unwrap();
        assert_abs_diff_eq!(radec.declination, -30.169, epsilon = 1e-9);
        assert_abs_diff_eq!(
            radec.right_ascension,
            local_sidereal_time(&ctio(), &epoch()),
            epsilon = 1e-6
        );
    }

    #[test]
    fn south_horizon_from_southern_site() {
        // The south celestial pole stands 30.169° above the southern horizon
        let radec = to_equatorial(180.0, 0.0, &ctio(), &epoch()).unwrap();
        assert_abs_diff_eq!(radec.declination, -90.0 + 30.169, epsilon = 1e-9);
    }

    #[test_case(10.0, 10.0; "scenario target")]
    #[test_case(123.4, -60.0; "southern sky")]
    #[test_case(359.0, -20.0; "near seam")]
    fn horizontal_round_trip(ra: f64, dec: f64) {
        let radec = RaDec {
            right_ascension: ra,
            declination: dec,
        };
        let (az, el) = to_horizontal(&radec, &ctio(), &epoch()).unwrap();
        let back = to_equatorial(az, el, &ctio(), &epoch()).unwrap();
        assert_abs_diff_eq!(back.right_ascension, ra, epsilon = 1e-7);
        assert_abs_diff_eq!(back.declination, dec, epsilon = 1e-7);
    }

    #[test]
    fn observer_on_pole_looking_up_is_undefined() {
        let pole = ObserverLocation::new(90.0, 0.0, 0.0).unwrap();
        let err = to_equatorial(0.0, 90.0, &pole, &epoch()).unwrap_err();
        assert_eq!(err, GeometryError::UndefinedAngle("hour angle"));
    }

    #[test]
    fn nan_angles_are_rejected() {
        assert!(to_equatorial(f64::NAN, 10.0, &ctio(), &epoch()).is_err());
    }
}
