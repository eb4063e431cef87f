use super::coordinate_transformation::{ecef_to_eci, eci_to_ecef, enu_rotation, gmst, normalize_degrees};
use crate::errors::GeometryError;
use crate::models::ObserverLocation;
use hifitime::Epoch;
use nalgebra as na;

/// Observer-relative spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aer {
    pub azimuth: f64,   // degrees, [0, 360), clockwise from north
    pub elevation: f64, // degrees, [-90, 90]
    pub range_km: f64,
}

/// Below this slant range the line of sight is undefined [km].
const MIN_RANGE_KM: f64 = 1e-6;

/// Convert an ECI position [km] to azimuth, elevation and range as seen from `observer` at `epoch`.
pub fn to_topocentric(
    position_eci: &na::Vector3<f64>,
    observer: &ObserverLocation,
    epoch: &Epoch,
) -> Result<Aer, GeometryError> {
    if position_eci.iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::NonFiniteInput("to_topocentric"));
    }

    let sat_ecef = eci_to_ecef(position_eci, gmst(epoch));
    let rho = sat_ecef - observer.ecef();
    let range_km = rho.norm();
    if range_km < MIN_RANGE_KM {
        return Err(GeometryError::CoincidentWithObserver);
    }

    let enu = enu_rotation(observer.latitude_deg(), observer.longitude_deg()) * rho;
    let (east, north, up) = (enu.x, enu.y, enu.z);

    let horizontal = east.hypot(north);
    let elevation = up.atan2(horizontal).to_degrees();
    let azimuth = if horizontal < f64::EPSILON {
        // Straight overhead or underfoot; any azimuth is as good as another.
        0.0
    } else {
        normalize_degrees(east.atan2(north).to_degrees())
    };

    if !azimuth.is_finite() || !elevation.is_finite() {
        return Err(GeometryError::UndefinedAngle("azimuth/elevation"));
    }

    Ok(Aer {
        azimuth,
        elevation,
        range_km,
    })
}

/// Inverse of [`to_topocentric`]: the ECI point at `aer` from `observer` at `epoch`.
pub fn from_topocentric(
    aer: &Aer,
    observer: &ObserverLocation,
    epoch: &Epoch,
) -> Result<na::Vector3<f64>, GeometryError> {
    if !(aer.azimuth.is_finite() && aer.elevation.is_finite() && aer.range_km.is_finite()) {
        return Err(GeometryError::NonFiniteInput("from_topocentric"));
    }

    let az = aer.azimuth.to_radians();
    let el = aer.elevation.to_radians();
    let enu = na::Vector3::new(el.cos() * az.sin(), el.cos() * az.cos(), el.sin()) * aer.range_km;

    let rotation = enu_rotation(observer.latitude_deg(), observer.longitude_deg());
    let ecef = observer.ecef() + rotation.transpose() * enu;
    Ok(ecef_to_eci(&ecef, gmst(epoch)))
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
    fn zenith_point_has_ninety_degree_elevation() {
        let observer = ctio();
        let overhead = ObserverLocation::new(
            observer.latitude_deg(),
            observer.longitude_deg(),
            observer.altitude_m() + 550_000.0,
        )
        .unwrap();
        let eci = ecef_to_eci(&overhead.ecef(), gmst(&epoch()));

        let aer = to_topocentric(&eci, &observer, &epoch()).unwrap();
        assert_abs_diff_eq!(aer.elevation, 90.0, epsilon = 1e-6);
        assert_abs_diff_eq!(aer.range_km, 550.0, epsilon = 1e-6);
    }

    #[test_case(0.0, 45.0, 1000.0; "north")]
    #[test_case(90.0, 10.0, 2500.0; "east low")]
    #[test_case(200.0, 70.0, 600.0; "south-west high")]
    #[test_case(359.5, -5.0, 3000.0; "below horizon")]
    fn round_trip(azimuth: f64, elevation: f64, range_km: f64) {
        let aer = Aer {
            azimuth,
            elevation,
            range_km,
        };
        let eci = from_topocentric(&aer, &ctio(), &epoch()).unwrap();
        let back = to_topocentric(&eci, &ctio(), &epoch()).unwrap();
        // 0° and 360° are the same bearing
        let azimuth_error = ((back.azimuth - azimuth + 180.0).rem_euclid(360.0) - 180.0).abs();
        assert!(azimuth_error < 1e-6, "{} vs {azimuth}", back.azimuth);
        assert!((0.0..360.0).contains(&back.azimuth));
        assert_abs_diff_eq!(back.elevation, elevation, epsilon = 1e-6);
        assert_abs_diff_eq!(back.range_km, range_km, epsilon = 1e-6);
    }

    #[test]
    fn position_at_observer_is_a_geometry_error() {
        let eci = ecef_to_eci(&ctio().ecef(), gmst(&epoch()));
        let err = to_topocentric(&eci, &ctio(), &epoch()).unwrap_err();
        assert_eq!(err, GeometryError::CoincidentWithObserver);
    }

    #[test]
    fn nan_position_is_a_geometry_error() {
        let eci = na::Vector3::new(f64::NAN, 0.0, 7000.0);
        let err = to_topocentric(&eci, &ctio(), &epoch()).unwrap_err();
        assert!(matches!(err, GeometryError::NonFiniteInput(_)));
    }
}
