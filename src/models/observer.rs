use crate::constants::{WGS84_A, WGS84_F};
use crate::errors::InvalidParameterError;
use nalgebra as na;

/// Fixed ground site in geodetic coordinates on WGS84.
///
/// Longitude is always stored east-positive. Sites published with the
/// west-positive convention (as pass-prediction tools commonly expect) go
/// through [`ObserverLocation::from_west_longitude`] so the conversion happens
/// once, at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverLocation {
    latitude_deg: f64,
    longitude_deg: f64,
    altitude_m: f64,
}

impl ObserverLocation {
    pub fn new(
        latitude_deg: f64,
        longitude_east_deg: f64,
        altitude_m: f64,
    ) -> Result<Self, InvalidParameterError> {
        if !latitude_deg.is_finite() || latitude_deg.abs() > 90.0 {
            return Err(InvalidParameterError::new(
                "latitude",
                format!("{latitude_deg} is outside [-90, 90]"),
            ));
        }
        if !longitude_east_deg.is_finite() {
            return Err(InvalidParameterError::new("longitude", "must be finite"));
        }
        if !altitude_m.is_finite() {
            return Err(InvalidParameterError::new("altitude", "must be finite"));
        }

        let longitude_deg = (longitude_east_deg + 180.0).rem_euclid(360.0) - 180.0;

        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        })
    }

    /// Builds a site from a west-positive longitude (70.8 W is passed as `70.8`).
    pub fn from_west_longitude(
        latitude_deg: f64,
        longitude_west_deg: f64,
        altitude_m: f64,
    ) -> Result<Self, InvalidParameterError> {
        Self::new(latitude_deg, -longitude_west_deg, altitude_m)
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    /// East-positive longitude in [-180, 180).
    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn longitude_west_deg(&self) -> f64 {
        -self.longitude_deg
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    /// Earth-fixed position of the site [km].
    pub fn ecef(&self) -> na::Vector3<f64> {
        let lat = self.latitude_deg.to_radians();
        let lon = self.longitude_deg.to_radians();
        let alt_km = self.altitude_m / 1000.0;

        let e2 = 2.0 * WGS84_F - WGS84_F * WGS84_F; // First eccentricity squared
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        na::Vector3::new(
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - e2) + alt_km) * sin_lat,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case(-30.169, 70.804, -70.804; "ctio published west-positive")]
    #[test_case(19.82, 155.47, -155.47; "mauna kea")]
    #[test_case(51.48, -0.0, 0.0; "greenwich")]
    fn west_longitude_is_converted(lat: f64, west: f64, east: f64) {
        let site = ObserverLocation::from_west_longitude(lat, west, 0.0).unwrap();
        assert_abs_diff_eq!(site.longitude_deg(), east, epsilon = 1e-12);
        assert_abs_diff_eq!(site.longitude_west_deg(), west, epsilon = 1e-12);
    }

    #[test]
    fn rejects_latitude_out_of_range() {
        let err = ObserverLocation::new(91.0, 0.0, 0.0).unwrap_err();
        assert_eq!(err.name, "latitude");
        assert!(ObserverLocation::new(f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn wraps_longitude() {
        let site = ObserverLocation::new(0.0, 270.0, 0.0).unwrap();
        assert_abs_diff_eq!(site.longitude_deg(), -90.0, epsilon = 1e-12);
    }

    #[test]
    fn ecef_on_equator_and_pole() {
        let equator = ObserverLocation::new(0.0, 0.0, 0.0).unwrap().ecef();
        assert_abs_diff_eq!(equator, na::Vector3::new(WGS84_A, 0.0, 0.0), epsilon = 1e-6);

        let pole = ObserverLocation::new(90.0, 0.0, 0.0).unwrap().ecef();
        let polar_radius = WGS84_A * (1.0 - WGS84_F);
        assert_abs_diff_eq!(pole.z, polar_radius, epsilon = 1e-6);
        assert_abs_diff_eq!(pole.x, 0.0, epsilon = 1e-6);
    }
}
