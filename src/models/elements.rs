use crate::constants::{R_EARTH, TWO_PI};
use crate::errors::PropagationError;

/// Classical orbital elements of one satellite. Angles are stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    semi_major_axis: f64,       // [km]
    eccentricity: f64,          // [-]
    inclination: f64,           // [rad]
    raan: f64,                  // right ascension of ascending node [rad]
    argument_of_periapsis: f64, // [rad]
    true_anomaly: f64,          // [rad]
}

impl OrbitalElements {
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        raan: f64,
        argument_of_periapsis: f64,
        true_anomaly: f64,
    ) -> Result<Self, PropagationError> {
        let elements = Self {
            semi_major_axis,
            eccentricity,
            inclination,
            raan: raan.rem_euclid(TWO_PI),
            argument_of_periapsis: argument_of_periapsis.rem_euclid(TWO_PI),
            true_anomaly: true_anomaly.rem_euclid(TWO_PI),
        };
        elements.validate()?;
        Ok(elements)
    }

    /// Circular orbit at `altitude_km` above the equatorial radius. For a circular
    /// orbit the argument of periapsis is zero and the argument of latitude is the
    /// true anomaly.
    pub fn circular(
        altitude_km: f64,
        inclination_deg: f64,
        raan_deg: f64,
        argument_of_latitude_deg: f64,
    ) -> Result<Self, PropagationError> {
        Self::new(
            R_EARTH + altitude_km,
            0.0,
            inclination_deg.to_radians(),
            raan_deg.to_radians(),
            0.0,
            argument_of_latitude_deg.to_radians(),
        )
    }

    fn validate(&self) -> Result<(), PropagationError> {
        let values = [
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.raan,
            self.argument_of_periapsis,
            self.true_anomaly,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PropagationError::NonFiniteState);
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(PropagationError::UnboundOrbit(self.eccentricity));
        }
        let periapsis = self.periapsis_radius();
        if periapsis <= R_EARTH {
            return Err(PropagationError::SubSurfaceOrbit {
                periapsis_km: periapsis - R_EARTH,
            });
        }
        Ok(())
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn raan(&self) -> f64 {
        self.raan
    }

    pub fn argument_of_periapsis(&self) -> f64 {
        self.argument_of_periapsis
    }

    pub fn true_anomaly(&self) -> f64 {
        self.true_anomaly
    }

    /// Angle from the ascending node to the satellite [rad].
    pub fn argument_of_latitude(&self) -> f64 {
        (self.argument_of_periapsis + self.true_anomaly).rem_euclid(TWO_PI)
    }

    pub fn periapsis_radius(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    pub fn altitude_km(&self) -> f64 {
        self.semi_major_axis - R_EARTH
    }

    /// Same orbit, satellite moved to `true_anomaly`.
    pub fn with_true_anomaly(&self, true_anomaly: f64) -> Self {
        Self {
            true_anomaly: true_anomaly.rem_euclid(TWO_PI),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test]
    fn circular_orbit_uses_argument_of_latitude_as_true_anomaly() {
        let elements = OrbitalElements::circular(550.0, 53.0, 45.0, 90.0).unwrap();
        assert_abs_diff_eq!(elements.semi_major_axis(), R_EARTH + 550.0, epsilon = 1e-9);
        assert_abs_diff_eq!(elements.eccentricity(), 0.0);
        assert_abs_diff_eq!(elements.argument_of_periapsis(), 0.0);
        assert_abs_diff_eq!(elements.true_anomaly(), 90f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(elements.argument_of_latitude(), 90f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(elements.altitude_km(), 550.0, epsilon = 1e-9);
    }

    #[test]
    fn angles_are_wrapped() {
        let elements = OrbitalElements::circular(550.0, 53.0, 370.0, -10.0).unwrap();
        assert_abs_diff_eq!(elements.raan(), 10f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(elements.true_anomaly(), 350f64.to_radians(), epsilon = 1e-12);
    }

    #[test_case(-10.0; "below the surface")]
    #[test_case(0.0; "at the surface")]
    fn sub_surface_altitude_is_degenerate(altitude_km: f64) {
        let err = OrbitalElements::circular(altitude_km, 53.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, PropagationError::SubSurfaceOrbit { .. }));
    }

    #[test_case(1.0; "parabolic")]
    #[test_case(1.5; "hyperbolic")]
    #[test_case(-0.1; "negative")]
    fn open_orbits_are_rejected(e: f64) {
        let err = OrbitalElements::new(20_000.0, e, 0.0, 0.0, 0.0, 0.0).unwrap_err();
        assert_eq!(err, PropagationError::UnboundOrbit(e));
    }

    #[test]
    fn non_finite_elements_are_rejected() {
        let err = OrbitalElements::new(f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap_err();
        assert_eq!(err, PropagationError::NonFiniteState);
    }
}
