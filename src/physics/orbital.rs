use crate::constants::{PI, TWO_PI};
use crate::errors::PropagationError;
use crate::models::OrbitalElements;
use nalgebra as na;

pub struct OrbitalMechanics;

#[allow(non_snake_case)]
impl OrbitalMechanics {
    /// Converts a Cartesian state (position [km], velocity [km/s]) to orbital elements.
    ///
    /// Circular orbits get a zero argument of periapsis and carry the argument of
    /// latitude in the true anomaly; equatorial orbits get a zero RAAN.
    pub fn cartesian_to_keplerian(
        r: &na::Vector3<f64>,
        v: &na::Vector3<f64>,
        mu: f64,
    ) -> Result<OrbitalElements, PropagationError> {
        // Calculate angular momentum vector
        let h = r.cross(v);
        let h_mag = h.magnitude();
        let r_mag = r.magnitude();
        if h_mag < 1e-9 || r_mag < 1e-9 {
            return Err(PropagationError::NonFiniteState);
        }

        // Calculate node vector
        let k = na::Vector3::new(0.0, 0.0, 1.0);
        let n = k.cross(&h);
        let n_mag = n.magnitude();

        // Calculate eccentricity vector
        let v_mag = v.magnitude();
        let e_vec = ((v_mag * v_mag - mu / r_mag) * r - r.dot(v) * v) / mu;
        let e = e_vec.magnitude();

        // Semi-major axis
        let specific_energy = v_mag * v_mag / 2.0 - mu / r_mag;
        let a = -mu / (2.0 * specific_energy);

        let i = (h.z / h_mag).clamp(-1.0, 1.0).acos();

        let raan = if n_mag < 1e-11 * h_mag { 0.0 } else { n.y.atan2(n.x) };

        let omega = if e < 1e-11 {
            0.0
        } else if n_mag < 1e-11 * h_mag {
            e_vec.y.atan2(e_vec.x)
        } else {
            (h.dot(&n.cross(&e_vec)) / h_mag).atan2(n.dot(&e_vec))
        };

        let nu = if e < 1e-11 {
            if n_mag < 1e-11 * h_mag {
                r.y.atan2(r.x)
            } else {
                (h.dot(&n.cross(r)) / h_mag).atan2(n.dot(r))
            }
        } else {
            (h.dot(&e_vec.cross(r)) / h_mag).atan2(e_vec.dot(r))
        };

        OrbitalElements::new(a, e, i, raan, omega, nu)
    }

    pub fn compute_orbital_period(a: f64, mu: f64) -> f64 {
        TWO_PI * (a.powi(3) / mu).sqrt()
    }

    /// Mean angular rate of an orbit [rad/s].
    pub fn mean_motion(a: f64, mu: f64) -> f64 {
        (mu / a.powi(3)).sqrt()
    }

    pub fn compute_circular_velocity(r: f64, mu: f64) -> f64 {
        (mu / r).sqrt()
    }

    // Anomaly conversion functions
    pub fn true_to_eccentric_anomaly(nu: f64, e: f64) -> f64 {
        if e < 1e-11 {
            return nu.rem_euclid(TWO_PI);
        }

        let E = ((1.0 - e * e).sqrt() * nu.sin()).atan2(e + nu.cos());
        E.rem_euclid(TWO_PI)
    }

    pub fn eccentric_to_true_anomaly(E: f64, e: f64) -> f64 {
        if e < 1e-11 {
            return E.rem_euclid(TWO_PI);
        }

        let nu = ((1.0 - e * e).sqrt() * E.sin()).atan2(E.cos() - e);
        nu.rem_euclid(TWO_PI)
    }

    pub fn eccentric_to_mean_anomaly(E: f64, e: f64) -> f64 {
        (E - e * E.sin()).rem_euclid(TWO_PI)
    }

    pub fn mean_to_eccentric_anomaly(M: f64, e: f64, tolerance: f64, max_iterations: i32) -> f64 {
        let M = M.rem_euclid(TWO_PI);
        if e < 1e-11 {
            return M;
        }

        // Initial guess
        let mut E = if M < PI { M + e / 2.0 } else { M - e / 2.0 };

        // Newton-Raphson iteration
        for _ in 0..max_iterations {
            let delta = (E - e * E.sin() - M) / (1.0 - e * E.cos());
            E -= delta;
            if delta.abs() <= tolerance {
                break;
            }
        }

        E.rem_euclid(TWO_PI)
    }

    /// Converts orbital elements to Cartesian state vectors.
    /// Returns: (position, velocity) in ECI frame [km, km/s]
    pub fn keplerian_to_cartesian(
        elements: &OrbitalElements,
        mu: f64,
    ) -> (na::Vector3<f64>, na::Vector3<f64>) {
        let a = elements.semi_major_axis();
        let e = elements.eccentricity();
        let nu = elements.true_anomaly();

        // Calculate position and velocity in orbital plane
        let p = a * (1.0 - e * e);
        let r_mag = p / (1.0 + e * nu.cos());

        // Position in orbital plane
        let r_orbital = na::Vector3::new(r_mag * nu.cos(), r_mag * nu.sin(), 0.0);

        // Velocity in orbital plane
        let v_orbital = na::Vector3::new(
            -(mu / p).sqrt() * nu.sin(),
            (mu / p).sqrt() * (e + nu.cos()),
            0.0,
        );

        // Rotation matrices
        let rot_omega =
            na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), elements.argument_of_periapsis());
        let rot_i = na::Rotation3::from_axis_angle(&na::Vector3::x_axis(), elements.inclination());
        let rot_omega_cap = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), elements.raan());

        // Transform to ECI frame
        let transform = rot_omega_cap * rot_i * rot_omega;
        (transform * r_orbital, transform * v_orbital)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MU_EARTH, R_EARTH};
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case(R_EARTH + 550.0, 5739.0; "starlink shell")]
    #[test_case(42_164.0, 86_164.0; "geostationary")]
    fn orbital_period(a: f64, expected: f64) {
        let period = OrbitalMechanics::compute_orbital_period(a, MU_EARTH);
        assert_abs_diff_eq!(period, expected, epsilon = 5.0);
        assert_abs_diff_eq!(
            OrbitalMechanics::mean_motion(a, MU_EARTH) * period,
            TWO_PI,
            epsilon = 1e-9
        );
    }

    #[test]
    fn circular_velocity_at_leo() {
        let v = OrbitalMechanics::compute_circular_velocity(R_EARTH + 550.0, MU_EARTH);
        assert_abs_diff_eq!(v, 7.585, epsilon = 1e-2);
    }

    #[test_case(0.0, 0.0; "circular")]
    #[test_case(1.0, 0.1; "low eccentricity")]
    #[test_case(2.5, 0.7; "high eccentricity")]
    #[test_case(5.9, 0.3; "late in orbit")]
    fn anomaly_round_trip(nu: f64, e: f64) {
        let E = OrbitalMechanics::true_to_eccentric_anomaly(nu, e);
        let M = OrbitalMechanics::eccentric_to_mean_anomaly(E, e);
        let E_back = OrbitalMechanics::mean_to_eccentric_anomaly(M, e, 1e-14, 50);
        let nu_back = OrbitalMechanics::eccentric_to_true_anomaly(E_back, e);
        assert_abs_diff_eq!(E_back, E, epsilon = 1e-9);
        assert_abs_diff_eq!(nu_back, nu, epsilon = 1e-9);
    }

    #[test]
    fn circular_orbit_state() {
        let elements = OrbitalElements::circular(550.0, 53.0, 0.0, 0.0).unwrap();
        let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&elements, MU_EARTH);
        // At the ascending node on RAAN 0 the satellite sits on +x and climbs northward
        assert_abs_diff_eq!(r, na::Vector3::new(R_EARTH + 550.0, 0.0, 0.0), epsilon = 1e-6);
        let speed = OrbitalMechanics::compute_circular_velocity(R_EARTH + 550.0, MU_EARTH);
        assert_abs_diff_eq!(v.magnitude(), speed, epsilon = 1e-9);
        assert_abs_diff_eq!(v.z / speed, 53f64.to_radians().sin(), epsilon = 1e-9);
    }

    #[test_case(OrbitalElements::circular(550.0, 53.0, 45.0, 120.0).unwrap(); "inclined circular")]
    #[test_case(OrbitalElements::new(8000.0, 0.1, 0.5, 1.0, 2.0, 3.0).unwrap(); "elliptical")]
    fn cartesian_round_trip(elements: OrbitalElements) {
        let (r, v) = OrbitalMechanics::keplerian_to_cartesian(&elements, MU_EARTH);
        let back = OrbitalMechanics::cartesian_to_keplerian(&r, &v, MU_EARTH).unwrap();
        assert_abs_diff_eq!(back.semi_major_axis(), elements.semi_major_axis(), epsilon = 1e-6);
        assert_abs_diff_eq!(back.eccentricity(), elements.eccentricity(), epsilon = 1e-9);
        assert_abs_diff_eq!(back.inclination(), elements.inclination(), epsilon = 1e-9);
        assert_abs_diff_eq!(back.raan(), elements.raan(), epsilon = 1e-9);
        assert_abs_diff_eq!(
            back.argument_of_latitude(),
            elements.argument_of_latitude(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn zero_state_is_degenerate() {
        let zero = na::Vector3::zeros();
        let err = OrbitalMechanics::cartesian_to_keplerian(&zero, &zero, MU_EARTH).unwrap_err();
        assert_eq!(err, PropagationError::NonFiniteState);
    }
}
