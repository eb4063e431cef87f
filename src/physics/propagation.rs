use super::orbital::OrbitalMechanics;
use crate::constants::MU_EARTH;
use crate::errors::PropagationError;
use crate::models::{OrbitalElements, Satellite, StateVector};
use hifitime::{Duration, Epoch};

const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: i32 = 50;

/// Unperturbed two-body propagation around a single attractor.
///
/// Both operations are closed form: the mean anomaly advances linearly at the
/// orbit's mean motion and Kepler's equation is solved for each target time.
/// No drag, J2 or third-body terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoBodyPropagator {
    mu: f64,
}

impl Default for TwoBodyPropagator {
    fn default() -> Self {
        Self { mu: MU_EARTH }
    }
}

impl TwoBodyPropagator {
    pub fn new(mu: f64) -> Result<Self, PropagationError> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(PropagationError::InvalidGravitationalParameter(mu));
        }
        Ok(Self { mu })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// State of an orbit `dt_s` seconds after the instant its elements describe.
    #[allow(non_snake_case)]
    pub fn advance(
        &self,
        elements: &OrbitalElements,
        dt_s: f64,
        epoch: Epoch,
    ) -> Result<StateVector, PropagationError> {
        if !dt_s.is_finite() {
            return Err(PropagationError::NonFiniteState);
        }
        let e = elements.eccentricity();
        let n = OrbitalMechanics::mean_motion(elements.semi_major_axis(), self.mu);

        let E0 = OrbitalMechanics::true_to_eccentric_anomaly(elements.true_anomaly(), e);
        let M0 = OrbitalMechanics::eccentric_to_mean_anomaly(E0, e);
        let M = M0 + n * dt_s;
        let E = OrbitalMechanics::mean_to_eccentric_anomaly(M, e, KEPLER_TOLERANCE, KEPLER_MAX_ITERATIONS);
        let nu = OrbitalMechanics::eccentric_to_true_anomaly(E, e);

        let (position, velocity) =
            OrbitalMechanics::keplerian_to_cartesian(&elements.with_true_anomaly(nu), self.mu);
        let state = StateVector::new(position, velocity, epoch);
        if !state.is_finite() {
            return Err(PropagationError::NonFiniteState);
        }
        Ok(state)
    }

    /// State of freshly built orbit elements at their own reference epoch.
    pub fn initial_state(
        &self,
        elements: &OrbitalElements,
        reference_epoch: Epoch,
    ) -> Result<StateVector, PropagationError> {
        self.advance(elements, 0.0, reference_epoch)
    }

    /// Advances a satellite from its reference elements to `target`. The returned
    /// satellite carries the new state; its elements are unchanged.
    pub fn propagate(
        &self,
        satellite: &Satellite,
        target: Epoch,
    ) -> Result<Satellite, PropagationError> {
        let dt = (target - satellite.reference_epoch()).to_seconds();
        let state = self.advance(satellite.elements(), dt, target)?;
        Ok(satellite.with_state(state))
    }

    /// Fixed-cadence trajectory over `[start, start + duration)`, computed from the
    /// satellite's current state by mean-motion propagation.
    pub fn sample(
        &self,
        satellite: &Satellite,
        start: Epoch,
        duration_s: f64,
        cadence_s: f64,
    ) -> Result<Vec<StateVector>, PropagationError> {
        let epochs = sample_epochs(start, duration_s, cadence_s)?;
        let current = satellite.state();
        let osculating =
            OrbitalMechanics::cartesian_to_keplerian(&current.position, &current.velocity, self.mu)?;

        epochs
            .into_iter()
            .map(|epoch| {
                let dt = (epoch - current.epoch).to_seconds();
                self.advance(&osculating, dt, epoch)
            })
            .collect()
    }
}

/// Sample instants `start, start + cadence, …` strictly before `start + duration`.
pub fn sample_epochs(
    start: Epoch,
    duration_s: f64,
    cadence_s: f64,
) -> Result<Vec<Epoch>, PropagationError> {
    if !cadence_s.is_finite() || cadence_s <= 0.0 {
        return Err(PropagationError::InvalidSampling(format!(
            "cadence must be positive, got {cadence_s} s"
        )));
    }
    if !duration_s.is_finite() || duration_s < 0.0 {
        return Err(PropagationError::InvalidSampling(format!(
            "duration must be non-negative, got {duration_s} s"
        )));
    }

    let mut epochs = Vec::with_capacity((duration_s / cadence_s).ceil() as usize);
    let mut k = 0u64;
    loop {
        let offset = k as f64 * cadence_s;
        if offset >= duration_s {
            break;
        }
        epochs.push(start + Duration::from_seconds(offset));
        k += 1;
    }
    Ok(epochs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::R_EARTH;
    use crate::models::SatelliteId;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    fn satellite(arglat_deg: f64) -> Satellite {
        let propagator = TwoBodyPropagator::default();
        let elements = OrbitalElements::circular(550.0, 53.0, 30.0, arglat_deg).unwrap();
        let epoch = Epoch::from_gregorian_utc_at_noon(2000, 1, 1);
        let state = propagator.initial_state(&elements, epoch).unwrap();
        Satellite::new(SatelliteId { plane: 0, slot: 0 }, elements, epoch, state)
    }

    #[test_case(0.0; "zero")]
    #[test_case(-1.0; "negative")]
    #[test_case(f64::NAN; "nan")]
    fn invalid_mu(mu: f64) {
        assert!(matches!(
            TwoBodyPropagator::new(mu),
            Err(PropagationError::InvalidGravitationalParameter(_))
        ));
    }

    #[test_case(30.0, 5.0, 6; "default cadence")]
    #[test_case(30.0, 7.0, 5; "uneven cadence")]
    #[test_case(30.0, 30.0, 1; "single sample")]
    #[test_case(0.0, 5.0, 0; "empty window")]
    #[test_case(1.0, 5.0, 1; "cadence longer than window")]
    fn sample_count(duration: f64, cadence: f64, expected: usize) {
        let start = Epoch::from_unix_seconds(1_581_066_487.79);
        let epochs = sample_epochs(start, duration, cadence).unwrap();
        assert_eq!(epochs.len(), expected);
        for (k, epoch) in epochs.iter().enumerate() {
            assert_abs_diff_eq!((*epoch - start).to_seconds(), k as f64 * cadence, epsilon = 1e-6);
            assert!((*epoch - start).to_seconds() < duration);
        }
    }

    #[test]
    fn sampling_rejects_bad_cadence() {
        let start = Epoch::from_unix_seconds(0.0);
        assert!(sample_epochs(start, 30.0, 0.0).is_err());
        assert!(sample_epochs(start, -1.0, 5.0).is_err());
    }

    #[test]
    fn full_period_returns_to_start() {
        let sat = satellite(10.0);
        let propagator = TwoBodyPropagator::default();
        let period = OrbitalMechanics::compute_orbital_period(R_EARTH + 550.0, propagator.mu());
        let target = sat.reference_epoch() + Duration::from_seconds(period);

        let moved = propagator.propagate(&sat, target).unwrap();
        assert_eq!(moved.state().epoch, target);
        assert_abs_diff_eq!(moved.state().position, sat.state().position, epsilon = 1e-3);
        assert_eq!(moved.elements(), sat.elements());
    }

    #[test]
    fn quarter_period_advances_argument_of_latitude() {
        let sat = satellite(0.0);
        let propagator = TwoBodyPropagator::default();
        let period = OrbitalMechanics::compute_orbital_period(R_EARTH + 550.0, propagator.mu());
        let target = sat.reference_epoch() + Duration::from_seconds(period / 4.0);

        let expected = satellite(90.0);
        let moved = propagator.propagate(&sat, target).unwrap();
        assert_abs_diff_eq!(moved.state().position, expected.state().position, epsilon = 1e-3);
    }

    #[test]
    fn sampling_matches_direct_propagation() {
        let propagator = TwoBodyPropagator::default();
        let start = Epoch::from_unix_seconds(1_581_066_487.79);
        let sat = propagator.propagate(&satellite(45.0), start).unwrap();

        let samples = propagator.sample(&sat, start, 30.0, 5.0).unwrap();
        assert_eq!(samples.len(), 6);
        for sample in &samples {
            let direct = propagator.propagate(&sat, sample.epoch).unwrap();
            assert_abs_diff_eq!(sample.position, direct.state().position, epsilon = 1e-3);
            assert_abs_diff_eq!(
                sample.position.magnitude(),
                R_EARTH + 550.0,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn sampling_is_deterministic() {
        let propagator = TwoBodyPropagator::default();
        let start = Epoch::from_unix_seconds(1_581_066_487.79);
        let sat = propagator.propagate(&satellite(200.0), start).unwrap();
        let a = propagator.sample(&sat, start, 60.0, 5.0).unwrap();
        let b = propagator.sample(&sat, start, 60.0, 5.0).unwrap();
        assert_eq!(a, b);
    }
}
