use super::elements::OrbitalElements;
use hifitime::Epoch;
use nalgebra as na;
use std::fmt;

/// Inertial state of a satellite at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: na::Vector3<f64>, // ECI [km]
    pub velocity: na::Vector3<f64>, // ECI [km/s]
    pub epoch: Epoch,
}

impl StateVector {
    pub fn new(position: na::Vector3<f64>, velocity: na::Vector3<f64>, epoch: Epoch) -> Self {
        Self {
            position,
            velocity,
            epoch,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|v| v.is_finite())
    }
}

/// Position of a satellite inside its shell: orbital plane and slot within the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SatelliteId {
    pub plane: usize,
    pub slot: usize,
}

impl fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:02}-S{:02}", self.plane, self.slot)
    }
}

/// A constellation member: immutable elements plus the state of the most recent propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct Satellite {
    id: SatelliteId,
    elements: OrbitalElements,
    /// Epoch the elements refer to.
    reference_epoch: Epoch,
    state: StateVector,
}

impl Satellite {
    pub(crate) fn new(
        id: SatelliteId,
        elements: OrbitalElements,
        reference_epoch: Epoch,
        state: StateVector,
    ) -> Self {
        Self {
            id,
            elements,
            reference_epoch,
            state,
        }
    }

    pub fn id(&self) -> SatelliteId {
        self.id
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn reference_epoch(&self) -> Epoch {
        self.reference_epoch
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Same satellite carrying a new state. The previous state is discarded.
    pub(crate) fn with_state(&self, state: StateVector) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}
