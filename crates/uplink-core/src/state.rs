//! Read-only state handed to the flight computer by its host each tick.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::types::{BodyId, VesselId};

/// Kinematic state of a vessel and its main body, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselSnapshot {
    pub id: VesselId,
    /// Non-physical (on rails) simulation state.
    pub packed: bool,
    pub rotation: DQuat,
    pub orbital_velocity: DVec3,
    pub surface_velocity: DVec3,
    pub center_of_mass: DVec3,
    pub main_body: BodyId,
    pub body_position: DVec3,
    /// Body rotation axis (towards its north pole).
    pub body_up: DVec3,
    pub body_radius: f64,
}

impl VesselSnapshot {
    /// Vector from the vessel to its main body's centre.
    pub fn to_body(&self) -> DVec3 {
        self.body_position - self.center_of_mass
    }

    /// Reference "north" point: the body's north pole.
    pub fn north_pole(&self) -> DVec3 {
        self.body_position + self.body_up * self.body_radius
    }
}

/// Where a target is and how it moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub position: DVec3,
    pub orbital_velocity: DVec3,
}

/// Connectivity of a signal processor to its commanding authority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkStatus {
    /// A crew or local command pod is aboard; no delay applies.
    pub local_control: bool,
    /// One-way delay of the best route, or `None` without any route.
    pub shortest_delay: Option<f64>,
}

impl LinkStatus {
    pub fn local() -> Self {
        Self {
            local_control: true,
            shortest_delay: None,
        }
    }

    pub fn remote(delay: f64) -> Self {
        Self {
            local_control: false,
            shortest_delay: Some(delay),
        }
    }

    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Whether any route exists. An infinite delay counts as no route.
    pub fn connected(&self) -> bool {
        self.shortest_delay.is_some_and(f64::is_finite)
    }

    /// Effective one-way delay: zero with local control, infinite without a route.
    pub fn delay(&self) -> f64 {
        if self.local_control {
            return 0.0;
        }
        match self.shortest_delay {
            Some(delay) if delay.is_finite() => delay.max(0.0),
            _ => f64::INFINITY,
        }
    }
}
