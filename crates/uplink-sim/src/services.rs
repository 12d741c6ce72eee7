//! Contracts between the flight computer and the simulation hosting it.
//!
//! Each trait covers one external collaborator. A single host object usually
//! implements all of them; systems only bound on the ones they touch.

use glam::{DQuat, DVec3};

use uplink_core::commands::{EventRef, ManeuverNode};
use uplink_core::ctrl_state::FlightCtrlState;
use uplink_core::enums::ActionGroup;
use uplink_core::events::Notification;
use uplink_core::state::{LinkStatus, TargetSnapshot, VesselSnapshot};
use uplink_core::types::{ProcessorId, TargetRef, VesselId};

pub trait Clock {
    /// Current simulation time (seconds).
    fn game_time(&self) -> f64;
}

/// Connectivity graph lookup.
pub trait Network {
    fn link_status(&self, processor: ProcessorId) -> LinkStatus;
}

/// Power and master election of the part carrying the computer.
pub trait SignalProcessor {
    fn powered(&self, processor: ProcessorId) -> bool;
    fn is_master(&self, processor: ProcessorId) -> bool;
    /// The vessel the processor currently belongs to. Changes on docking
    /// and undocking.
    fn processor_vessel(&self, processor: ProcessorId) -> Option<VesselId>;
}

pub trait VesselQuery {
    fn vessel(&self, vessel: VesselId) -> Option<VesselSnapshot>;
    fn maneuver_nodes(&self, vessel: VesselId) -> Vec<ManeuverNode>;
    /// World-space burn vector of a node on the vessel's orbit.
    fn burn_vector(&self, vessel: VesselId, node: &ManeuverNode) -> DVec3;
    /// The target selected in the simulation, independent of any command.
    fn active_target(&self) -> Option<TargetRef>;
    fn target_state(&self, target: &TargetRef) -> Option<TargetSnapshot>;
    /// The vessel the player is currently viewing/flying.
    fn active_vessel(&self) -> Option<VesselId>;
}

pub trait VesselControl {
    fn toggle_action_group(&mut self, vessel: VesselId, group: ActionGroup);
    fn set_action_group(&mut self, vessel: VesselId, group: ActionGroup, active: bool);
    fn stage_locked(&self) -> bool;
    fn activate_next_stage(&mut self, vessel: VesselId);
    fn toggle_rcs_lock(&mut self);
    fn invoke_event(&mut self, vessel: VesselId, event: &EventRef);
    fn lock_heading(&mut self, vessel: VesselId, rotation: DQuat);
}

/// Converts a target orientation into attitude control outputs.
pub trait SteeringSolver {
    fn steer_toward(&mut self, vessel: VesselId, target: DQuat, fcs: &mut FlightCtrlState);
}

/// Global time acceleration.
pub trait TimeWarp {
    fn current_rate(&self) -> f64;
    fn rate_index(&self) -> usize;
    fn set_rate_index(&mut self, index: usize);
    /// Width of the current tick at the current rate (seconds).
    fn delta_time(&self) -> f64;
}

pub trait Notifier {
    fn post(&mut self, notification: Notification);
}

/// Everything a flight computer needs from its host.
pub trait FlightHost:
    Clock
    + Network
    + SignalProcessor
    + VesselQuery
    + VesselControl
    + SteeringSolver
    + TimeWarp
    + Notifier
{
}

impl<T> FlightHost for T where
    T: Clock
        + Network
        + SignalProcessor
        + VesselQuery
        + VesselControl
        + SteeringSolver
        + TimeWarp
        + Notifier
{
}
