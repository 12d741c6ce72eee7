//! Directives and the delayed command envelope.
//!
//! Producers (UI, scripts, autopilot logic) build a `DelayedCommand` stamped
//! with the current simulation time. The flight computer adds the signal delay
//! on enqueue and executes the directive once it becomes due.

use std::cmp::Ordering;

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{CommandId, TargetRef, Timestamped};

/// Orientation directive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttitudeCommand {
    pub mode: FlightMode,
    pub frame: ReferenceFrame,
    pub attitude: FlightAttitude,
    /// Free orientation used by `FlightAttitude::Surface`.
    pub orientation: DQuat,
    /// Target altitude for `FlightMode::AltitudeHold` (meters).
    pub altitude: f64,
}

impl AttitudeCommand {
    pub fn off() -> Self {
        Self {
            mode: FlightMode::Off,
            frame: ReferenceFrame::Orbit,
            attitude: FlightAttitude::Prograde,
            orientation: DQuat::IDENTITY,
            altitude: 0.0,
        }
    }

    pub fn kill_rot() -> Self {
        Self {
            mode: FlightMode::KillRot,
            ..Self::off()
        }
    }

    pub fn with_attitude(attitude: FlightAttitude, frame: ReferenceFrame) -> Self {
        Self {
            mode: FlightMode::AttitudeHold,
            frame,
            attitude,
            ..Self::off()
        }
    }

    /// Hold a free orientation in the surface frame. Angles in degrees.
    pub fn with_surface(pitch_deg: f64, yaw_deg: f64, roll_deg: f64) -> Self {
        Self {
            mode: FlightMode::AttitudeHold,
            frame: ReferenceFrame::Surface,
            attitude: FlightAttitude::Surface,
            orientation: DQuat::from_euler(
                EulerRot::YXZ,
                yaw_deg.to_radians(),
                pitch_deg.to_radians(),
                roll_deg.to_radians(),
            ),
            altitude: 0.0,
        }
    }

    pub fn with_altitude(altitude: f64) -> Self {
        Self {
            mode: FlightMode::AltitudeHold,
            altitude,
            ..Self::off()
        }
    }
}

/// Throttle directive. Burns by duration first, then by delta-v.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnCommand {
    /// Main throttle setting while burning (0.0 - 1.0).
    pub throttle: f32,
    /// Remaining burn time (seconds).
    pub duration: f64,
    /// Remaining velocity change (m/s).
    pub delta_v: f64,
}

impl BurnCommand {
    pub fn off() -> Self {
        Self {
            throttle: 0.0,
            duration: 0.0,
            delta_v: 0.0,
        }
    }

    pub fn with_duration(throttle: f32, duration: f64) -> Self {
        Self {
            throttle,
            duration,
            delta_v: 0.0,
        }
    }

    pub fn with_delta_v(throttle: f32, delta_v: f64) -> Self {
        Self {
            throttle,
            duration: 0.0,
            delta_v,
        }
    }
}

/// A planned maneuver node as exposed by the host's orbit solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManeuverNode {
    /// Universal time of the node (seconds).
    pub ut: f64,
    /// Planned velocity change in the node's local frame.
    pub delta_v: DVec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManeuverCommand {
    pub node: ManeuverNode,
}

/// Selects (or clears, with `None`) the vessel target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetCommand {
    pub target: Option<TargetRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionGroupCommand {
    pub group: ActionGroup,
}

/// A part event bound by name, invoked once when the command executes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventRef {
    pub part: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCommand {
    pub event: EventRef,
}

/// Removes a pending command (or resets the current attitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CancelCommand {
    pub target: CommandId,
}

/// The single directive carried by a `DelayedCommand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    Attitude(AttitudeCommand),
    Burn(BurnCommand),
    Maneuver(ManeuverCommand),
    Target(TargetCommand),
    ActionGroup(ActionGroupCommand),
    Event(EventCommand),
    Cancel(CancelCommand),
}

/// A directive waiting for its signal and processing delay to elapse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayedCommand {
    pub id: CommandId,
    /// Absolute time at which the command becomes eligible.
    pub time_stamp: f64,
    /// Processing time still owed; only consumed while powered.
    pub extra_delay: f64,
    pub directive: Directive,
}

impl DelayedCommand {
    /// Wrap a directive created at simulation time `now`.
    pub fn new(now: f64, directive: Directive) -> Self {
        Self {
            id: CommandId::next(),
            time_stamp: now,
            extra_delay: 0.0,
            directive,
        }
    }

    pub fn attitude(now: f64, command: AttitudeCommand) -> Self {
        Self::new(now, Directive::Attitude(command))
    }

    pub fn burn(now: f64, command: BurnCommand) -> Self {
        Self::new(now, Directive::Burn(command))
    }

    pub fn maneuver(now: f64, node: ManeuverNode) -> Self {
        Self::new(now, Directive::Maneuver(ManeuverCommand { node }))
    }

    pub fn target(now: f64, target: Option<TargetRef>) -> Self {
        Self::new(now, Directive::Target(TargetCommand { target }))
    }

    pub fn action_group(now: f64, group: ActionGroup) -> Self {
        Self::new(now, Directive::ActionGroup(ActionGroupCommand { group }))
    }

    pub fn event(now: f64, event: EventRef) -> Self {
        Self::new(now, Directive::Event(EventCommand { event }))
    }

    pub fn cancel(now: f64, other: &DelayedCommand) -> Self {
        Self::cancel_id(now, other.id)
    }

    pub fn cancel_id(now: f64, target: CommandId) -> Self {
        Self::new(now, Directive::Cancel(CancelCommand { target }))
    }

    /// Plain commands affect vessel inputs and accrue the configured total delay.
    pub fn is_plain(&self) -> bool {
        !matches!(
            self.directive,
            Directive::Cancel(_) | Directive::Target(_) | Directive::Maneuver(_)
        )
    }

    pub fn maneuver_command(&self) -> Option<&ManeuverCommand> {
        match &self.directive {
            Directive::Maneuver(m) => Some(m),
            _ => None,
        }
    }

    pub fn target_command(&self) -> Option<&TargetCommand> {
        match &self.directive {
            Directive::Target(t) => Some(t),
            _ => None,
        }
    }

    /// Order by time stamp ascending.
    pub fn cmp_time(&self, other: &Self) -> Ordering {
        self.time_stamp.total_cmp(&other.time_stamp)
    }
}

impl Timestamped for DelayedCommand {
    fn time_stamp(&self) -> f64 {
        self.time_stamp
    }
}
