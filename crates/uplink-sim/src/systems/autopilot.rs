//! Attitude-hold autopilot and burn countdown.
//!
//! Reads the current command, computes a target orientation for the steering
//! solver, and overrides the main throttle while a burn is active.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DMat3, DQuat, DVec3};

use uplink_core::commands::AttitudeCommand;
use uplink_core::constants::KILL_ROT_OFFSET_DEG;
use uplink_core::ctrl_state::FlightCtrlState;
use uplink_core::enums::{ActionGroup, FlightAttitude, FlightMode, ReferenceFrame};
use uplink_core::state::VesselSnapshot;
use uplink_core::types::VesselId;

use crate::current::CurrentCommand;
use crate::services::{SteeringSolver, TimeWarp, VesselControl, VesselQuery};

/// Vessel state captured when a directive executes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldReferences {
    /// Orientation held by kill-rotation mode.
    pub kill_rot: DQuat,
    /// Orbital velocity at the previous burn tick.
    pub last_velocity: DVec3,
}

impl Default for HoldReferences {
    fn default() -> Self {
        Self {
            kill_rot: DQuat::IDENTITY,
            last_velocity: DVec3::ZERO,
        }
    }
}

/// Run the autopilot for one control frame.
pub fn run<H>(
    fcs: &mut FlightCtrlState,
    current: &mut CurrentCommand,
    refs: &mut HoldReferences,
    vessel: &VesselSnapshot,
    host: &mut H,
) where
    H: VesselQuery + VesselControl + SteeringSolver + TimeWarp,
{
    if let Some(attitude) = current.attitude {
        match attitude.mode {
            FlightMode::Off => {}
            FlightMode::KillRot => {
                hold_orientation(fcs, refs.kill_rot * kill_rot_offset(), vessel.id, host);
            }
            FlightMode::AttitudeHold => {
                let target = attitude_target(&attitude, current, vessel, host);
                hold_orientation(fcs, target, vessel.id, host);
            }
            // TODO: altitude hold needs a vertical-speed controller; it holds nothing yet.
            FlightMode::AltitudeHold => {}
        }
    }

    burn(fcs, current, refs, vessel, host.delta_time());
}

/// Disable stability assist and hand the orientation to the steering solver.
fn hold_orientation<H>(fcs: &mut FlightCtrlState, target: DQuat, vessel: VesselId, host: &mut H)
where
    H: VesselControl + SteeringSolver,
{
    host.set_action_group(vessel, ActionGroup::Sas, false);
    host.steer_toward(vessel, target, fcs);
}

pub fn kill_rot_offset() -> DQuat {
    DQuat::from_axis_angle(DVec3::NEG_X, KILL_ROT_OFFSET_DEG.to_radians())
}

/// Target orientation for an attitude-hold command.
pub fn attitude_target<H: VesselQuery>(
    attitude: &AttitudeCommand,
    current: &CurrentCommand,
    vessel: &VesselSnapshot,
    host: &H,
) -> DQuat {
    let up = vessel.to_body();
    let orbit = vessel.orbital_velocity;
    let target = current.target.and_then(|t| t.target);

    let forward = match attitude.frame {
        ReferenceFrame::Orbit => orbit,
        ReferenceFrame::Surface => vessel.surface_velocity,
        ReferenceFrame::North => exclude(up, vessel.north_pole() - vessel.center_of_mass),
        ReferenceFrame::Maneuver => match &current.maneuver {
            Some(maneuver) => host.burn_vector(vessel.id, &maneuver.node),
            None => orbit,
        },
        ReferenceFrame::TargetVelocity => target
            .filter(|t| t.is_vessel())
            .and_then(|t| host.target_state(&t))
            .map_or(orbit, |state| orbit - state.orbital_velocity),
        ReferenceFrame::TargetParallel => target
            .and_then(|t| host.target_state(&t))
            .map_or(orbit, |state| state.position - vessel.center_of_mass),
    };

    look_rotation(forward, up) * attitude_offset(attitude)
}

pub fn attitude_offset(attitude: &AttitudeCommand) -> DQuat {
    match attitude.attitude {
        FlightAttitude::Prograde => DQuat::IDENTITY,
        FlightAttitude::Retrograde => DQuat::from_axis_angle(DVec3::Y, PI),
        FlightAttitude::NormalPlus => DQuat::from_axis_angle(DVec3::Y, FRAC_PI_2),
        FlightAttitude::NormalMinus => DQuat::from_axis_angle(DVec3::NEG_Y, FRAC_PI_2),
        FlightAttitude::RadialPlus => DQuat::from_axis_angle(DVec3::X, FRAC_PI_2),
        FlightAttitude::RadialMinus => DQuat::from_axis_angle(DVec3::NEG_X, FRAC_PI_2),
        FlightAttitude::Surface => attitude.orientation,
    }
}

/// Rotation taking local +Z to `forward` and local +Y as close to `up` as
/// possible. Degenerate inputs fall back to an arbitrary orthonormal basis.
pub fn look_rotation(forward: DVec3, up: DVec3) -> DQuat {
    let forward = forward.try_normalize().unwrap_or(DVec3::Z);
    let up = exclude(forward, up)
        .try_normalize()
        .unwrap_or_else(|| forward.any_orthonormal_vector());
    let right = up.cross(forward);
    DQuat::from_mat3(&DMat3::from_cols(right, up, forward))
}

/// Component of `v` orthogonal to `n`.
fn exclude(n: DVec3, v: DVec3) -> DVec3 {
    let len_sq = n.length_squared();
    if len_sq <= f64::EPSILON {
        return v;
    }
    v - n * (v.dot(n) / len_sq)
}

/// Count the active burn down by duration, then by delta-v.
fn burn(
    fcs: &mut FlightCtrlState,
    current: &mut CurrentCommand,
    refs: &mut HoldReferences,
    vessel: &VesselSnapshot,
    dt: f64,
) {
    let Some(burn) = current.burn.as_mut() else {
        return;
    };

    let finished = if burn.duration > 0.0 {
        fcs.main_throttle = burn.throttle;
        burn.duration -= dt;
        false
    } else if burn.delta_v > 0.0 {
        fcs.main_throttle = burn.throttle;
        burn.delta_v -= (refs.last_velocity - vessel.orbital_velocity).length();
        refs.last_velocity = vessel.orbital_velocity;
        false
    } else {
        fcs.main_throttle = 0.0;
        true
    };

    if finished {
        current.burn = None;
    }
}
