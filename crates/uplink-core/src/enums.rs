//! Enumeration types used throughout the flight computer.

use serde::{Deserialize, Serialize};

/// Top-level attitude control mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightMode {
    /// No orientation control.
    #[default]
    Off,
    /// Hold the orientation captured when the command executed.
    KillRot,
    /// Hold an attitude relative to a reference frame.
    AttitudeHold,
    /// Reserved; currently has no control effect.
    AltitudeHold,
}

/// Basis used to build the attitude-hold orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceFrame {
    #[default]
    Orbit,
    Surface,
    /// Forward points at the body's north pole, projected onto the horizon.
    North,
    Maneuver,
    /// Forward is velocity relative to the target vessel.
    TargetVelocity,
    /// Forward points at the target.
    TargetParallel,
}

/// Attitude offset applied on top of the reference frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightAttitude {
    #[default]
    Prograde,
    Retrograde,
    NormalPlus,
    NormalMinus,
    RadialPlus,
    RadialMinus,
    /// Free orientation stored in the command.
    Surface,
}

/// Vessel action groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionGroup {
    Stage,
    Gear,
    Light,
    Rcs,
    Sas,
    Brakes,
    Abort,
    /// Custom groups 1 to 10.
    Custom(u8),
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
