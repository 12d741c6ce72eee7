//! The aggregate of directives currently in effect.

use serde::Serialize;

use uplink_core::commands::{AttitudeCommand, BurnCommand, ManeuverCommand, TargetCommand};
use uplink_core::types::CommandId;

/// Latest applied directive per axis. Axes are set and cleared independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentCommand {
    /// Id of the aggregate itself, fixed for the computer's lifetime.
    pub id: CommandId,
    /// Id of the attitude directive in effect, if one has been applied.
    pub attitude_id: Option<CommandId>,
    pub attitude: Option<AttitudeCommand>,
    pub burn: Option<BurnCommand>,
    pub maneuver: Option<ManeuverCommand>,
    pub target: Option<TargetCommand>,
}

impl CurrentCommand {
    pub fn new() -> Self {
        Self {
            id: CommandId::next(),
            attitude_id: None,
            attitude: Some(AttitudeCommand::off()),
            burn: None,
            maneuver: None,
            target: None,
        }
    }

    pub fn set_attitude(&mut self, id: CommandId, attitude: AttitudeCommand) {
        self.attitude_id = Some(id);
        self.attitude = Some(attitude);
    }

    /// Whether cancelling `id` cancels the active attitude hold: either the
    /// aggregate's own id or the attitude directive in effect.
    pub fn is_active(&self, id: CommandId) -> bool {
        id == self.id || self.attitude_id == Some(id)
    }

    pub fn reset_attitude(&mut self) {
        self.attitude_id = None;
        self.attitude = Some(AttitudeCommand::off());
    }
}

impl Default for CurrentCommand {
    fn default() -> Self {
        Self::new()
    }
}
