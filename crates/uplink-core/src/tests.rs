#[cfg(test)]
mod tests {
    use crate::commands::*;
    use crate::config::FlightComputerSettings;
    use crate::ctrl_state::FlightCtrlState;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::state::LinkStatus;
    use crate::status::ComputerStatus;
    use crate::types::{CommandId, TargetRef, VesselId};

    // ---- Commands ----

    #[test]
    fn test_command_ids_are_unique_and_increasing() {
        let a = CommandId::next();
        let b = CommandId::next();
        assert!(b > a);
    }

    #[test]
    fn test_plain_classification() {
        let now = 10.0;
        assert!(DelayedCommand::attitude(now, AttitudeCommand::kill_rot()).is_plain());
        assert!(DelayedCommand::burn(now, BurnCommand::with_duration(1.0, 5.0)).is_plain());
        assert!(DelayedCommand::action_group(now, ActionGroup::Stage).is_plain());

        let attitude = DelayedCommand::attitude(now, AttitudeCommand::off());
        assert!(!DelayedCommand::cancel(now, &attitude).is_plain());
        assert!(!DelayedCommand::target(now, None).is_plain());
        let node = ManeuverNode {
            ut: 100.0,
            delta_v: glam::DVec3::X,
        };
        assert!(!DelayedCommand::maneuver(now, node).is_plain());
    }

    #[test]
    fn test_new_command_is_stamped_with_creation_time() {
        let cmd = DelayedCommand::target(42.5, Some(TargetRef::Vessel { id: VesselId(3) }));
        assert_eq!(cmd.time_stamp, 42.5);
        assert_eq!(cmd.extra_delay, 0.0);
        assert_eq!(
            cmd.target_command().and_then(|t| t.target),
            Some(TargetRef::Vessel { id: VesselId(3) })
        );
        assert!(cmd.maneuver_command().is_none());
    }

    #[test]
    fn test_cancel_refers_to_target_id() {
        let burn = DelayedCommand::burn(0.0, BurnCommand::with_delta_v(1.0, 50.0));
        let cancel = DelayedCommand::cancel(0.0, &burn);
        match cancel.directive {
            Directive::Cancel(c) => assert_eq!(c.target, burn.id),
            other => panic!("expected cancel, got {other:?}"),
        }
    }

    #[test]
    fn test_surface_attitude_identity_at_zero_angles() {
        let cmd = AttitudeCommand::with_surface(0.0, 0.0, 0.0);
        assert_eq!(cmd.mode, FlightMode::AttitudeHold);
        assert_eq!(cmd.attitude, FlightAttitude::Surface);
        assert!(cmd.orientation.abs_diff_eq(glam::DQuat::IDENTITY, 1e-12));
    }

    #[test]
    fn test_scripted_directive_json_shape() {
        // Scripts describe directives by tag; this is the format the harness reads.
        let json = r#"{"type":"ActionGroup","group":"Stage"}"#;
        let directive: Directive = serde_json::from_str(json).unwrap();
        assert_eq!(
            directive,
            Directive::ActionGroup(ActionGroupCommand {
                group: ActionGroup::Stage
            })
        );
    }

    // ---- Control frames ----

    #[test]
    fn test_neutralize_keeps_trims() {
        let mut fcs = FlightCtrlState {
            main_throttle: 1.0,
            pitch: 0.3,
            yaw: -0.2,
            roll: 0.1,
            x: 1.0,
            pitch_trim: 0.05,
            roll_trim: -0.05,
            ..Default::default()
        };
        fcs.neutralize();
        assert!(fcs.is_neutral());
        assert_eq!(fcs.pitch_trim, 0.05);
        assert_eq!(fcs.roll_trim, -0.05);
    }

    // ---- Link status ----

    #[test]
    fn test_link_delay_rules() {
        assert_eq!(LinkStatus::local().delay(), 0.0);
        assert_eq!(LinkStatus::remote(2.5).delay(), 2.5);
        assert!(LinkStatus::unreachable().delay().is_infinite());
        assert!(!LinkStatus::unreachable().connected());

        let infinite = LinkStatus::remote(f64::INFINITY);
        assert!(!infinite.connected());
        assert!(infinite.delay().is_infinite());
    }

    // ---- Status ----

    #[test]
    fn test_status_flags() {
        let mut status = ComputerStatus::NORMAL;
        assert!(status.is_normal());
        assert_eq!(status.to_string(), "Normal");

        status |= ComputerStatus::OUT_OF_POWER;
        status |= ComputerStatus::NO_CONNECTION;
        assert!(status.contains(ComputerStatus::OUT_OF_POWER));
        assert!(!status.contains(ComputerStatus::PACKED));
        assert_eq!(status.bits(), 12);
        assert_eq!(status.to_string(), "OutOfPower | NoConnection");
    }

    // ---- Settings ----

    #[test]
    fn test_settings_defaults_from_empty_document() {
        let settings = FlightComputerSettings::from_toml_str("").unwrap();
        assert_eq!(settings, FlightComputerSettings::default());
        assert!(settings.throttle_time_warp);
    }

    #[test]
    fn test_settings_partial_document() {
        let settings = FlightComputerSettings::from_toml_str(
            "total_delay = 5.0\nthrottle_time_warp = false\n",
        )
        .unwrap();
        assert_eq!(settings.total_delay, 5.0);
        assert!(!settings.throttle_time_warp);
        assert_eq!(settings.max_pending_commands, None);
    }

    #[test]
    fn test_settings_reject_negative_delay() {
        let err = FlightComputerSettings::from_toml_str("total_delay = -1.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "total_delay",
                ..
            }
        ));
    }

    #[test]
    fn test_settings_optional_capacity() {
        let settings = FlightComputerSettings::from_toml_str("max_pending_commands = 8").unwrap();
        assert_eq!(settings.max_pending_commands, Some(8));
    }

    #[test]
    fn test_settings_reject_zero_capacity() {
        let err = FlightComputerSettings::from_toml_str("max_pending_commands = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_pending_commands",
                ..
            }
        ));
    }

    #[test]
    fn test_settings_parse_error() {
        let err = FlightComputerSettings::from_toml_str("total_delay = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_settings_missing_file() {
        let err = FlightComputerSettings::from_path("/nonexistent/uplink.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
