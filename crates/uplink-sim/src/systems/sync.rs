//! Synchronization with target and maneuver changes made outside the
//! flight computer.

use uplink_core::commands::{DelayedCommand, ManeuverNode};
use uplink_core::types::TargetRef;

use crate::command_buffer::CommandBuffer;
use crate::current::CurrentCommand;
use crate::priority_queue::PriorityQueue;

/// Whether the simulation's target differs from the current command's and
/// no command selecting it is already pending.
pub fn target_update_needed(
    current: &CurrentCommand,
    buffer: &CommandBuffer,
    active: Option<TargetRef>,
) -> bool {
    let current_target = current.target.and_then(|t| t.target);
    if current_target == active {
        return false;
    }
    !buffer
        .iter()
        .any(|dc| dc.target_command().is_some_and(|t| t.target == active))
}

/// The first maneuver node if it differs from the current maneuver and no
/// maneuver with the same delta-v is already queued.
pub fn maneuver_update(
    current: &CurrentCommand,
    maneuvers: &PriorityQueue<DelayedCommand>,
    nodes: &[ManeuverNode],
) -> Option<ManeuverNode> {
    let first = nodes.first()?;
    let unchanged = current
        .maneuver
        .is_some_and(|m| m.node.delta_v == first.delta_v);
    if unchanged {
        return None;
    }
    let pending = maneuvers.any(|dc| {
        dc.maneuver_command()
            .is_some_and(|m| m.node.delta_v == first.delta_v)
    });
    (!pending).then_some(*first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use uplink_core::commands::{ManeuverCommand, TargetCommand};
    use uplink_core::types::VesselId;

    fn node(dv: DVec3) -> ManeuverNode {
        ManeuverNode { ut: 500.0, delta_v: dv }
    }

    #[test]
    fn test_target_update_on_new_selection() {
        let current = CurrentCommand::new();
        let buffer = CommandBuffer::new();
        let target = Some(TargetRef::Vessel { id: VesselId(9) });
        assert!(target_update_needed(&current, &buffer, target));
        assert!(!target_update_needed(&current, &buffer, None));
    }

    #[test]
    fn test_target_update_on_deselection() {
        let mut current = CurrentCommand::new();
        current.target = Some(TargetCommand {
            target: Some(TargetRef::Vessel { id: VesselId(9) }),
        });
        let buffer = CommandBuffer::new();
        assert!(target_update_needed(&current, &buffer, None));
    }

    #[test]
    fn test_target_update_suppressed_when_pending() {
        let current = CurrentCommand::new();
        let mut buffer = CommandBuffer::new();
        let target = Some(TargetRef::Vessel { id: VesselId(9) });
        buffer.insert(DelayedCommand::target(0.0, target));
        assert!(!target_update_needed(&current, &buffer, target));
    }

    #[test]
    fn test_maneuver_update_none_without_nodes() {
        let current = CurrentCommand::new();
        let queue = PriorityQueue::new();
        assert!(maneuver_update(&current, &queue, &[]).is_none());
    }

    #[test]
    fn test_maneuver_update_skips_current_and_pending() {
        let mut current = CurrentCommand::new();
        let mut queue = PriorityQueue::new();
        let nodes = [node(DVec3::X)];

        assert_eq!(maneuver_update(&current, &queue, &nodes), Some(nodes[0]));

        queue.enqueue(DelayedCommand::maneuver(0.0, nodes[0]));
        assert!(maneuver_update(&current, &queue, &nodes).is_none());

        queue.clear();
        current.maneuver = Some(ManeuverCommand { node: nodes[0] });
        assert!(maneuver_update(&current, &queue, &nodes).is_none());

        let changed = [node(DVec3::Y)];
        assert_eq!(maneuver_update(&current, &queue, &changed), Some(changed[0]));
    }
}
