//! Command dispatcher: drains due commands into the current command.
//!
//! Only the head of the buffer is ever examined. A head still owing extra
//! delay stalls every command behind it, even ones already due.

use tracing::{debug, info};

use uplink_core::commands::{DelayedCommand, Directive};
use uplink_core::enums::{ActionGroup, FlightMode};
use uplink_core::state::VesselSnapshot;
use uplink_core::types::ProcessorId;

use crate::command_buffer::CommandBuffer;
use crate::current::CurrentCommand;
use crate::priority_queue::PriorityQueue;
use crate::services::{SignalProcessor, TimeWarp, VesselControl};
use crate::systems::autopilot::HoldReferences;

/// Apply every maneuver due at `now`. The newest one wins.
pub fn drain_maneuvers(
    maneuvers: &mut PriorityQueue<DelayedCommand>,
    current: &mut CurrentCommand,
    now: f64,
) {
    while let Some(command) = maneuvers.dequeue_due(now) {
        if let Some(maneuver) = command.maneuver_command() {
            debug!(command = %command.id, ut = maneuver.node.ut, "maneuver applied");
            current.maneuver = Some(*maneuver);
        }
    }
}

/// Execute due commands from the front of the buffer. Returns the commands
/// that were executed (cancels included), in execution order.
pub fn run<H>(
    buffer: &mut CommandBuffer,
    current: &mut CurrentCommand,
    refs: &mut HoldReferences,
    processor: ProcessorId,
    vessel: &VesselSnapshot,
    now: f64,
    host: &mut H,
) -> Vec<DelayedCommand>
where
    H: SignalProcessor + VesselControl + TimeWarp,
{
    let mut executed = Vec::new();

    while let Some(front) = buffer.front_mut() {
        if front.time_stamp > now {
            break;
        }
        if front.extra_delay > 0.0 {
            if host.powered(processor) {
                front.extra_delay -= host.delta_time();
            }
            debug!(command = %front.id, extra_delay = front.extra_delay, "command stalled");
            break;
        }
        // Packed vessels ignore input; leave everything queued for later.
        if vessel.packed {
            break;
        }

        let Some(command) = buffer.pop_front() else {
            break;
        };
        execute(&command, buffer, current, refs, vessel, host);
        executed.push(command);
    }

    executed
}

fn execute<H: VesselControl>(
    command: &DelayedCommand,
    buffer: &mut CommandBuffer,
    current: &mut CurrentCommand,
    refs: &mut HoldReferences,
    vessel: &VesselSnapshot,
    host: &mut H,
) {
    match &command.directive {
        Directive::ActionGroup(action) => {
            host.toggle_action_group(vessel.id, action.group);
            if action.group == ActionGroup::Stage && !host.stage_locked() {
                host.activate_next_stage(vessel.id);
            }
            if action.group == ActionGroup::Rcs {
                host.toggle_rcs_lock();
            }
            info!(command = %command.id, group = ?action.group, "action group toggled");
        }
        Directive::Attitude(attitude) => {
            refs.kill_rot = vessel.rotation;
            current.set_attitude(command.id, *attitude);
            if attitude.mode == FlightMode::Off {
                host.set_action_group(vessel.id, ActionGroup::Sas, false);
            }
            info!(
                command = %command.id,
                mode = ?attitude.mode,
                frame = ?attitude.frame,
                attitude = ?attitude.attitude,
                "attitude command executed"
            );
        }
        Directive::Burn(burn) => {
            refs.last_velocity = vessel.orbital_velocity;
            current.burn = Some(*burn);
            info!(
                command = %command.id,
                throttle = burn.throttle,
                duration = burn.duration,
                delta_v = burn.delta_v,
                "burn command executed"
            );
        }
        Directive::Event(event) => {
            host.invoke_event(vessel.id, &event.event);
            info!(command = %command.id, event = %event.event.name, "event invoked");
        }
        Directive::Target(target) => {
            current.target = target.target.is_some().then_some(*target);
            info!(command = %command.id, target = ?target.target, "target command executed");
        }
        Directive::Maneuver(maneuver) => {
            current.maneuver = Some(*maneuver);
            info!(command = %command.id, ut = maneuver.node.ut, "maneuver command executed");
        }
        Directive::Cancel(cancel) => {
            let removed = buffer.remove(cancel.target).is_some();
            let active = current.is_active(cancel.target);
            if active {
                current.reset_attitude();
                host.set_action_group(vessel.id, ActionGroup::Sas, false);
            }
            info!(
                command = %command.id,
                target = %cancel.target,
                removed,
                active,
                "cancel resolved"
            );
        }
    }
}
