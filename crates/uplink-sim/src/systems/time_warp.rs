//! Time-warp guard: steps warp down so due commands are not skipped.

use tracing::warn;

use uplink_core::constants::{
    TIME_WARP_LOOKAHEAD_TICKS, TIME_WARP_MARGIN_DIVISOR, TIME_WARP_MESSAGE, TIME_WARP_MESSAGE_SECS,
};
use uplink_core::events::Notification;

use crate::command_buffer::CommandBuffer;
use crate::services::{Notifier, TimeWarp};

/// Inspect commands due within the next two tick widths and step the warp
/// rate down while a tick would overshoot half the remaining time-to-due.
/// Returns the number of steps taken.
pub fn run<H: TimeWarp + Notifier>(
    buffer: &CommandBuffer,
    now: f64,
    enabled: bool,
    host: &mut H,
) -> u32 {
    if !enabled || host.current_rate() <= 1.0 {
        return 0;
    }

    let horizon = host.delta_time() * TIME_WARP_LOOKAHEAD_TICKS;
    let mut steps = 0;
    for command in buffer.due_within(now, horizon) {
        let remaining = (command.time_stamp - now).max(0.0) + command.extra_delay;
        while host.delta_time() > remaining / TIME_WARP_MARGIN_DIVISOR
            && host.current_rate() > 1.0
        {
            let index = host.rate_index();
            if index == 0 {
                break;
            }
            host.set_rate_index(index - 1);
            host.post(Notification::warning(TIME_WARP_MESSAGE, TIME_WARP_MESSAGE_SECS));
            warn!(
                command = %command.id,
                rate = host.current_rate(),
                "throttling back time warp"
            );
            steps += 1;
        }
    }
    steps
}
