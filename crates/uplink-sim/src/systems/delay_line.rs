//! Control-state delay line.
//!
//! Raw pilot frames are held back by the link delay and replayed
//! last-write-wins: of all frames due at once only the newest survives.

use tracing::trace;

use uplink_core::ctrl_state::{DelayedFlightCtrlState, FlightCtrlState};

use crate::priority_queue::PriorityQueue;

/// Hold back a copy of `fcs` until `now + delay`.
pub fn record(
    queue: &mut PriorityQueue<DelayedFlightCtrlState>,
    fcs: &FlightCtrlState,
    now: f64,
    delay: f64,
) {
    queue.enqueue(DelayedFlightCtrlState::new(*fcs, now + delay));
}

/// Drain every frame due at `now` and return the newest one, or the idle
/// frame when none is due.
pub fn replay(queue: &mut PriorityQueue<DelayedFlightCtrlState>, now: f64) -> FlightCtrlState {
    let mut latest = FlightCtrlState::default();
    let mut drained = 0usize;
    while let Some(delayed) = queue.dequeue_due(now) {
        latest = delayed.state;
        drained += 1;
    }
    if drained > 1 {
        trace!(discarded = drained - 1, "stale control frames discarded");
    }
    latest
}
