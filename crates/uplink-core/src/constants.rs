//! Scheduler constants and tuning parameters.

/// How many tick widths ahead the time-warp guard looks for due commands.
pub const TIME_WARP_LOOKAHEAD_TICKS: f64 = 2.0;

/// The guard steps warp down while the tick width exceeds the remaining
/// time-to-due divided by this value.
pub const TIME_WARP_MARGIN_DIVISOR: f64 = 2.0;

/// Message posted each time the guard steps the warp rate down.
pub const TIME_WARP_MESSAGE: &str = "[Flight Computer]: Throttling back time warp...";

/// On-screen duration of the time-warp message (seconds).
pub const TIME_WARP_MESSAGE_SECS: f64 = 4.0;

/// Offset applied to the captured kill-rotation reference (degrees about -X).
pub const KILL_ROT_OFFSET_DEG: f64 = 90.0;
