//! Per-tick systems driven by `FlightComputer`.
//!
//! Systems are plain functions over the pieces of state they touch plus a
//! host bounded on the services they need. They hold no state of their own.

pub mod autopilot;
pub mod delay_line;
pub mod dispatch;
pub mod sync;
pub mod time_warp;
