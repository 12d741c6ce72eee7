//! Signal-delay flight computer for remotely controlled vessels.
//!
//! `FlightComputer` buffers commands and control input, holds them back for
//! the link delay, and replays them once due. All external state arrives
//! through the narrow contracts in `services`, so the engine is headless and
//! deterministic under test.

pub mod command_buffer;
pub mod current;
pub mod flight_computer;
pub mod priority_queue;
pub mod services;
pub mod systems;

pub use flight_computer::{FlightComputer, PilotHandle};
pub use uplink_core as core;
