//! Core types and definitions for the uplink flight computer.
//!
//! This crate defines the vocabulary shared across the other crates:
//! identifiers, directives, delayed commands, control frames, settings,
//! and constants. It has no dependency on any simulation framework.

pub mod commands;
pub mod config;
pub mod constants;
pub mod ctrl_state;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod status;
pub mod types;

#[cfg(test)]
mod tests;
