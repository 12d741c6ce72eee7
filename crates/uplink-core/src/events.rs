//! User-facing notifications emitted by the flight computer.

use serde::{Deserialize, Serialize};

use crate::enums::AlertLevel;

/// Transient on-screen message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: AlertLevel,
    pub message: String,
    /// How long the message stays visible.
    pub duration_secs: f64,
}

impl Notification {
    pub fn warning(message: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            level: AlertLevel::Warning,
            message: message.into(),
            duration_secs,
        }
    }
}
