//! Error types for configuration and host lookups.
//!
//! Scheduling itself never fails: dropped input and unreachable links are
//! policy branches, not errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ProcessorId, VesselId};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum UplinkError {
    #[error("vessel {0:?} is not available")]
    VesselUnavailable(VesselId),
    #[error("unknown signal processor {0:?}")]
    UnknownProcessor(ProcessorId),
}
