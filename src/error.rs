//! Error types for the bot core.
//!
//! Startup errors ([`CommandListError`], and `ConfigError` in the config
//! module) are fatal. [`FaderError`] is a usage error reported back to chat.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Command list errors (startup)
// ============================================================================

/// Errors loading the persisted command list.
#[derive(Debug, Error)]
pub enum CommandListError {
    #[error("failed to create command list path {path}: {source}")]
    StoragePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open command list file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed command list {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CommandListError {
    /// Get a static error code string for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::StoragePath { .. } => "storage_path",
            Self::Io { .. } => "io",
            Self::Json { .. } => "json",
        }
    }
}

// ============================================================================
// Fader errors (usage)
// ============================================================================

/// Errors parsing a `!volume` argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaderError {
    #[error("no volume specified")]
    NoVolume,

    #[error("{0:?} is not a positive whole number")]
    InvalidNumber(String),
}
