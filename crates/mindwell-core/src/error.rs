//! Core error types for mindwell-core.
//!
//! Most failures in this core are absorbed where they occur (persistence is
//! best-effort, collaborator failures are logged); the typed errors below
//! cover the cases a caller can meaningfully react to.

use thiserror::Error;

/// Core error type for mindwell-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Preset store errors
    #[error("Preset error: {0}")]
    Preset(#[from] PresetError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Preset-store-specific errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PresetError {
    /// Referenced preset id does not exist
    #[error("preset '{0}' not found")]
    NotFound(String),

    /// Seeded presets cannot be renamed, edited, or deleted
    #[error("preset '{0}' is built in and cannot be modified")]
    Immutable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
