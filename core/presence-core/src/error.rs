//! Error types for presence-core operations.
//!
//! The snapshot core itself is infallible; these cover the settings file and
//! event scripts that feed it.

use std::path::PathBuf;

/// All errors that can occur around the presence state core.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration directory not found")]
    ConfigDirNotFound,

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Configuration write failed: {path}: {source}")]
    ConfigWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Replay Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Event script malformed at line {line}: {details}")]
    ScriptMalformed { line: usize, details: String },

    #[error("Project not tracked: {0}")]
    UnknownProject(String),

    #[error("File not known: {0}")]
    UnknownFile(String),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using PresenceError.
pub type Result<T> = std::result::Result<T, PresenceError>;
