//! Error types for Folio Interact

use thiserror::Error;

/// Errors that can occur while loading inputs or driving the runtime.
///
/// Controllers themselves never surface errors: absent elements degrade to
/// no-ops. These variants cover the host-facing boundary only.
#[derive(Debug, Error)]
pub enum InteractError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse page description: {0}")]
    PageError(String),

    #[error("Duplicate element id: {0}")]
    DuplicateId(String),

    #[error("Invalid event script: {0}")]
    ScriptError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Script step at {at_ms}ms precedes current time {now_ms}ms")]
    TimeTravel { at_ms: u64, now_ms: u64 },
}
