// SPDX-FileCopyrightText: 2026 Taskpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Taskpilot backend.

use thiserror::Error;

/// The primary error type used across all Taskpilot adapter traits and core operations.
#[derive(Debug, Error)]
pub enum TaskpilotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid caller-supplied input (empty title, update with no fields, malformed arguments).
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist (position out of range, unknown conversation).
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller is not allowed to act on the addressed resource.
    #[error("authorization error: {0}")]
    Authorization(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM provider errors (API failure, token limits, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TaskpilotError {
    /// True for errors a tool should report back to the model as a
    /// structured result rather than aborting the turn.
    pub fn is_tool_reportable(&self) -> bool {
        matches!(
            self,
            TaskpilotError::Validation(_) | TaskpilotError::NotFound(_)
        )
    }
}
