/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback underlying error used when a caller-supplied constructor fails
///
/// Raising operations never fail on their own account: if building the
/// requested error panics, the signal carries one of these instead, with the
/// intended message intact.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[error("{message}")]
#[diagnostic(
    code(throw::generic),
    help("The requested error kind could not be constructed; the original message is preserved.")
)]
pub struct GenericError {
    kind: String,
    message: String,
}

impl GenericError {
    /// Create a generic error standing in for `kind`
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Name of the error kind that was requested
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Configuration errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Unknown field preset: {0}")]
    #[diagnostic(
        code(config::unknown_preset),
        help("Use one of: basic, test, forensic.")
    )]
    UnknownPreset(String),

    #[error("Invalid value for {key}: {value}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Boolean settings accept 1, 0, true or false.")
    )]
    InvalidValue { key: String, value: String },
}

/// Result type for throw configuration and bookkeeping operations
pub type ThrowResult<T> = std::result::Result<T, ConfigError>;
