//! Error types for SpanCore
//!
//! Scanning degrades gracefully (empty text, unknown handles, duplicate titles
//! and overlapping candidates are all normal outcomes). The variants below are
//! the few things a caller can actually get wrong.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotateError {
    /// The caller-supplied user resolver failed for a handle.
    #[error("user resolver failed for @{handle}: {message}")]
    Resolver { handle: String, message: String },

    /// Invalid configuration or hydration payload.
    #[error("configuration error: {0}")]
    Config(String),

    /// The dictionary automaton could not be built.
    #[error("failed to build dictionary automaton: {0}")]
    Automaton(String),
}

impl AnnotateError {
    pub fn resolver(handle: impl Into<String>, message: impl Into<String>) -> Self {
        AnnotateError::Resolver {
            handle: handle.into(),
            message: message.into(),
        }
    }
}

/// Result alias used across the scanner modules
pub type AnnotateResult<T> = Result<T, AnnotateError>;
