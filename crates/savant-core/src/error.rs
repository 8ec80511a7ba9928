// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the Savant assistant.
//!
//! Lower-level adapter errors (provider, storage, channel) are caught at the
//! pipeline boundary and translated into user-facing text; the transport
//! layer never sees a raw source error.

use thiserror::Error;

/// The primary error type used across all Savant adapter traits and pipelines.
#[derive(Debug, Error)]
pub enum SavantError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed user input (e.g. missing project name on create).
    #[error("invalid input: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{kind} not found: {reference}")]
    NotFound { kind: String, reference: String },

    /// A name resolved to more than one record.
    #[error("`{name}` matches {} records", candidates.len())]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    /// LLM provider errors (API failure, quota, unparseable output).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, delivery failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SavantError {
    /// Shorthand for a [`SavantError::NotFound`] with owned strings.
    pub fn not_found(kind: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            reference: reference.into(),
        }
    }

    /// Shorthand for a [`SavantError::Provider`] without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }
}
