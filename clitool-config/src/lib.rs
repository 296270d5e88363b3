//! Configuration management for the tool dispatcher.
//!
//! Covers where the dispatcher reads its tool selection from and the
//! declarative filter rules an embedding program may ship alongside it.

#![warn(missing_docs, clippy::pedantic)]

pub mod environment;
pub mod loader;
pub mod schema;

use thiserror::Error;

pub use environment::{Environment, MapEnvironment, ProcessEnvironment};
pub use schema::{DispatcherConfig, FilterRule, DEFAULT_SELECTION_KEY};

/// Errors raised while loading or validating dispatcher configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// The document is not valid configuration JSON.
    #[error("malformed configuration: {source}")]
    Parse {
        /// Source [`serde_json::Error`].
        #[from]
        source: serde_json::Error,
    },
    /// The document parsed but describes an unusable configuration.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Human-readable reason for rejection.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a validation error from the supplied reason.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
