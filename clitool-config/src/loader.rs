//! Configuration loader implementations.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{ConfigResult, DispatcherConfig};

/// Environment key naming a JSON configuration file for the executable.
pub const CONFIG_PATH_KEY: &str = "CLI_TOOL_CONFIG";

/// Parses and validates a configuration document.
///
/// # Errors
///
/// Returns [`crate::ConfigError::Parse`] for malformed JSON and
/// [`crate::ConfigError::Invalid`] when validation fails.
pub fn from_json_str(document: &str) -> ConfigResult<DispatcherConfig> {
    let config: DispatcherConfig = serde_json::from_str(document)?;
    config.validate()?;
    Ok(config)
}

/// Reads, parses, and validates the configuration file at `path`.
///
/// # Errors
///
/// Returns [`crate::ConfigError::Io`] when the file cannot be read, otherwise
/// the same errors as [`from_json_str`].
pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<DispatcherConfig> {
    let path = path.as_ref();
    let document = fs::read_to_string(path)?;
    let config = from_json_str(&document)?;
    debug!(
        path = %path.display(),
        filters = config.filters().len(),
        "loaded dispatcher configuration"
    );
    Ok(config)
}
