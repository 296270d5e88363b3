//! Strongly typed dispatcher configuration.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Environment key consulted for the tool name when none is configured.
pub const DEFAULT_SELECTION_KEY: &str = "CLI_TOOL";

/// Declarative dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatcherConfig {
    #[serde(default = "default_selection_key")]
    selection_key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    filters: Vec<FilterRule>,
}

fn default_selection_key() -> String {
    DEFAULT_SELECTION_KEY.to_owned()
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            selection_key: default_selection_key(),
            filters: Vec::new(),
        }
    }
}

impl DispatcherConfig {
    /// Creates a configuration with the default selection key and no filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the environment key that names the tool to run.
    #[must_use]
    pub fn with_selection_key(mut self, key: impl Into<String>) -> Self {
        self.selection_key = key.into();
        self
    }

    /// Appends a filter rule.
    #[must_use]
    pub fn with_filter(mut self, rule: FilterRule) -> Self {
        self.filters.push(rule);
        self
    }

    /// Returns the environment key that names the tool to run.
    #[must_use]
    pub fn selection_key(&self) -> &str {
        &self.selection_key
    }

    /// Returns the filter rules in application order.
    #[must_use]
    pub fn filters(&self) -> &[FilterRule] {
        &self.filters
    }

    /// Checks the configuration for unusable values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the selection key is blank or a
    /// rule carries neither a name nor a type pattern.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.selection_key.trim().is_empty() {
            return Err(ConfigError::invalid("selection key cannot be empty"));
        }
        for (index, rule) in self.filters.iter().enumerate() {
            if rule.name.is_none() && rule.type_name.is_none() {
                return Err(ConfigError::invalid(format!(
                    "filter #{index} must set a name or type_name pattern"
                )));
            }
        }
        Ok(())
    }
}

/// A single include or exclude rule matched against tool name and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterRule {
    include: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
}

impl FilterRule {
    /// Rule that includes tools whose name matches `pattern`.
    #[must_use]
    pub fn include_name(pattern: impl Into<String>) -> Self {
        Self::new(true, Some(pattern.into()), None)
    }

    /// Rule that excludes tools whose name matches `pattern`.
    #[must_use]
    pub fn exclude_name(pattern: impl Into<String>) -> Self {
        Self::new(false, Some(pattern.into()), None)
    }

    /// Rule that includes tools whose implementing type matches `pattern`.
    #[must_use]
    pub fn include_type(pattern: impl Into<String>) -> Self {
        Self::new(true, None, Some(pattern.into()))
    }

    /// Rule that excludes tools whose implementing type matches `pattern`.
    #[must_use]
    pub fn exclude_type(pattern: impl Into<String>) -> Self {
        Self::new(false, None, Some(pattern.into()))
    }

    /// Creates a rule from its raw parts.
    #[must_use]
    pub fn new(include: bool, name: Option<String>, type_name: Option<String>) -> Self {
        Self {
            include,
            name,
            type_name,
        }
    }

    /// Returns `true` for include rules.
    #[must_use]
    pub fn is_include(&self) -> bool {
        self.include
    }

    /// Returns the name pattern.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the implementing-type pattern.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}
