//! The contract every dispatchable command-line tool implements.

use std::any;

use serde::{Deserialize, Serialize};

/// Unrecoverable failure raised from inside a tool run.
///
/// The dispatcher never inspects or wraps the fault's cause; it is handed back
/// to the caller exactly as the tool produced it.
pub type ToolFault = anyhow::Error;

/// A command-line tool that can be selected by name and run with arguments.
pub trait CliTool: Send + Sync {
    /// Name used to select the tool.
    fn name(&self) -> &str;

    /// One-line human-readable description shown in tool listings.
    fn description(&self) -> &str;

    /// Runs the tool with the raw argument list.
    ///
    /// Returns `Ok(true)` on success and `Ok(false)` on an ordinary failure.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolFault`] when the tool cannot complete at all.
    fn run_main(&self, args: &[String]) -> Result<bool, ToolFault>;

    /// Identifies the implementing type for pattern matching and collision
    /// reports.
    ///
    /// The default is [`std::any::type_name`], which is descriptive only: it
    /// is not guaranteed unique or stable across compiler versions.
    fn type_name(&self) -> &'static str {
        any::type_name::<Self>()
    }
}

/// Display descriptor for a tool, detached from the tool instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    name: String,
    description: String,
    type_name: String,
}

impl ToolInfo {
    /// Captures the descriptor of the supplied tool.
    #[must_use]
    pub fn of(tool: &dyn CliTool) -> Self {
        Self {
            name: tool.name().to_owned(),
            description: tool.description().to_owned(),
            type_name: tool.type_name().to_owned(),
        }
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the implementing type identifier.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}
