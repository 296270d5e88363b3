//! Core shared types for dispatchable command-line tools.

#![warn(missing_docs, clippy::pedantic)]

mod tool;

/// Tool contract, fault alias, and listing descriptor.
pub use tool::{CliTool, ToolFault, ToolInfo};
