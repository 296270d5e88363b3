//! Multi-tool command dispatcher.
//!
//! A single executable links any number of independently packaged tools and
//! runs the one named by the `CLI_TOOL` environment variable. Tools register
//! themselves with `#[cli_tool]`; the dispatcher narrows the discovered set
//! through an ordered include/exclude filter chain before selecting by name.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export the tool contract for convenience.
pub use clitool_primitives as primitives;

/// Selection environment and filter configuration.
pub use clitool_config as config;

/// Discovery, filter chain, and dispatch.
pub use clitool_registry as registry;

/// Tool registration attribute (enabled by `macros` feature).
#[cfg(feature = "macros")]
pub use clitool_macros::cli_tool;

/// Tracing bootstrap (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use clitool_telemetry as telemetry;

/// Process-level entry point used by the executable.
pub mod cli;

/// Tools shipped with the dispatcher (enabled by `builtin` feature).
#[cfg(feature = "builtin")]
pub mod builtin;
