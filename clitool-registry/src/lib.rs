//! Tool discovery, filtering, and dispatch.
//!
//! A [`ToolDispatcher`] asks its [`Discoverer`] for every installed tool, runs
//! each candidate through an ordered chain of [`ToolFilter`]s, and keeps the
//! survivors keyed by name. Tools register themselves at link time through
//! [`ToolRegistration`], usually via the `#[cli_tool]` attribute.

#![warn(missing_docs, clippy::pedantic)]

pub mod action;
pub mod discovery;
pub mod dispatcher;
pub mod filter;
pub mod listing;

pub use action::FilterAction;
pub use discovery::{Discoverer, InventoryDiscoverer, StaticDiscoverer, ToolRegistration};
pub use dispatcher::{DispatchError, NameCollision, ToolDispatcher};
pub use filter::{FilterError, FilterResult, PatternFilter, ToolFilter, UniversalFilter};

pub use clitool_primitives::{CliTool, ToolFault, ToolInfo};

#[doc(hidden)]
pub use inventory;
