//! Filters that narrow the discovered tool set.

use clitool_primitives::CliTool;
use regex::Regex;
use thiserror::Error;

use crate::action::FilterAction;

/// Errors raised while building filters.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A pattern is not a valid regular expression.
    #[error("invalid filter pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The pattern as supplied by the caller.
        pattern: String,
        /// Compilation error reported by the regex engine.
        #[source]
        source: regex::Error,
    },
}

/// Result alias for filter construction.
pub type FilterResult<T> = Result<T, FilterError>;

/// A rule evaluated against every discovered tool candidate.
pub trait ToolFilter: Send + Sync {
    /// Returns the verdict of this rule for `tool`.
    fn apply(&self, tool: &dyn CliTool) -> FilterAction;
}

impl<F> ToolFilter for F
where
    F: Fn(&dyn CliTool) -> FilterAction + Send + Sync,
{
    fn apply(&self, tool: &dyn CliTool) -> FilterAction {
        (self)(tool)
    }
}

/// Filter returning the same action for every candidate.
///
/// Seeds a chain with its default verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniversalFilter {
    action: FilterAction,
}

impl UniversalFilter {
    /// Creates a filter that always yields `action`.
    #[must_use]
    pub const fn new(action: FilterAction) -> Self {
        Self { action }
    }

    /// Returns the fixed action.
    #[must_use]
    pub const fn action(&self) -> FilterAction {
        self.action
    }
}

impl ToolFilter for UniversalFilter {
    fn apply(&self, _tool: &dyn CliTool) -> FilterAction {
        self.action
    }
}

/// Filter matching the tool name and/or implementing type against anchored
/// regular expressions.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    name: Option<Regex>,
    type_name: Option<Regex>,
    on_match: FilterAction,
}

impl PatternFilter {
    /// Compiles the supplied patterns into a filter.
    ///
    /// Each pattern must match the whole name or type identifier; `"foo"` does
    /// not match `"foobar"`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPattern`] if either pattern fails to
    /// compile.
    pub fn new(name: Option<&str>, type_name: Option<&str>, include: bool) -> FilterResult<Self> {
        Ok(Self {
            name: name.map(compile_anchored).transpose()?,
            type_name: type_name.map(compile_anchored).transpose()?,
            on_match: FilterAction::on_match(include),
        })
    }

    /// Returns the action produced on a match.
    #[must_use]
    pub const fn on_match(&self) -> FilterAction {
        self.on_match
    }
}

impl ToolFilter for PatternFilter {
    fn apply(&self, tool: &dyn CliTool) -> FilterAction {
        if self.name.as_ref().is_some_and(|re| re.is_match(tool.name())) {
            return self.on_match;
        }
        if self
            .type_name
            .as_ref()
            .is_some_and(|re| re.is_match(tool.type_name()))
        {
            return self.on_match;
        }
        FilterAction::Noop
    }
}

fn compile_anchored(pattern: &str) -> FilterResult<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| FilterError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    })
}
