//! Verdicts produced by filters.

use serde::{Deserialize, Serialize};

/// Outcome of evaluating one filter against one tool candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterAction {
    /// Candidate is kept unless a later filter excludes it.
    Include,
    /// Candidate is dropped unless a later filter includes it.
    Exclude,
    /// Filter has no opinion; the running verdict is left as is.
    Noop,
}

impl FilterAction {
    /// Folds this action into the running verdict of a filter chain.
    #[must_use]
    pub const fn apply(self, verdict: bool) -> bool {
        match self {
            Self::Include => true,
            Self::Exclude => false,
            Self::Noop => verdict,
        }
    }

    /// Action returned by a matching rule of the given inclusivity.
    #[must_use]
    pub const fn on_match(include: bool) -> Self {
        if include { Self::Include } else { Self::Exclude }
    }
}
