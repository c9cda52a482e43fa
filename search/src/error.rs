//! Typed search errors.
//!
//! Every failure is terminal for the `solve` call that produced it. An
//! unreachable goal is an ordinary outcome and is reported as
//! [`SearchError::Exhausted`], not a panic.

use thiserror::Error;
use waymark_kernel::cost::CostError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// No end state is reachable from the start state.
    #[error("search exhausted: no end state is reachable from the start state")]
    Exhausted,

    /// A transition carried a negative or non-finite cost.
    ///
    /// `state` and `action` are `Debug` renderings of the offending edge.
    #[error("invalid transition cost from {state} via {action}: {reason}")]
    InvalidCost {
        state: String,
        action: String,
        #[source]
        reason: CostError,
    },

    /// The dynamic-programming solver reached a state that is still being
    /// evaluated, so the state space contains a cycle.
    #[error("state space is cyclic: {state} was revisited while in progress")]
    CyclicStateSpace { state: String },

    /// The policy's expansion budget ran out before a goal was finalized.
    #[error("expansion budget of {limit} exceeded")]
    ExpansionBudgetExceeded { limit: u64 },

    /// The policy was rejected before any search step ran.
    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },
}

impl SearchError {
    /// `true` for failures that mean "no path was found" rather than "the
    /// problem or configuration is broken".
    #[must_use]
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::Exhausted | Self::ExpansionBudgetExceeded { .. })
    }

    pub(crate) fn invalid_cost(
        state: &impl std::fmt::Debug,
        action: &impl std::fmt::Debug,
        reason: CostError,
    ) -> Self {
        Self::InvalidCost {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
            reason,
        }
    }
}
