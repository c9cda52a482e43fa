//! Solver output types shared by every algorithm.

use waymark_kernel::cost::Cost;

/// An optimal path: its total cost and the actions that realize it.
///
/// Every solver returns this same shape. `actions` is empty exactly when the
/// start state is itself an end state.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<A> {
    pub total_cost: Cost,
    pub actions: Vec<A>,
}

impl<A> SearchResult<A> {
    /// Number of transitions on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Counters collected while a solver runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States finalized (popped as non-stale), goal included.
    pub states_explored: u64,
    /// Stale frontier entries discarded on extraction.
    pub stale_discarded: u64,
    /// Strict improvements accepted by the frontier, start insertion included.
    pub relaxations: u64,
    /// Largest heap size observed.
    pub frontier_high_water: u64,
}
