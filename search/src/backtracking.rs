//! Exhaustive backtracking: the reference oracle.
//!
//! Enumerates every action sequence from the start state, depth first, and
//! keeps the cheapest one that ends in an end state. Exponential; meant for
//! cross-checking the real solvers on small instances.

use waymark_kernel::cost::Cost;
use waymark_kernel::problem::SearchProblem;

use crate::error::SearchError;
use crate::result::SearchResult;

/// Find a minimum-cost path by trying all paths of at most `max_depth` steps.
///
/// The depth bound makes the oracle terminate on cyclic state spaces; it is
/// exact whenever some optimal path fits within the bound. The first of
/// several equally cheap paths (in enumeration order) wins.
///
/// # Errors
///
/// - [`SearchError::Exhausted`] if no end state is reached within `max_depth`
/// - [`SearchError::InvalidCost`] on a negative or non-finite transition cost
pub fn backtracking_search<P: SearchProblem>(
    problem: &P,
    max_depth: usize,
) -> Result<SearchResult<P::Action>, SearchError> {
    let mut search = Backtracker {
        problem,
        history: Vec::new(),
        best: None,
    };
    search.recurse(problem.start_state(), Cost::ZERO, max_depth)?;
    search.best.ok_or(SearchError::Exhausted)
}

struct Backtracker<'a, P: SearchProblem> {
    problem: &'a P,
    history: Vec<P::Action>,
    best: Option<SearchResult<P::Action>>,
}

impl<P: SearchProblem> Backtracker<'_, P> {
    fn recurse(
        &mut self,
        state: P::State,
        total_cost: Cost,
        remaining: usize,
    ) -> Result<(), SearchError> {
        if self.problem.is_end(&state) {
            if self
                .best
                .as_ref()
                .is_none_or(|best| total_cost < best.total_cost)
            {
                self.best = Some(SearchResult {
                    total_cost,
                    actions: self.history.clone(),
                });
            }
            return Ok(());
        }
        if remaining == 0 {
            return Ok(());
        }

        for transition in self.problem.succ_and_cost(&state) {
            let cost = Cost::new(transition.cost).map_err(|reason| {
                SearchError::invalid_cost(&state, &transition.action, reason)
            })?;
            let total_cost = total_cost.checked_add(cost).map_err(|reason| {
                SearchError::invalid_cost(&state, &transition.action, reason)
            })?;
            self.history.push(transition.action);
            self.recurse(transition.next, total_cost, remaining - 1)?;
            self.history.pop();
        }
        Ok(())
    }
}
