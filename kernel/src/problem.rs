//! Search problem contract.

use std::fmt::Debug;
use std::hash::Hash;

/// One outgoing edge of a state: the label, where it leads, and what it costs.
///
/// `cost` is a raw `f64` as the problem computed it. Solvers validate it with
/// [`crate::cost::Cost::new`] before use.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<A, S> {
    /// Label returned to the caller as part of a solution path.
    pub action: A,
    /// Destination state.
    pub next: S,
    /// Must be finite and `>= 0`.
    pub cost: f64,
}

impl<A, S> Transition<A, S> {
    #[must_use]
    pub fn new(action: A, next: S, cost: f64) -> Self {
        Self { action, next, cost }
    }
}

/// Trait for state spaces that a solver can search.
///
/// # Contract
///
/// - `start_state` is called exactly once per search.
/// - `is_end` is a pure predicate: no side effects, stable for a given state.
/// - `succ_and_cost` returns a finite list and is never called by the
///   uniform-cost engine on a state for which `is_end` holds.
/// - Every transition cost is finite and non-negative. Solvers reject
///   violations with an error rather than returning a wrong answer.
/// - Enumeration must be deterministic: same state → same transitions in the
///   same order. Tie-breaking between equally cheap paths depends on it.
///
/// Implementations hold whatever domain data they need (cost tables, cost
/// closures) from construction time. The solver never inspects `State` or
/// `Action` beyond equality, hashing, and `Debug` rendering for audit logs.
pub trait SearchProblem {
    /// Node identity in the implicit transition graph.
    type State: Clone + Eq + Hash + Debug;
    /// Transition label, meaningful only to the caller.
    type Action: Clone + Debug;

    /// Stable identifier recorded in audit artifacts.
    fn problem_id(&self) -> &str;

    /// The unique initial state.
    fn start_state(&self) -> Self::State;

    /// Whether `state` is an accepting state.
    fn is_end(&self, state: &Self::State) -> bool;

    /// All outgoing transitions from `state`.
    fn succ_and_cost(&self, state: &Self::State) -> Vec<Transition<Self::Action, Self::State>>;
}

impl<P: SearchProblem + ?Sized> SearchProblem for &P {
    type State = P::State;
    type Action = P::Action;

    fn problem_id(&self) -> &str {
        (**self).problem_id()
    }

    fn start_state(&self) -> Self::State {
        (**self).start_state()
    }

    fn is_end(&self, state: &Self::State) -> bool {
        (**self).is_end(state)
    }

    fn succ_and_cost(&self, state: &Self::State) -> Vec<Transition<Self::Action, Self::State>> {
        (**self).succ_and_cost(state)
    }
}
