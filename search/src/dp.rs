//! Memoized dynamic programming over acyclic state spaces.
//!
//! `future_cost(s)` is zero at end states and otherwise the minimum of
//! `cost + future_cost(next)` over the successors of `s`. Each state is solved
//! once. The recursion is driven by an explicit stack so deep chains (long
//! transportation lines, long queries) cannot overflow the native stack.
//!
//! Only valid when no state can reach itself. A state met again while it is
//! still on the stack is reported as [`SearchError::CyclicStateSpace`].

use std::collections::HashMap;

use tracing::{debug, info};
use waymark_kernel::cost::Cost;
use waymark_kernel::problem::SearchProblem;

use crate::error::SearchError;
use crate::result::SearchResult;

/// A validated outgoing edge.
struct Edge<A, S> {
    action: A,
    next: S,
    cost: Cost,
}

/// The solved value of one state.
struct Plan<A, S> {
    future_cost: Cost,
    /// Minimizing first step; `None` at end states.
    step: Option<Edge<A, S>>,
}

enum Memo<A, S> {
    InProgress,
    /// `None` when no end state is reachable from this state.
    Solved(Option<Plan<A, S>>),
}

/// A state whose successors are being evaluated.
struct Frame<A, S> {
    state: S,
    edges: Vec<Edge<A, S>>,
    next_edge: usize,
    /// `(future cost through edge, edge index)` of the best edge so far.
    best: Option<(Cost, usize)>,
}

/// Find a minimum-cost path by memoized recursion on future cost.
///
/// Equal-cost alternatives keep the first transition in enumeration order.
///
/// # Errors
///
/// - [`SearchError::CyclicStateSpace`] if a state is reachable from itself
/// - [`SearchError::InvalidCost`] on a negative or non-finite transition cost
/// - [`SearchError::Exhausted`] if no end state is reachable from the start
pub fn dynamic_programming<P: SearchProblem>(
    problem: &P,
) -> Result<SearchResult<P::Action>, SearchError> {
    let start = problem.start_state();
    let mut memo: HashMap<P::State, Memo<P::Action, P::State>> = HashMap::new();
    let mut stack: Vec<Frame<P::Action, P::State>> = Vec::new();

    enter(problem, &mut memo, &mut stack, start.clone())?;

    while let Some(frame) = stack.last_mut() {
        if let Some(edge) = frame.edges.get(frame.next_edge) {
            match memo.get(&edge.next) {
                Some(Memo::Solved(plan)) => {
                    if let Some(plan) = plan {
                        let through =
                            edge.cost.checked_add(plan.future_cost).map_err(|reason| {
                                SearchError::invalid_cost(&frame.state, &edge.action, reason)
                            })?;
                        if frame.best.is_none_or(|(best, _)| through < best) {
                            frame.best = Some((through, frame.next_edge));
                        }
                    }
                    frame.next_edge += 1;
                }
                Some(Memo::InProgress) => {
                    let state = format!("{:?}", edge.next);
                    debug!(state = %state, "cycle detected during dynamic programming");
                    return Err(SearchError::CyclicStateSpace { state });
                }
                None => {
                    let next = edge.next.clone();
                    enter(problem, &mut memo, &mut stack, next)?;
                }
            }
        } else {
            let Some(mut frame) = stack.pop() else { break };
            let plan = frame.best.map(|(future_cost, index)| Plan {
                future_cost,
                step: Some(frame.edges.swap_remove(index)),
            });
            memo.insert(frame.state, Memo::Solved(plan));
        }
    }

    let result = replay(&memo, start)?;
    info!(
        problem_id = problem.problem_id(),
        total_cost = %result.total_cost,
        states_memoized = memo.len(),
        "dynamic programming solved"
    );
    Ok(result)
}

/// Solve `state` immediately if it is an end state, otherwise open a frame.
fn enter<P: SearchProblem>(
    problem: &P,
    memo: &mut HashMap<P::State, Memo<P::Action, P::State>>,
    stack: &mut Vec<Frame<P::Action, P::State>>,
    state: P::State,
) -> Result<(), SearchError> {
    if problem.is_end(&state) {
        memo.insert(
            state,
            Memo::Solved(Some(Plan {
                future_cost: Cost::ZERO,
                step: None,
            })),
        );
        return Ok(());
    }

    let edges = problem
        .succ_and_cost(&state)
        .into_iter()
        .map(|t| -> Result<Edge<P::Action, P::State>, SearchError> {
            let cost = Cost::new(t.cost)
                .map_err(|reason| SearchError::invalid_cost(&state, &t.action, reason))?;
            Ok(Edge {
                action: t.action,
                next: t.next,
                cost,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    memo.insert(state.clone(), Memo::InProgress);
    stack.push(Frame {
        state,
        edges,
        next_edge: 0,
        best: None,
    });
    Ok(())
}

/// Follow memoized choices from the start to an end state.
///
/// The total is re-accumulated front to back, the same order uniform-cost
/// search adds costs in, so both solvers report bit-identical totals for the
/// same path.
fn replay<A: Clone + std::fmt::Debug, S: Clone + Eq + std::hash::Hash + std::fmt::Debug>(
    memo: &HashMap<S, Memo<A, S>>,
    start: S,
) -> Result<SearchResult<A>, SearchError> {
    let mut actions = Vec::new();
    let mut total_cost = Cost::ZERO;
    let mut current = start;

    loop {
        match memo.get(&current) {
            Some(Memo::Solved(Some(plan))) => match &plan.step {
                Some(edge) => {
                    total_cost = total_cost.checked_add(edge.cost).map_err(|reason| {
                        SearchError::invalid_cost(&current, &edge.action, reason)
                    })?;
                    actions.push(edge.action.clone());
                    current = edge.next.clone();
                }
                None => {
                    return Ok(SearchResult {
                        total_cost,
                        actions,
                    })
                }
            },
            _ => return Err(SearchError::Exhausted),
        }
    }
}
