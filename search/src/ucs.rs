//! Uniform-cost search: entry points and expansion loop.
//!
//! Dijkstra's algorithm over an implicit graph. The first time a state leaves
//! the frontier as a non-stale entry its priority is its true shortest-path
//! cost: every other frontier entry is at least as expensive, and costs are
//! non-negative, so no unexplored detour can undercut it. The engine relies on
//! that and nothing else; it never looks inside states or actions.

use std::collections::HashMap;

use tracing::{info, trace};
use waymark_kernel::cost::Cost;
use waymark_kernel::problem::{SearchProblem, Transition};

use crate::error::SearchError;
use crate::frontier::PriorityQueue;
use crate::graph::{
    ExpandEvent, SearchGraph, SearchGraphMetadata, SuccessorOutcome, SuccessorRecord, Termination,
};
use crate::policy::SearchPolicy;
use crate::result::{SearchResult, SearchStats};

/// Everything a uniform-cost run produced.
///
/// `stats` and `graph` are filled in whether or not a goal was reached, so a
/// failed run can still be inspected.
#[derive(Debug, Clone)]
pub struct SearchRun<A> {
    pub outcome: Result<SearchResult<A>, SearchError>,
    pub stats: SearchStats,
    /// Present when the policy set `record_graph`.
    pub graph: Option<SearchGraph>,
}

impl<A> SearchRun<A> {
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Drop the diagnostics and keep the outcome.
    ///
    /// # Errors
    ///
    /// Returns the run's [`SearchError`] if it did not reach a goal.
    pub fn into_result(self) -> Result<SearchResult<A>, SearchError> {
        self.outcome
    }
}

/// Find a minimum-cost path with default settings and no audit log.
///
/// # Errors
///
/// - [`SearchError::Exhausted`] if no end state is reachable
/// - [`SearchError::InvalidCost`] if a transition cost is negative or not finite
pub fn solve<P: SearchProblem>(problem: &P) -> Result<SearchResult<P::Action>, SearchError> {
    let policy = SearchPolicy {
        record_graph: false,
        ..SearchPolicy::default()
    };
    search(problem, &policy).outcome
}

/// Run uniform-cost search under `policy`.
///
/// All terminations, including policy rejection, come back as a
/// [`SearchRun`] whose `outcome` says what happened.
pub fn search<P: SearchProblem>(problem: &P, policy: &SearchPolicy) -> SearchRun<P::Action> {
    info!(
        problem_id = problem.problem_id(),
        max_expansions = ?policy.max_expansions,
        "uniform-cost search started"
    );

    if let Err(err) = policy.validate() {
        let graph = policy.record_graph.then(|| SearchGraph {
            expansions: Vec::new(),
            metadata: SearchGraphMetadata {
                problem_id: problem.problem_id().to_string(),
                start_state: String::new(),
                termination: Termination::InvalidPolicy,
                total_expansions: 0,
                stale_discarded: 0,
                frontier_high_water: 0,
            },
        });
        return SearchRun {
            outcome: Err(err),
            stats: SearchStats::default(),
            graph,
        };
    }

    let start = problem.start_state();
    let start_rendered = format!("{start:?}");
    let mut engine = Engine::new(problem, policy);
    let outcome = engine.run(start);

    engine.stats.stale_discarded = engine.frontier.stale_discarded();
    engine.stats.frontier_high_water = engine.frontier.high_water();
    let stats = engine.stats;

    match &outcome {
        Ok(result) => info!(
            problem_id = problem.problem_id(),
            total_cost = %result.total_cost,
            path_len = result.actions.len(),
            states_explored = stats.states_explored,
            "uniform-cost search reached a goal"
        ),
        Err(err) => info!(
            problem_id = problem.problem_id(),
            states_explored = stats.states_explored,
            error = %err,
            "uniform-cost search failed"
        ),
    }

    let graph = engine.expansions.map(|expansions| SearchGraph {
        metadata: SearchGraphMetadata {
            problem_id: problem.problem_id().to_string(),
            start_state: start_rendered,
            termination: termination_of(&outcome),
            total_expansions: expansions.len() as u64,
            stale_discarded: stats.stale_discarded,
            frontier_high_water: stats.frontier_high_water,
        },
        expansions,
    });

    SearchRun {
        outcome,
        stats,
        graph,
    }
}

fn termination_of<A>(outcome: &Result<SearchResult<A>, SearchError>) -> Termination {
    match outcome {
        Ok(result) => Termination::GoalReached {
            total_cost: result.total_cost,
        },
        Err(SearchError::ExpansionBudgetExceeded { limit }) => {
            Termination::ExpansionBudgetExceeded { limit: *limit }
        }
        Err(SearchError::InvalidCost { .. }) => Termination::InvalidCost,
        Err(SearchError::InvalidPolicy { .. }) => Termination::InvalidPolicy,
        Err(SearchError::Exhausted | SearchError::CyclicStateSpace { .. }) => {
            Termination::FrontierExhausted
        }
    }
}

/// Per-run bookkeeping. Created fresh by [`search`] and dropped when it returns.
struct Engine<'a, P: SearchProblem> {
    problem: &'a P,
    policy: &'a SearchPolicy,
    frontier: PriorityQueue<P::State>,
    /// Provisional, then final, predecessor of each reached state.
    back_pointers: HashMap<P::State, (P::Action, P::State)>,
    expansions: Option<Vec<ExpandEvent>>,
    stats: SearchStats,
}

impl<'a, P: SearchProblem> Engine<'a, P> {
    fn new(problem: &'a P, policy: &'a SearchPolicy) -> Self {
        Self {
            problem,
            policy,
            frontier: PriorityQueue::new(),
            back_pointers: HashMap::new(),
            expansions: policy.record_graph.then(Vec::new),
            stats: SearchStats::default(),
        }
    }

    fn run(&mut self, start: P::State) -> Result<SearchResult<P::Action>, SearchError> {
        self.frontier.update(start, Cost::ZERO);
        self.stats.relaxations += 1;
        let mut expanded: u64 = 0;

        loop {
            let (state, past_cost) = self.frontier.remove_min()?;
            self.stats.states_explored += 1;

            if self.problem.is_end(&state) {
                self.open_event(&state, past_cost, true);
                let actions = self.reconstruct_actions(state);
                return Ok(SearchResult {
                    total_cost: past_cost,
                    actions,
                });
            }

            if let Some(limit) = self.policy.max_expansions {
                if expanded >= limit {
                    return Err(SearchError::ExpansionBudgetExceeded { limit });
                }
            }
            expanded += 1;

            trace!(state = ?state, past_cost = %past_cost, "expanding");
            self.open_event(&state, past_cost, false);
            for transition in self.problem.succ_and_cost(&state) {
                self.relax(&state, past_cost, transition)?;
            }
        }
    }

    /// Offer one successor of the finalized `state` to the frontier.
    fn relax(
        &mut self,
        state: &P::State,
        past_cost: Cost,
        transition: Transition<P::Action, P::State>,
    ) -> Result<(), SearchError> {
        let Transition { action, next, cost } = transition;
        let cost =
            Cost::new(cost).map_err(|reason| SearchError::invalid_cost(state, &action, reason))?;
        let rendered = self
            .expansions
            .is_some()
            .then(|| (format!("{action:?}"), format!("{next:?}")));

        let outcome = if self.frontier.is_done(&next) {
            SuccessorOutcome::AlreadyFinalized
        } else {
            let candidate = past_cost
                .checked_add(cost)
                .map_err(|reason| SearchError::invalid_cost(state, &action, reason))?;
            if self.frontier.update(next.clone(), candidate) {
                trace!(next = ?next, priority = %candidate, "relaxed");
                self.stats.relaxations += 1;
                self.back_pointers.insert(next, (action, state.clone()));
                SuccessorOutcome::Relaxed {
                    priority: candidate,
                }
            } else {
                SuccessorOutcome::NotImproved
            }
        };

        if let (Some((action, next)), Some(event)) = (
            rendered,
            self.expansions.as_mut().and_then(|e| e.last_mut()),
        ) {
            event.successors.push(SuccessorRecord {
                action,
                next,
                cost,
                outcome,
            });
        }
        Ok(())
    }

    fn open_event(&mut self, state: &P::State, priority: Cost, is_end: bool) {
        if let Some(expansions) = self.expansions.as_mut() {
            expansions.push(ExpandEvent {
                expansion_order: expansions.len() as u64,
                state: format!("{state:?}"),
                priority,
                is_end,
                successors: Vec::new(),
            });
        }
    }

    /// Walk back-pointers from `goal` to the start and reverse.
    ///
    /// Each back-pointer targets a state finalized before the one holding it,
    /// so the walk terminates at the start, which never receives one.
    fn reconstruct_actions(&self, goal: P::State) -> Vec<P::Action> {
        let mut actions = Vec::new();
        let mut current = goal;
        while let Some((action, previous)) = self.back_pointers.get(&current) {
            actions.push(action.clone());
            current = previous.clone();
        }
        actions.reverse();
        actions
    }
}
