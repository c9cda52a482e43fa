//! Runner: solve one problem under a policy and package the run as a
//! [`ReportBundle`].
//!
//! # Artifacts
//!
//! | name | normative | content |
//! |---|---|---|
//! | `search_policy.json` | yes | canonical policy |
//! | `result.json` | yes | outcome, path, counters, digest bindings |
//! | `search_graph.json` | yes | audit log, present when the policy records it |
//!
//! `result.json` binds the other two by their own domain digests
//! (`search_policy_digest`, `search_graph_digest`), which
//! [`verify_report_bundle`](crate::report::verify_report_bundle) rechecks.

use thiserror::Error;
use tracing::info;
use waymark_kernel::problem::SearchProblem;
use waymark_kernel::proof::canon::{canonical_json_bytes, CanonError};
use waymark_kernel::proof::hash::ContentHash;
use waymark_search::ucs::search;
use waymark_search::{SearchError, SearchPolicy, SearchResult, SearchStats};

use crate::report::{
    build_report_bundle, ReportBuildError, ReportBundle, RESULT_ARTIFACT, SEARCH_GRAPH_ARTIFACT,
    SEARCH_POLICY_ARTIFACT,
};

pub const RESULT_SCHEMA: &str = "result.v1";

/// One solved (or failed) run and its artifacts.
#[derive(Debug, Clone)]
pub struct RunReport<A> {
    pub outcome: Result<SearchResult<A>, SearchError>,
    pub stats: SearchStats,
    pub bundle: ReportBundle,
}

impl<A> RunReport<A> {
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Failure to produce a report. Search failures are not errors here; they
/// are recorded in [`RunReport::outcome`] and in `result.json`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("canonical JSON error: {0}")]
    Canon(#[from] CanonError),
    #[error(transparent)]
    Build(#[from] ReportBuildError),
}

/// Run uniform-cost search on `problem` under `policy` and build the report.
///
/// # Errors
///
/// [`RunError`] if an artifact cannot be serialized.
pub fn run_problem<P: SearchProblem>(
    problem: &P,
    policy: &SearchPolicy,
) -> Result<RunReport<P::Action>, RunError> {
    let run = search(problem, policy);

    let mut inputs = vec![(
        SEARCH_POLICY_ARTIFACT.to_string(),
        policy.to_canonical_json_bytes(),
        true,
    )];

    let graph_digest = match &run.graph {
        Some(graph) => {
            let bytes = graph.to_canonical_json_bytes()?;
            let digest = graph.digest()?;
            inputs.push((SEARCH_GRAPH_ARTIFACT.to_string(), bytes, true));
            Some(digest)
        }
        None => None,
    };

    let result = result_json(
        problem.problem_id(),
        &run.outcome,
        &run.stats,
        policy,
        graph_digest.as_ref(),
    );
    inputs.push((
        RESULT_ARTIFACT.to_string(),
        canonical_json_bytes(&result)?,
        true,
    ));

    let bundle = build_report_bundle(inputs)?;
    info!(
        problem_id = problem.problem_id(),
        outcome = outcome_kind(&run.outcome),
        digest = %bundle.digest,
        "run report built"
    );

    Ok(RunReport {
        outcome: run.outcome,
        stats: run.stats,
        bundle,
    })
}

fn result_json<A: std::fmt::Debug>(
    problem_id: &str,
    outcome: &Result<SearchResult<A>, SearchError>,
    stats: &SearchStats,
    policy: &SearchPolicy,
    graph_digest: Option<&ContentHash>,
) -> serde_json::Value {
    let (total_cost, actions, error) = match outcome {
        Ok(result) => (
            Some(result.total_cost.to_canonical_string()),
            Some(
                result
                    .actions
                    .iter()
                    .map(|a| format!("{a:?}"))
                    .collect::<Vec<_>>(),
            ),
            None,
        ),
        Err(err) => (None, None, Some(err.to_string())),
    };

    serde_json::json!({
        "actions": actions,
        "error": error,
        "outcome": outcome_kind(outcome),
        "problem_id": problem_id,
        "schema_version": RESULT_SCHEMA,
        "search_graph_digest": graph_digest.map(|d| d.as_str().to_string()),
        "search_policy_digest": policy.digest().as_str(),
        "stats": {
            "frontier_high_water": stats.frontier_high_water,
            "relaxations": stats.relaxations,
            "stale_discarded": stats.stale_discarded,
            "states_explored": stats.states_explored,
        },
        "total_cost": total_cost,
    })
}

fn outcome_kind<A>(outcome: &Result<SearchResult<A>, SearchError>) -> &'static str {
    match outcome {
        Ok(_) => "goal_reached",
        Err(SearchError::Exhausted) => "exhausted",
        Err(SearchError::InvalidCost { .. }) => "invalid_cost",
        Err(SearchError::CyclicStateSpace { .. }) => "cyclic_state_space",
        Err(SearchError::ExpansionBudgetExceeded { .. }) => "expansion_budget_exceeded",
        Err(SearchError::InvalidPolicy { .. }) => "invalid_policy",
    }
}
