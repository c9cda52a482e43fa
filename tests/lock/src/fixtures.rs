//! Problem fixtures and helpers for lock tests.
//!
//! Everything here is deterministic: the same arguments always build the
//! same problem.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use waymark_harness::lexicon::Lexicon;
use waymark_harness::report::{build_report_bundle, ReportBundle, RESULT_ARTIFACT};
use waymark_kernel::cost::Cost;
use waymark_kernel::problem::{SearchProblem, Transition};
use waymark_kernel::proof::canon::canonical_json_bytes;

/// Corpus for the toy language model used across text tests.
pub const TOY_CORPUS: &str = "\
the cat sat on the mat
the cat ate the rat
a hat on a cat
the dog saw the cat
";

#[must_use]
pub fn toy_lexicon() -> Lexicon {
    Lexicon::from_text(TOY_CORPUS)
}

/// A seeded random directed graph over nodes `0..nodes`.
///
/// Node 0 is the start. Edge costs are small integers, zero included, so
/// cost sums are exact and ties are common.
#[derive(Debug, Clone)]
pub struct RandomGraph {
    id: String,
    /// `edges[u]` = `(edge id, target, cost)`.
    edges: Vec<Vec<(usize, usize, f64)>>,
    goals: BTreeSet<usize>,
}

impl RandomGraph {
    /// Build a graph with up to `max_out` edges per node.
    ///
    /// With `acyclic`, every edge goes to a higher-numbered node.
    ///
    /// # Panics
    ///
    /// If `nodes` is zero.
    #[must_use]
    pub fn generate(seed: u64, nodes: usize, max_out: usize, acyclic: bool) -> Self {
        assert!(nodes > 0, "graph needs at least one node");
        let mut rng = StdRng::seed_from_u64(seed);
        let mut next_id = 0;
        let mut edges = Vec::with_capacity(nodes);
        for from in 0..nodes {
            let mut out = Vec::new();
            let lowest = if acyclic { from + 1 } else { 0 };
            if lowest < nodes {
                for _ in 0..rng.random_range(0..=max_out) {
                    let to = rng.random_range(lowest..nodes);
                    let cost = f64::from(rng.random_range(0..=5_u8));
                    out.push((next_id, to, cost));
                    next_id += 1;
                }
            }
            edges.push(out);
        }

        let mut goals = BTreeSet::new();
        goals.insert(nodes - 1);
        if nodes > 2 && rng.random_bool(0.5) {
            goals.insert(rng.random_range(1..nodes - 1));
        }

        Self {
            id: format!("random_graph_s{seed}_n{nodes}"),
            edges,
            goals,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }
}

impl SearchProblem for RandomGraph {
    type State = usize;
    type Action = usize;

    fn problem_id(&self) -> &str {
        &self.id
    }

    fn start_state(&self) -> usize {
        0
    }

    fn is_end(&self, state: &usize) -> bool {
        self.goals.contains(state)
    }

    fn succ_and_cost(&self, state: &usize) -> Vec<Transition<usize, usize>> {
        self.edges[*state]
            .iter()
            .map(|&(id, to, cost)| Transition::new(id, to, cost))
            .collect()
    }
}

/// Follow `actions` from the start state, taking the first transition whose
/// label matches at each step.
///
/// Returns the accumulated cost and the final state, or `None` if some
/// action is not available or carries an invalid cost.
pub fn replay_path<P>(problem: &P, actions: &[P::Action]) -> Option<(Cost, P::State)>
where
    P: SearchProblem,
    P::Action: PartialEq,
{
    let mut state = problem.start_state();
    let mut total = Cost::ZERO;
    for action in actions {
        let step = problem
            .succ_and_cost(&state)
            .into_iter()
            .find(|t| &t.action == action)?;
        total = total.checked_add(Cost::new(step.cost).ok()?).ok()?;
        state = step.next;
    }
    Some((total, state))
}

/// Edit `result.json` inside `bundle` and rebuild so that content hashes,
/// manifest, and digest stay consistent. Only the cross-artifact bindings
/// can then fail verification.
///
/// # Panics
///
/// If the bundle has no parseable `result.json`. Test-only invariant.
#[must_use]
pub fn rebuild_with_modified_result(
    bundle: &ReportBundle,
    modify: impl FnOnce(&mut serde_json::Value),
) -> ReportBundle {
    let artifact = bundle
        .artifacts
        .get(RESULT_ARTIFACT)
        .expect("bundle has result.json");
    let mut result: serde_json::Value =
        serde_json::from_slice(&artifact.content).expect("result.json is JSON");
    modify(&mut result);
    let bytes = canonical_json_bytes(&result).expect("result stays canonical");

    let inputs = bundle
        .artifacts
        .values()
        .map(|a| {
            let content = if a.name == RESULT_ARTIFACT {
                bytes.clone()
            } else {
                a.content.clone()
            };
            (a.name.clone(), content, a.normative)
        })
        .collect();
    build_report_bundle(inputs).expect("rebuild succeeds")
}

/// Rebuild `bundle` without the artifact called `name`, keeping every other
/// artifact byte for byte.
///
/// # Panics
///
/// If the rebuild fails. Test-only invariant.
#[must_use]
pub fn rebuild_without_artifact(bundle: &ReportBundle, name: &str) -> ReportBundle {
    let inputs = bundle
        .artifacts
        .values()
        .filter(|a| a.name != name)
        .map(|a| (a.name.clone(), a.content.clone(), a.normative))
        .collect();
    build_report_bundle(inputs).expect("rebuild succeeds")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_seed_deterministic() {
        let a = RandomGraph::generate(7, 8, 3, false);
        let b = RandomGraph::generate(7, 8, 3, false);
        for node in 0..a.node_count() {
            assert_eq!(a.succ_and_cost(&node), b.succ_and_cost(&node));
        }
    }

    #[test]
    fn acyclic_edges_point_forward() {
        let graph = RandomGraph::generate(3, 10, 4, true);
        for node in 0..graph.node_count() {
            for t in graph.succ_and_cost(&node) {
                assert!(t.next > node);
            }
        }
    }

    #[test]
    fn replay_rejects_unknown_actions() {
        let graph = RandomGraph::generate(1, 5, 2, false);
        assert_eq!(replay_path(&graph, &[]), Some((Cost::ZERO, 0)));
        assert_eq!(replay_path(&graph, &[usize::MAX]), None);
    }
}
