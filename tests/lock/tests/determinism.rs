//! Determinism lock: audit logs and report digests are byte-stable within a
//! process and across processes with different environments.

use std::process::Command;

use lock_tests::fixtures::{toy_lexicon, RandomGraph};
use waymark_harness::problems::joint::JointSegmentationInsertionProblem;
use waymark_harness::problems::transportation::{TransportWeights, TransportationProblem};
use waymark_harness::runner::run_problem;
use waymark_search::ucs::search;
use waymark_search::SearchPolicy;

#[test]
fn search_graph_bytes_repeat_exactly() {
    for seed in 0..20 {
        let graph = RandomGraph::generate(seed, 20, 4, false);
        let a = search(&graph, &SearchPolicy::default()).graph.unwrap();
        let b = search(&graph, &SearchPolicy::default()).graph.unwrap();
        assert_eq!(
            a.to_canonical_json_bytes().unwrap(),
            b.to_canonical_json_bytes().unwrap(),
            "seed {seed}"
        );
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    }
}

#[test]
fn text_problem_graphs_repeat_exactly() {
    let lexicon = toy_lexicon();
    let problem = JointSegmentationInsertionProblem::new(
        "thctstnthmt",
        |p: &str, w: &str| lexicon.bigram_cost(p, w),
        |s: &str| lexicon.possible_fills(s),
    );
    let first = search(&problem, &SearchPolicy::default());
    let second = search(&problem, &SearchPolicy::default());
    assert_eq!(first.outcome, second.outcome);
    assert_eq!(
        first.graph.unwrap().to_canonical_json_bytes().unwrap(),
        second.graph.unwrap().to_canonical_json_bytes().unwrap()
    );
}

#[test]
fn report_digest_is_stable_and_policy_sensitive() {
    let problem = TransportationProblem::new(40, TransportWeights::default());
    let a = run_problem(&problem, &SearchPolicy::default()).unwrap();
    let b = run_problem(&problem, &SearchPolicy::default()).unwrap();
    assert_eq!(a.bundle.digest, b.bundle.digest);

    let budgeted = run_problem(&problem, &SearchPolicy::with_max_expansions(1_000)).unwrap();
    assert_eq!(budgeted.outcome, a.outcome);
    assert_ne!(budgeted.bundle.digest, a.bundle.digest);
}

fn run_fixture(env: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_search_fixture");
    let mut command = Command::new(bin);
    command
        .env_remove("LC_ALL")
        .env_remove("LANG")
        .env_remove("RUST_LOG");
    for &(key, value) in env {
        command.env(key, value);
    }
    let output = command
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn {bin}: {e}"));
    assert!(
        output.status.success(),
        "search_fixture exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn fixture_output_is_identical_across_processes() {
    let baseline = run_fixture(&[]);
    assert!(baseline.contains("transport_total_cost=6\n"), "{baseline}");
    assert!(baseline.contains("transport_actions=walk,tram,tram,walk\n"), "{baseline}");
    assert!(baseline.contains("segmentation=the cat sat on the mat\n"), "{baseline}");

    let variants: [&[(&str, &str)]; 3] = [
        &[("LC_ALL", "C")],
        &[("LANG", "tr_TR.UTF-8")],
        &[("RUST_LOG", "trace")],
    ];
    for env in variants {
        assert_eq!(run_fixture(env), baseline, "env {env:?}");
    }
}
