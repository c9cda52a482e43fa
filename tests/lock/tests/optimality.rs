//! Optimality lock: uniform-cost search and dynamic programming agree with
//! the exhaustive oracle, and every returned path replays to its cost.

use lock_tests::fixtures::{replay_path, toy_lexicon, RandomGraph};
use waymark_harness::problems::segmentation::SegmentationProblem;
use waymark_harness::problems::transportation::{
    TransportAction, TransportWeights, TransportationProblem,
};
use waymark_harness::text::segment_words;
use waymark_kernel::cost::Cost;
use waymark_kernel::problem::SearchProblem;
use waymark_search::backtracking::backtracking_search;
use waymark_search::dp::dynamic_programming;
use waymark_search::ucs::solve;
use waymark_search::{SearchError, Solver};

const SEEDS: u64 = 60;

fn cost(raw: f64) -> Cost {
    Cost::new(raw).unwrap()
}

#[test]
fn ucs_matches_oracle_on_cyclic_graphs() {
    for seed in 0..SEEDS {
        let graph = RandomGraph::generate(seed, 7, 3, false);
        // Some optimal path is simple, so it has at most nodes - 1 edges.
        let oracle = backtracking_search(&graph, graph.node_count() - 1);
        let ucs = solve(&graph);
        match (&oracle, &ucs) {
            (Ok(expected), Ok(actual)) => assert_eq!(
                expected.total_cost, actual.total_cost,
                "seed {seed}: oracle {expected:?} vs ucs {actual:?}"
            ),
            (Err(SearchError::Exhausted), Err(SearchError::Exhausted)) => {}
            other => panic!("seed {seed}: disagreement {other:?}"),
        }
    }
}

#[test]
fn dp_matches_ucs_on_dags() {
    for seed in 0..SEEDS {
        let graph = RandomGraph::generate(seed, 12, 3, true);
        match (dynamic_programming(&graph), solve(&graph)) {
            (Ok(dp), Ok(ucs)) => assert_eq!(dp.total_cost, ucs.total_cost, "seed {seed}"),
            (Err(SearchError::Exhausted), Err(SearchError::Exhausted)) => {}
            other => panic!("seed {seed}: disagreement {other:?}"),
        }
    }
}

#[test]
fn returned_paths_replay_to_their_cost() {
    for seed in 0..SEEDS {
        let graph = RandomGraph::generate(seed, 9, 3, false);
        for solver in [Solver::UniformCost, Solver::Backtracking { max_depth: 8 }] {
            let Ok(result) = solver.solve(&graph) else {
                continue;
            };
            let (total, end) = replay_path(&graph, &result.actions)
                .unwrap_or_else(|| panic!("seed {seed}: {} path does not replay", solver.name()));
            assert_eq!(total, result.total_cost, "seed {seed}");
            assert!(graph.is_end(&end), "seed {seed}: path ends at {end}");
        }
    }
}

#[test]
fn transportation_nine_costs_six() {
    let problem = TransportationProblem::new(9, TransportWeights::default());

    let ucs = solve(&problem).unwrap();
    assert_eq!(ucs.total_cost, cost(6.0));
    assert_eq!(
        ucs.actions,
        vec![
            TransportAction::Walk,
            TransportAction::Tram,
            TransportAction::Tram,
            TransportAction::Walk
        ]
    );

    let oracle = backtracking_search(&problem, 8).unwrap();
    assert_eq!(oracle.total_cost, ucs.total_cost);
    assert_eq!(dynamic_programming(&problem).unwrap().total_cost, ucs.total_cost);
}

#[test]
fn transportation_agrees_across_sizes_and_weights() {
    let weights = [
        TransportWeights::default(),
        TransportWeights { walk: 1.0, tram: 5.0 },
        TransportWeights { walk: 3.0, tram: 0.0 },
    ];
    for w in weights {
        for n in 1..=14 {
            let problem = TransportationProblem::new(n, w);
            let ucs = solve(&problem).unwrap();
            let dp = dynamic_programming(&problem).unwrap();
            let depth = usize::try_from(n).unwrap();
            let oracle = backtracking_search(&problem, depth).unwrap();
            assert_eq!(ucs.total_cost, oracle.total_cost, "n={n} {w:?}");
            assert_eq!(dp.total_cost, oracle.total_cost, "n={n} {w:?}");
        }
    }
}

#[test]
fn thecat_segments_to_the_cat() {
    let lexicon = toy_lexicon();
    let unigram = |w: &str| lexicon.unigram_cost(w);

    assert_eq!(segment_words("thecat", unigram).unwrap(), "the cat");

    let problem = SegmentationProblem::new("thecat", unigram);
    let oracle = backtracking_search(&problem, 6).unwrap();
    assert_eq!(oracle.actions.join(" "), "the cat");
    assert_eq!(oracle.total_cost, solve(&problem).unwrap().total_cost);
}

#[test]
fn longer_sentence_segments_and_matches_dp() {
    let lexicon = toy_lexicon();
    let unigram = |w: &str| lexicon.unigram_cost(w);
    let problem = SegmentationProblem::new("thecatsatonthemat", unigram);

    let ucs = solve(&problem).unwrap();
    assert_eq!(ucs.actions.join(" "), "the cat sat on the mat");
    assert_eq!(dynamic_programming(&problem).unwrap(), ucs);
}
