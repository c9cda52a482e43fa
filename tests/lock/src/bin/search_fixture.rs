//! Runs a fixed set of problems and prints deterministic `key=value` lines
//! for cross-process comparison.
//!
//! Usage: `search_fixture [n]` where `n` is the transportation size
//! (default 9). Logs go to stderr, filtered by `RUST_LOG`.

use std::process::ExitCode;

use lock_tests::fixtures::{toy_lexicon, RandomGraph};
use tracing::info;
use tracing_subscriber::EnvFilter;
use waymark_harness::problems::transportation::{TransportWeights, TransportationProblem};
use waymark_harness::runner::run_problem;
use waymark_harness::text::segment_words;
use waymark_search::SearchPolicy;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let n = match std::env::args().nth(1).map(|arg| arg.parse::<u64>()) {
        None => 9,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("invalid transportation size: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(n, "search fixture starting");
    let policy = SearchPolicy::default();
    let transport = TransportationProblem::new(n, TransportWeights::default());
    let report = match run_problem(&transport, &policy) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("transportation run failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    match &report.outcome {
        Ok(result) => {
            let actions: Vec<&str> = result.actions.iter().map(|a| a.as_str()).collect();
            println!("transport_total_cost={}", result.total_cost);
            println!("transport_actions={}", actions.join(","));
        }
        Err(e) => println!("transport_error={e}"),
    }
    println!("transport_states_explored={}", report.stats.states_explored);
    println!("transport_bundle_digest={}", report.bundle.digest);

    let graph = RandomGraph::generate(42, 12, 3, false);
    match run_problem(&graph, &policy) {
        Ok(report) => println!("random_graph_bundle_digest={}", report.bundle.digest),
        Err(e) => {
            eprintln!("random graph run failed: {e}");
            return ExitCode::FAILURE;
        }
    }

    let lexicon = toy_lexicon();
    match segment_words("thecatsatonthemat", |w| lexicon.unigram_cost(w)) {
        Ok(words) => println!("segmentation={words}"),
        Err(e) => println!("segmentation_error={e}"),
    }

    ExitCode::SUCCESS
}
