//! Engine contract lock: failures are typed, finalized costs never move,
//! and every solver enforces the non-negative cost rule.

use lock_tests::fixtures::RandomGraph;
use waymark_harness::problems::transportation::{TransportWeights, TransportationProblem};
use waymark_kernel::cost::CostError;
use waymark_kernel::problem::{SearchProblem, Transition};
use waymark_search::graph::{SuccessorOutcome, Termination};
use waymark_search::ucs::search;
use waymark_search::{SearchError, SearchPolicy, Solver};

const ALL_SOLVERS: [Solver; 3] = [
    Solver::UniformCost,
    Solver::DynamicProgramming,
    Solver::Backtracking { max_depth: 10 },
];

/// A start state with no way out.
struct Island;

impl SearchProblem for Island {
    type State = u8;
    type Action = u8;

    #[allow(clippy::unnecessary_literal_bound)]
    fn problem_id(&self) -> &str {
        "island"
    }

    fn start_state(&self) -> u8 {
        0
    }

    fn is_end(&self, state: &u8) -> bool {
        *state == 1
    }

    fn succ_and_cost(&self, _state: &u8) -> Vec<Transition<u8, u8>> {
        Vec::new()
    }
}

#[test]
fn no_transitions_means_exhausted_for_every_solver() {
    for solver in ALL_SOLVERS {
        assert_eq!(solver.solve(&Island), Err(SearchError::Exhausted), "{}", solver.name());
    }
}

#[test]
fn exhausted_run_still_reports_its_graph() {
    let run = search(&Island, &SearchPolicy::default());
    assert_eq!(run.outcome, Err(SearchError::Exhausted));
    let graph = run.graph.unwrap();
    assert_eq!(graph.metadata.termination, Termination::FrontierExhausted);
    assert_eq!(graph.expansions.len(), 1);
}

#[test]
fn negative_cost_rejected_by_every_solver() {
    let graph = TransportationProblem::new(6, TransportWeights { walk: 1.0, tram: -2.0 });
    for solver in ALL_SOLVERS {
        match solver.solve(&graph) {
            Err(SearchError::InvalidCost { reason, .. }) => {
                assert_eq!(reason, CostError::Negative { raw: -2.0 }, "{}", solver.name());
            }
            other => panic!("{}: expected InvalidCost, got {other:?}", solver.name()),
        }
    }
}

#[test]
fn nan_cost_rejected_by_every_solver() {
    let graph = TransportationProblem::new(6, TransportWeights { walk: f64::NAN, tram: 2.0 });
    for solver in ALL_SOLVERS {
        assert!(
            matches!(
                solver.solve(&graph),
                Err(SearchError::InvalidCost {
                    reason: CostError::NotFinite { .. },
                    ..
                })
            ),
            "{}",
            solver.name()
        );
    }
}

#[test]
fn dp_reports_cycles_that_ucs_handles() {
    let cyclic = (0..200)
        .map(|seed| RandomGraph::generate(seed, 6, 3, false))
        .find(|g| {
            matches!(
                Solver::DynamicProgramming.solve(g),
                Err(SearchError::CyclicStateSpace { .. })
            )
        })
        .expect("some seeded graph has a reachable cycle");

    let ucs = Solver::UniformCost.solve(&cyclic);
    assert!(
        !matches!(ucs, Err(SearchError::CyclicStateSpace { .. })),
        "uniform-cost search never reports cycles"
    );
}

#[test]
fn expansion_budget_stops_the_search() {
    let problem = TransportationProblem::new(1_000, TransportWeights::default());
    let run = search(&problem, &SearchPolicy::with_max_expansions(5));
    assert_eq!(run.outcome, Err(SearchError::ExpansionBudgetExceeded { limit: 5 }));
    assert!(run.stats.states_explored <= 6);
    assert_eq!(
        run.graph.unwrap().metadata.termination,
        Termination::ExpansionBudgetExceeded { limit: 5 }
    );
}

#[test]
fn zero_budget_is_an_invalid_policy() {
    let problem = TransportationProblem::new(9, TransportWeights::default());
    let run = search(&problem, &SearchPolicy::with_max_expansions(0));
    assert!(matches!(run.outcome, Err(SearchError::InvalidPolicy { .. })));
    assert_eq!(run.stats.states_explored, 0);
}

#[test]
fn finalized_costs_are_monotone_and_final() {
    for seed in 0..40 {
        let graph = RandomGraph::generate(seed, 15, 4, false);
        let run = search(&graph, &SearchPolicy::default());
        let audit = run.graph.unwrap();

        let mut finalized = std::collections::HashMap::new();
        let mut last = None;
        for event in &audit.expansions {
            assert!(
                last.is_none_or(|prev| prev <= event.priority),
                "seed {seed}: pops must come out in cost order"
            );
            last = Some(event.priority);
            assert!(
                finalized.insert(event.state.clone(), event.priority).is_none(),
                "seed {seed}: {} popped twice",
                event.state
            );

            for succ in &event.successors {
                match succ.outcome {
                    SuccessorOutcome::Relaxed { priority } => {
                        let through = event.priority.checked_add(succ.cost).unwrap();
                        assert_eq!(priority, through, "seed {seed}");
                    }
                    SuccessorOutcome::AlreadyFinalized => {
                        let fixed = finalized[&succ.next];
                        let through = event.priority.checked_add(succ.cost).unwrap();
                        assert!(fixed <= through, "seed {seed}");
                    }
                    SuccessorOutcome::NotImproved => {}
                }
            }
        }
    }
}
