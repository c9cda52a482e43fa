//! Shared workloads for the waymark benchmark suites.
//!
//! A [`Regime`] names one problem instance. Every regime can be run engine
//! only ([`Regime::search_only`]) or end to end with artifacts
//! ([`Regime::run_report`]), and carries a content digest of its parameters
//! so recorded numbers can be tied to the exact input.

use std::fmt;

use waymark_harness::lexicon::Lexicon;
use waymark_harness::problems::segmentation::SegmentationProblem;
use waymark_harness::problems::transportation::{TransportWeights, TransportationProblem};
use waymark_harness::runner::{run_problem, RunError};
use waymark_kernel::problem::{SearchProblem, Transition};
use waymark_kernel::proof::canon::canonical_json_bytes;
use waymark_kernel::proof::hash::{canonical_hash, ContentHash};
use waymark_kernel::proof::hash_domain::HashDomain;
use waymark_search::ucs::search;
use waymark_search::{SearchPolicy, SearchStats};

/// Text the segmentation regimes draw their cost model from.
pub const CORPUS: &str = "\
the quick brown fox jumps over the lazy dog
a search engine finds the cheapest path through a graph
the cat sat on the mat and the dog sat on the log
every state has a cost and every path has a total
";

#[must_use]
pub fn corpus_lexicon() -> Lexicon {
    Lexicon::from_text(CORPUS)
}

/// Four-way moves on a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    North,
    South,
    East,
    West,
}

/// A `width × height` grid with uneven cell costs and cycles everywhere.
///
/// Entering cell `(x, y)` costs `1 + (7x + 13y) mod 5`. Start at the
/// top-left corner, finish at the bottom-right.
#[derive(Debug, Clone)]
pub struct GridProblem {
    width: u32,
    height: u32,
    id: String,
}

impl GridProblem {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            id: format!("grid_{width}x{height}"),
        }
    }

    fn entry_cost(x: u32, y: u32) -> f64 {
        f64::from(1 + (x.wrapping_mul(7).wrapping_add(y.wrapping_mul(13))) % 5)
    }
}

impl SearchProblem for GridProblem {
    type State = (u32, u32);
    type Action = Step;

    fn problem_id(&self) -> &str {
        &self.id
    }

    fn start_state(&self) -> (u32, u32) {
        (0, 0)
    }

    fn is_end(&self, state: &(u32, u32)) -> bool {
        *state == (self.width.saturating_sub(1), self.height.saturating_sub(1))
    }

    fn succ_and_cost(&self, &(x, y): &(u32, u32)) -> Vec<Transition<Step, (u32, u32)>> {
        let mut out = Vec::with_capacity(4);
        let mut push = |step, nx: u32, ny: u32| {
            out.push(Transition::new(step, (nx, ny), Self::entry_cost(nx, ny)));
        };
        if y > 0 {
            push(Step::North, x, y - 1);
        }
        if y + 1 < self.height {
            push(Step::South, x, y + 1);
        }
        if x + 1 < self.width {
            push(Step::East, x + 1, y);
        }
        if x > 0 {
            push(Step::West, x - 1, y);
        }
        out
    }
}

/// One benchmark workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regime {
    Grid { width: u32, height: u32 },
    Transportation { n: u64 },
    Segmentation { query: String },
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid { width, height } => write!(f, "grid_{width}x{height}"),
            Self::Transportation { n } => write!(f, "transportation_{n}"),
            Self::Segmentation { query } => write!(f, "segmentation_{}", query.chars().count()),
        }
    }
}

/// Engine-only outcome summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegimeOutcome {
    pub goal_reached: bool,
    pub stats: SearchStats,
}

impl Regime {
    /// Parameters as a JSON object.
    #[must_use]
    pub fn params(&self) -> serde_json::Value {
        match self {
            Self::Grid { width, height } => {
                serde_json::json!({ "kind": "grid", "width": width, "height": height })
            }
            Self::Transportation { n } => serde_json::json!({ "kind": "transportation", "n": n }),
            Self::Segmentation { query } => {
                serde_json::json!({ "kind": "segmentation", "query": query })
            }
        }
    }

    /// `BenchInput` digest of the canonical parameters.
    #[must_use]
    pub fn input_digest(&self) -> ContentHash {
        // Parameters hold only integers and strings.
        let bytes = canonical_json_bytes(&self.params()).unwrap_or_default();
        canonical_hash(HashDomain::BenchInput, &bytes)
    }

    /// Run uniform-cost search without building artifacts.
    #[must_use]
    pub fn search_only(&self, lexicon: &Lexicon, policy: &SearchPolicy) -> RegimeOutcome {
        fn summarize<A>(run: &waymark_search::ucs::SearchRun<A>) -> RegimeOutcome {
            RegimeOutcome {
                goal_reached: run.is_goal_reached(),
                stats: run.stats,
            }
        }
        match self {
            Self::Grid { width, height } => {
                summarize(&search(&GridProblem::new(*width, *height), policy))
            }
            Self::Transportation { n } => summarize(&search(
                &TransportationProblem::new(*n, TransportWeights::default()),
                policy,
            )),
            Self::Segmentation { query } => summarize(&search(
                &SegmentationProblem::new(query.as_str(), |w: &str| lexicon.unigram_cost(w)),
                policy,
            )),
        }
    }

    /// Run end to end and return the report digest.
    ///
    /// # Errors
    ///
    /// [`RunError`] if the report cannot be built.
    pub fn run_report(
        &self,
        lexicon: &Lexicon,
        policy: &SearchPolicy,
    ) -> Result<ContentHash, RunError> {
        let digest = match self {
            Self::Grid { width, height } => {
                run_problem(&GridProblem::new(*width, *height), policy)?
                    .bundle
                    .digest
            }
            Self::Transportation { n } => {
                run_problem(
                    &TransportationProblem::new(*n, TransportWeights::default()),
                    policy,
                )?
                .bundle
                .digest
            }
            Self::Segmentation { query } => {
                run_problem(
                    &SegmentationProblem::new(query.as_str(), |w: &str| lexicon.unigram_cost(w)),
                    policy,
                )?
                .bundle
                .digest
            }
        };
        Ok(digest)
    }
}

/// The regimes every suite runs.
#[must_use]
pub fn standard_regimes() -> Vec<Regime> {
    vec![
        Regime::Grid {
            width: 32,
            height: 32,
        },
        Regime::Grid {
            width: 96,
            height: 96,
        },
        Regime::Transportation { n: 10_000 },
        Regime::Segmentation {
            query: "thecatsatonthematandthedogsatonthelog".to_string(),
        },
    ]
}
