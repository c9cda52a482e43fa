//! Run-time choice of solver.

use serde::{Deserialize, Serialize};
use waymark_kernel::problem::SearchProblem;

use crate::error::SearchError;
use crate::result::SearchResult;
use crate::{backtracking, dp, ucs};

/// Which algorithm to run.
///
/// - `UniformCost` is always correct under non-negative costs.
/// - `DynamicProgramming` is correct only on acyclic state spaces and reports
///   [`SearchError::CyclicStateSpace`] otherwise.
/// - `Backtracking` is exponential and exists to check the other two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Solver {
    #[default]
    UniformCost,
    DynamicProgramming,
    Backtracking { max_depth: usize },
}

impl Solver {
    /// Solve `problem` with the selected algorithm.
    ///
    /// # Errors
    ///
    /// Whatever the selected algorithm reports; see [`SearchError`].
    pub fn solve<P: SearchProblem>(
        &self,
        problem: &P,
    ) -> Result<SearchResult<P::Action>, SearchError> {
        match *self {
            Self::UniformCost => ucs::solve(problem),
            Self::DynamicProgramming => dp::dynamic_programming(problem),
            Self::Backtracking { max_depth } => backtracking::backtracking_search(problem, max_depth),
        }
    }

    /// Short stable name used in logs and reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UniformCost => "uniform_cost",
            Self::DynamicProgramming => "dynamic_programming",
            Self::Backtracking { .. } => "backtracking",
        }
    }
}
