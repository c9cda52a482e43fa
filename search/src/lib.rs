//! Waymark Search: optimal path search over any [`SearchProblem`].
//!
//! This crate provides the solvers. It depends only on `waymark_kernel`;
//! concrete problems live in `waymark_harness` and contain no search logic.
//!
//! # Crate dependency graph
//!
//! ```text
//! waymark_kernel  ←  waymark_search   ←  waymark_harness
//! (contract, cost)   (frontier, solvers)  (problems, reports)
//! ```
//!
//! # Key types
//!
//! - [`PriorityQueue`]: decrease-key frontier with lazy deletion
//! - [`ucs::search`] / [`ucs::solve`]: uniform-cost search
//! - [`dp::dynamic_programming`]: memoized solver for acyclic spaces
//! - [`backtracking::backtracking_search`]: exhaustive reference oracle
//! - [`SearchPolicy`]: expansion budget and audit switches
//! - [`SearchGraph`]: expansion-event audit log
//!
//! [`SearchProblem`]: waymark_kernel::problem::SearchProblem

#![forbid(unsafe_code)]

pub mod backtracking;
pub mod dp;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod policy;
pub mod result;
pub mod solver;
pub mod ucs;

pub use error::SearchError;
pub use frontier::PriorityQueue;
pub use graph::SearchGraph;
pub use policy::SearchPolicy;
pub use result::{SearchResult, SearchStats};
pub use solver::Solver;
