//! Waymark Kernel: the problem contract and the value types every solver shares.
//!
//! # API Surface
//!
//! - [`problem::SearchProblem`] -- the capability set a state space must provide
//! - [`cost::Cost`] -- validated, totally ordered, non-negative path cost
//! - [`proof::canon::canonical_json_bytes`] / [`proof::hash::canonical_hash`] --
//!   deterministic serialization and content hashing for audit artifacts
//!
//! # Module Dependency Direction
//!
//! `cost` ← `problem`, `proof` stands alone.
//!
//! The kernel contains no search logic.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cost;
pub mod problem;
pub mod proof;
