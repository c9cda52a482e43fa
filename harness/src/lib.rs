//! Waymark harness: concrete problems and run packaging on top of the
//! search engine.
//!
//! - [`problems`]: transportation, segmentation, vowel insertion, joint
//! - [`text`]: one-call front-ends returning space-joined words
//! - [`lexicon`]: count-based cost functions for the text problems
//! - [`runner`], [`report`], [`report_dir`]: solve under a policy, package the
//!   run as canonical JSON artifacts with a digest, persist and verify it
//!
//! The harness never implements search. Problems supply domain data only.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod lexicon;
pub mod problems;
pub mod report;
pub mod report_dir;
pub mod runner;
pub mod text;
