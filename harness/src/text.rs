//! Text front-ends: build a problem, solve it with uniform-cost search, and
//! join the chosen words with single spaces.
//!
//! An empty query returns an empty string without searching.

use std::collections::BTreeSet;

use tracing::debug;
use waymark_search::ucs::solve;
use waymark_search::SearchError;

use crate::problems::joint::JointSegmentationInsertionProblem;
use crate::problems::segmentation::SegmentationProblem;
use crate::problems::vowel_insertion::VowelInsertionProblem;

/// Split `query` into words minimizing total unigram cost.
///
/// # Errors
///
/// [`SearchError::InvalidCost`] if `unigram_cost` returns a negative or
/// non-finite value for some candidate word.
pub fn segment_words<U>(query: &str, unigram_cost: U) -> Result<String, SearchError>
where
    U: Fn(&str) -> f64,
{
    if query.is_empty() {
        return Ok(String::new());
    }
    let result = solve(&SegmentationProblem::new(query, unigram_cost))?;
    debug!(query, total_cost = %result.total_cost, words = result.len(), "segmented");
    Ok(result.actions.join(" "))
}

/// Restore vowels in each of `query_words`, minimizing total bigram cost.
///
/// # Errors
///
/// [`SearchError::InvalidCost`] on a negative or non-finite bigram cost.
pub fn insert_vowels<S, B, F>(
    query_words: &[S],
    bigram_cost: B,
    possible_fills: F,
) -> Result<String, SearchError>
where
    S: AsRef<str>,
    B: Fn(&str, &str) -> f64,
    F: Fn(&str) -> BTreeSet<String>,
{
    if query_words.is_empty() {
        return Ok(String::new());
    }
    let problem = VowelInsertionProblem::new(query_words, bigram_cost, possible_fills);
    let result = solve(&problem)?;
    debug!(total_cost = %result.total_cost, words = result.len(), "vowels inserted");
    Ok(result.actions.join(" "))
}

/// Segment an unspaced, vowel-free `query` and restore its vowels in one
/// search.
///
/// # Errors
///
/// - [`SearchError::Exhausted`] if no split of `query` has a fill for every
///   piece
/// - [`SearchError::InvalidCost`] on a negative or non-finite bigram cost
pub fn segment_and_insert<B, F>(
    query: &str,
    bigram_cost: B,
    possible_fills: F,
) -> Result<String, SearchError>
where
    B: Fn(&str, &str) -> f64,
    F: Fn(&str) -> BTreeSet<String>,
{
    if query.is_empty() {
        return Ok(String::new());
    }
    let problem = JointSegmentationInsertionProblem::new(query, bigram_cost, possible_fills);
    let result = solve(&problem)?;
    debug!(query, total_cost = %result.total_cost, words = result.len(), "segmented and inserted");
    Ok(result.actions.join(" "))
}
