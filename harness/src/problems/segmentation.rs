//! Word segmentation: split an unspaced string into the word sequence with
//! the lowest total unigram cost.
//!
//! State is the number of chars consumed. From state `s` there is one
//! transition per split point `i` in `s+1..=len`, emitting the word made of
//! chars `s..i` at cost `unigram_cost(word)`.

use waymark_kernel::problem::{SearchProblem, Transition};

use super::char_boundaries;

pub struct SegmentationProblem<U> {
    query: String,
    boundaries: Vec<usize>,
    unigram_cost: U,
}

impl<U: Fn(&str) -> f64> SegmentationProblem<U> {
    pub fn new(query: impl Into<String>, unigram_cost: U) -> Self {
        let query = query.into();
        let boundaries = char_boundaries(&query);
        Self {
            query,
            boundaries,
            unigram_cost,
        }
    }

    /// Length of the query in chars.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }
}

impl<U: Fn(&str) -> f64> SearchProblem for SegmentationProblem<U> {
    type State = usize;
    type Action = String;

    #[allow(clippy::unnecessary_literal_bound)]
    fn problem_id(&self) -> &str {
        "segmentation"
    }

    fn start_state(&self) -> usize {
        0
    }

    fn is_end(&self, state: &usize) -> bool {
        *state == self.char_len()
    }

    fn succ_and_cost(&self, state: &usize) -> Vec<Transition<String, usize>> {
        let from = self.boundaries[*state];
        (*state + 1..=self.char_len())
            .map(|end| {
                let word = &self.query[from..self.boundaries[end]];
                Transition::new(word.to_string(), end, (self.unigram_cost)(word))
            })
            .collect()
    }
}
