//! Joint segmentation and vowel insertion: the input is unspaced and
//! vowel-free. Every prefix of the remaining input may become one word, as
//! long as the fill dictionary has a candidate for it; bigram costs link
//! consecutive words.
//!
//! Unlike [`super::vowel_insertion`] there is no pass-through: a piece with
//! no fills contributes no transition.

use std::collections::BTreeSet;

use waymark_kernel::problem::{SearchProblem, Transition};

use super::{char_boundaries, WordState};

pub struct JointSegmentationInsertionProblem<B, F> {
    query: String,
    boundaries: Vec<usize>,
    bigram_cost: B,
    possible_fills: F,
}

impl<B, F> JointSegmentationInsertionProblem<B, F>
where
    B: Fn(&str, &str) -> f64,
    F: Fn(&str) -> BTreeSet<String>,
{
    pub fn new(query: impl Into<String>, bigram_cost: B, possible_fills: F) -> Self {
        let query = query.into();
        let boundaries = char_boundaries(&query);
        Self {
            query,
            boundaries,
            bigram_cost,
            possible_fills,
        }
    }

    fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }
}

impl<B, F> SearchProblem for JointSegmentationInsertionProblem<B, F>
where
    B: Fn(&str, &str) -> f64,
    F: Fn(&str) -> BTreeSet<String>,
{
    type State = WordState;
    type Action = String;

    #[allow(clippy::unnecessary_literal_bound)]
    fn problem_id(&self) -> &str {
        "joint_segmentation_insertion"
    }

    fn start_state(&self) -> WordState {
        WordState::start()
    }

    fn is_end(&self, state: &WordState) -> bool {
        state.index == self.char_len()
    }

    fn succ_and_cost(&self, state: &WordState) -> Vec<Transition<String, WordState>> {
        let from = self.boundaries[state.index];
        let mut out = Vec::new();
        for end in state.index + 1..=self.char_len() {
            let piece = &self.query[from..self.boundaries[end]];
            for word in (self.possible_fills)(piece) {
                let cost = (self.bigram_cost)(&state.previous, &word);
                let next = WordState {
                    index: end,
                    previous: word.clone(),
                };
                out.push(Transition::new(word, next, cost));
            }
        }
        out
    }
}
