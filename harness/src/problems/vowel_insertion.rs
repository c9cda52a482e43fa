//! Vowel insertion: each input token has had its vowels stripped; pick a
//! full word for every token minimizing the sum of bigram costs.
//!
//! Tokens with no known fill are kept as they are.

use std::collections::BTreeSet;

use waymark_kernel::problem::{SearchProblem, Transition};

use super::WordState;

pub struct VowelInsertionProblem<B, F> {
    query_words: Vec<String>,
    bigram_cost: B,
    possible_fills: F,
}

impl<B, F> VowelInsertionProblem<B, F>
where
    B: Fn(&str, &str) -> f64,
    F: Fn(&str) -> BTreeSet<String>,
{
    pub fn new<S: AsRef<str>>(query_words: &[S], bigram_cost: B, possible_fills: F) -> Self {
        Self {
            query_words: query_words.iter().map(|w| w.as_ref().to_string()).collect(),
            bigram_cost,
            possible_fills,
        }
    }
}

impl<B, F> SearchProblem for VowelInsertionProblem<B, F>
where
    B: Fn(&str, &str) -> f64,
    F: Fn(&str) -> BTreeSet<String>,
{
    type State = WordState;
    type Action = String;

    #[allow(clippy::unnecessary_literal_bound)]
    fn problem_id(&self) -> &str {
        "vowel_insertion"
    }

    fn start_state(&self) -> WordState {
        WordState::start()
    }

    fn is_end(&self, state: &WordState) -> bool {
        state.index == self.query_words.len()
    }

    fn succ_and_cost(&self, state: &WordState) -> Vec<Transition<String, WordState>> {
        let Some(token) = self.query_words.get(state.index) else {
            return Vec::new();
        };
        let mut fills = (self.possible_fills)(token);
        if fills.is_empty() {
            fills.insert(token.clone());
        }
        fills
            .into_iter()
            .map(|word| {
                let cost = (self.bigram_cost)(&state.previous, &word);
                let next = WordState {
                    index: state.index + 1,
                    previous: word.clone(),
                };
                Transition::new(word, next, cost)
            })
            .collect()
    }
}
