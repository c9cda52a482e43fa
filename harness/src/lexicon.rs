//! Count-based language model built from plain text.
//!
//! Supplies the three cost functions the text problems consume:
//! `unigram_cost`, `bigram_cost`, and `possible_fills`. Costs are negative
//! log frequencies, always finite and non-negative. Unknown words cost more
//! the longer they are, so no segmentation prefers one long unknown run over
//! known words.

use std::collections::{BTreeSet, HashMap};

use crate::problems::SENTENCE_BEGIN;

/// Whether `c` is one of the five ASCII vowels (either case).
#[must_use]
pub fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// `word` with every vowel removed.
#[must_use]
pub fn remove_vowels(word: &str) -> String {
    word.chars().filter(|c| !is_vowel(*c)).collect()
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    unigrams: HashMap<String, u64>,
    bigrams: HashMap<(String, String), u64>,
    /// Times each word occurs as the first half of a bigram.
    contexts: HashMap<String, u64>,
    /// Vowel-free spelling → every known word with that spelling.
    fills: HashMap<String, BTreeSet<String>>,
    total: u64,
}

impl Lexicon {
    /// Count words in `text`.
    ///
    /// Each line is a sentence: its first word follows [`SENTENCE_BEGIN`].
    /// Words are maximal runs of alphabetic chars, lowercased.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut lexicon = Self::default();
        for line in text.lines() {
            let mut previous = SENTENCE_BEGIN.to_string();
            for word in line
                .split(|c: char| !c.is_alphabetic())
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase)
            {
                lexicon.observe(&previous, &word);
                previous = word;
            }
        }
        lexicon
    }

    fn observe(&mut self, previous: &str, word: &str) {
        *self.unigrams.entry(word.to_string()).or_insert(0) += 1;
        *self
            .bigrams
            .entry((previous.to_string(), word.to_string()))
            .or_insert(0) += 1;
        *self.contexts.entry(previous.to_string()).or_insert(0) += 1;
        self.fills
            .entry(remove_vowels(word))
            .or_default()
            .insert(word.to_string());
        self.total += 1;
    }

    /// Number of distinct words.
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.unigrams.len()
    }

    #[must_use]
    pub fn count(&self, word: &str) -> u64 {
        self.unigrams.get(word).copied().unwrap_or(0)
    }

    /// `ln(total + 2)`: the cost of one unit of surprise.
    #[allow(clippy::cast_precision_loss)]
    fn scale(&self) -> f64 {
        ((self.total + 2) as f64).ln()
    }

    /// `-log P(word)`, with a length-proportional penalty for unknown words.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn unigram_cost(&self, word: &str) -> f64 {
        match self.unigrams.get(word) {
            Some(&count) => self.scale() - (count as f64).ln(),
            None => self.scale() * (1 + word.chars().count()) as f64,
        }
    }

    /// `-log P(word | previous)`, backing off to the unigram cost plus one
    /// unit when the pair was never seen.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bigram_cost(&self, previous: &str, word: &str) -> f64 {
        let pair = (previous.to_string(), word.to_string());
        match (self.bigrams.get(&pair), self.contexts.get(previous)) {
            (Some(&count), Some(&context)) => (context as f64).ln() - (count as f64).ln(),
            _ => self.scale() + self.unigram_cost(word),
        }
    }

    /// Known words whose vowel-free spelling is `stripped`.
    #[must_use]
    pub fn possible_fills(&self, stripped: &str) -> BTreeSet<String> {
        self.fills.get(stripped).cloned().unwrap_or_default()
    }
}
