//! Client problems: the state spaces the harness knows how to build.
//!
//! Each problem holds its cost functions from construction time and exposes
//! them only through [`SearchProblem`](waymark_kernel::problem::SearchProblem).

pub mod joint;
pub mod segmentation;
pub mod transportation;
pub mod vowel_insertion;

/// Sentinel "previous word" at the start of a sentence.
pub const SENTENCE_BEGIN: &str = "-BEGIN-";

/// State of the word-by-word text problems: how much of the input has been
/// consumed and the last word emitted (bigram context).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WordState {
    pub index: usize,
    pub previous: String,
}

impl WordState {
    pub(crate) fn start() -> Self {
        Self {
            index: 0,
            previous: SENTENCE_BEGIN.to_string(),
        }
    }
}

/// Byte offsets of every char boundary of `s`, `s.len()` included.
///
/// Entry `k` is where the `k`-th char starts, so `&s[b[i]..b[j]]` is the
/// substring of chars `i..j`.
pub(crate) fn char_boundaries(s: &str) -> Vec<usize> {
    s.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(s.len()))
        .collect()
}
