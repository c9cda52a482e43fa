//! Blocks numbered `1..=n`. From block `s` you can walk to `s + 1` or take
//! the tram to `2s`, never past `n`. Start at 1, finish at `n`.

use std::fmt;

use waymark_kernel::problem::{SearchProblem, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportAction {
    Walk,
    Tram,
}

impl TransportAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Tram => "tram",
        }
    }
}

impl fmt::Display for TransportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-action costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportWeights {
    pub walk: f64,
    pub tram: f64,
}

impl TransportWeights {
    #[must_use]
    pub fn cost(&self, action: TransportAction) -> f64 {
        match action {
            TransportAction::Walk => self.walk,
            TransportAction::Tram => self.tram,
        }
    }
}

impl Default for TransportWeights {
    fn default() -> Self {
        Self {
            walk: 1.0,
            tram: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportationProblem {
    n: u64,
    weights: TransportWeights,
    id: String,
}

impl TransportationProblem {
    /// Blocks `1..=n`. An `n` of 0 has no reachable end state.
    #[must_use]
    pub fn new(n: u64, weights: TransportWeights) -> Self {
        Self {
            n,
            weights,
            id: format!("transportation_n{n}"),
        }
    }

    #[must_use]
    pub fn n(&self) -> u64 {
        self.n
    }

    #[must_use]
    pub fn weights(&self) -> TransportWeights {
        self.weights
    }
}

impl SearchProblem for TransportationProblem {
    type State = u64;
    type Action = TransportAction;

    fn problem_id(&self) -> &str {
        &self.id
    }

    fn start_state(&self) -> u64 {
        1
    }

    fn is_end(&self, state: &u64) -> bool {
        *state == self.n
    }

    fn succ_and_cost(&self, state: &u64) -> Vec<Transition<TransportAction, u64>> {
        let mut out = Vec::with_capacity(2);
        if let Some(next) = state.checked_add(1).filter(|&s| s <= self.n) {
            out.push(Transition::new(
                TransportAction::Walk,
                next,
                self.weights.walk,
            ));
        }
        if let Some(next) = state.checked_mul(2).filter(|&s| s <= self.n) {
            out.push(Transition::new(
                TransportAction::Tram,
                next,
                self.weights.tram,
            ));
        }
        out
    }
}
