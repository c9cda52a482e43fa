//! `SearchGraph`: expansion-event audit log.
//!
//! The normative surface is the ordered list of [`ExpandEvent`]s, one per
//! non-stale frontier pop. States and actions are recorded as their `Debug`
//! renderings; the engine never needs more than that.

use waymark_kernel::cost::Cost;
use waymark_kernel::proof::canon::{canonical_json_bytes, CanonError};
use waymark_kernel::proof::hash::{canonical_hash, ContentHash};
use waymark_kernel::proof::hash_domain::HashDomain;

/// The complete audit trail of one uniform-cost run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGraph {
    /// Ordered pop events.
    pub expansions: Vec<ExpandEvent>,
    /// Aggregate metadata.
    pub metadata: SearchGraphMetadata,
}

/// A single frontier pop and what happened to its successors.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandEvent {
    /// Total order of non-stale pops.
    pub expansion_order: u64,
    /// `Debug` rendering of the popped state.
    pub state: String,
    /// Finalized cost of the popped state.
    pub priority: Cost,
    /// True if the popped state satisfied `is_end` (no successors recorded).
    pub is_end: bool,
    /// Successor decision log, in enumeration order.
    pub successors: Vec<SuccessorRecord>,
}

/// One transition considered during an expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessorRecord {
    pub action: String,
    pub next: String,
    pub cost: Cost,
    pub outcome: SuccessorOutcome,
}

/// What the frontier did with a successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessorOutcome {
    /// New state or strictly cheaper path: the frontier now holds `priority`.
    Relaxed { priority: Cost },
    /// The frontier already held an equal or cheaper path.
    NotImproved,
    /// The successor was finalized earlier; its cost is fixed.
    AlreadyFinalized,
}

/// Why the run stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// An end state was finalized.
    GoalReached { total_cost: Cost },
    /// The frontier emptied without finalizing an end state.
    FrontierExhausted,
    /// The policy's expansion budget was hit.
    ExpansionBudgetExceeded { limit: u64 },
    /// A transition carried an invalid cost.
    InvalidCost,
    /// The policy failed validation; no steps ran.
    InvalidPolicy,
}

/// Aggregate metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGraphMetadata {
    pub problem_id: String,
    pub start_state: String,
    pub termination: Termination,
    pub total_expansions: u64,
    pub stale_discarded: u64,
    pub frontier_high_water: u64,
}

// ---------------------------------------------------------------------------
// Canonical JSON serialization
// ---------------------------------------------------------------------------

impl SearchGraph {
    /// Serialize the graph to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails. Costs are written as
    /// strings, so this only happens if the value tree is malformed.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content hash of the canonical bytes.
    ///
    /// # Errors
    ///
    /// Propagates [`CanonError`] from serialization.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::SearchGraph, &bytes))
    }

    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "expansions": self.expansions.iter().map(expand_event_to_json).collect::<Vec<_>>(),
            "metadata": metadata_to_json(&self.metadata),
        })
    }
}

fn expand_event_to_json(e: &ExpandEvent) -> serde_json::Value {
    serde_json::json!({
        "expansion_order": e.expansion_order,
        "is_end": e.is_end,
        "priority": e.priority.to_canonical_string(),
        "state": e.state,
        "successors": e.successors.iter().map(successor_to_json).collect::<Vec<_>>(),
    })
}

fn successor_to_json(r: &SuccessorRecord) -> serde_json::Value {
    serde_json::json!({
        "action": r.action,
        "cost": r.cost.to_canonical_string(),
        "next": r.next,
        "outcome": outcome_to_json(r.outcome),
    })
}

fn outcome_to_json(o: SuccessorOutcome) -> serde_json::Value {
    match o {
        SuccessorOutcome::Relaxed { priority } => {
            serde_json::json!({"priority": priority.to_canonical_string(), "type": "relaxed"})
        }
        SuccessorOutcome::NotImproved => serde_json::json!({"type": "not_improved"}),
        SuccessorOutcome::AlreadyFinalized => serde_json::json!({"type": "already_finalized"}),
    }
}

fn metadata_to_json(m: &SearchGraphMetadata) -> serde_json::Value {
    serde_json::json!({
        "frontier_high_water": m.frontier_high_water,
        "problem_id": m.problem_id,
        "stale_discarded": m.stale_discarded,
        "start_state": m.start_state,
        "termination": termination_to_json(&m.termination),
        "total_expansions": m.total_expansions,
    })
}

fn termination_to_json(t: &Termination) -> serde_json::Value {
    match t {
        Termination::GoalReached { total_cost } => {
            serde_json::json!({"total_cost": total_cost.to_canonical_string(), "type": "goal_reached"})
        }
        Termination::FrontierExhausted => serde_json::json!({"type": "frontier_exhausted"}),
        Termination::ExpansionBudgetExceeded { limit } => {
            serde_json::json!({"limit": limit, "type": "expansion_budget_exceeded"})
        }
        Termination::InvalidCost => serde_json::json!({"type": "invalid_cost"}),
        Termination::InvalidPolicy => serde_json::json!({"type": "invalid_policy"}),
    }
}
