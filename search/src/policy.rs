//! Search policy: the configuration surface of a run.

use serde::{Deserialize, Serialize};
use waymark_kernel::proof::canon::canonical_json_bytes;
use waymark_kernel::proof::hash::{canonical_hash, ContentHash};
use waymark_kernel::proof::hash_domain::HashDomain;

use crate::error::SearchError;

/// Budget and audit configuration for uniform-cost search.
///
/// Missing fields take their defaults when parsed, so `{}` is a valid policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchPolicy {
    /// Hard cap on expanded states. `None` means unbounded.
    ///
    /// Reaching the cap ends the run with
    /// [`SearchError::ExpansionBudgetExceeded`].
    pub max_expansions: Option<u64>,
    /// Whether to build a [`crate::graph::SearchGraph`] audit log.
    pub record_graph: bool,
}

impl SearchPolicy {
    /// Policy with an expansion cap and otherwise default settings.
    #[must_use]
    pub fn with_max_expansions(limit: u64) -> Self {
        Self {
            max_expansions: Some(limit),
            ..Self::default()
        }
    }

    /// Reject settings that cannot describe a meaningful run.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if `max_expansions` is zero.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_expansions == Some(0) {
            return Err(SearchError::InvalidPolicy {
                detail: "max_expansions must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Parse and validate a policy from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] on malformed JSON, unknown
    /// fields, or a policy that fails [`Self::validate`].
    pub fn from_json_str(s: &str) -> Result<Self, SearchError> {
        let policy: Self = serde_json::from_str(s).map_err(|e| SearchError::InvalidPolicy {
            detail: format!("policy JSON: {e}"),
        })?;
        policy.validate()?;
        Ok(policy)
    }

    /// The policy as a JSON value with a fixed field set.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "max_expansions": self.max_expansions,
            "record_graph": self.record_graph,
        })
    }

    /// Canonical JSON bytes of the policy.
    #[must_use]
    pub fn to_canonical_json_bytes(&self) -> Vec<u8> {
        // Only integers, booleans and null: canonicalization cannot fail.
        canonical_json_bytes(&self.to_json_value()).unwrap_or_default()
    }

    /// Content hash binding a run to the exact policy that produced it.
    #[must_use]
    pub fn digest(&self) -> ContentHash {
        canonical_hash(HashDomain::SearchPolicy, &self.to_canonical_json_bytes())
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            max_expansions: None,
            record_graph: true,
        }
    }
}
