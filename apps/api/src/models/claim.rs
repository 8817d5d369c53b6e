use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MODEL_ID;

/// Claim metadata as kept in the claims table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimStatus {
    pub id: String,
    pub status: String,
    pub claim_type: String,
    pub submission_date: Option<DateTime<Utc>>,
    pub claimant_name: String,
    pub amount: f64,
    /// Object-store key of the free-text claim notes.
    pub notes_key: String,
}

/// Multi-audience summary produced for a single claim.
/// Built fresh per request and never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSummary {
    pub claim_id: String,
    pub overall_summary: String,
    pub customer_facing_summary: String,
    pub adjuster_focused_summary: String,
    pub recommended_next_step: String,
    pub generated_at: DateTime<Utc>,
    /// The invocation target the summary was generated with.
    pub model: String,
}

impl Default for ClaimSummary {
    fn default() -> Self {
        Self {
            claim_id: String::new(),
            overall_summary: String::new(),
            customer_facing_summary: String::new(),
            adjuster_focused_summary: String::new(),
            recommended_next_step: String::new(),
            generated_at: Utc::now(),
            model: DEFAULT_MODEL_ID.to_string(),
        }
    }
}
