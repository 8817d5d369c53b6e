use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::models::claim::ClaimSummary;
use crate::summary::SummaryError;

/// The four fields the prompt asks for. Missing or `null` fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryFields {
    overall_summary: Option<String>,
    customer_facing_summary: Option<String>,
    adjuster_focused_summary: Option<String>,
    recommended_next_step: Option<String>,
}

/// Parses the JSON payload into a `ClaimSummary` stamped with the claim ID,
/// the current time and the invocation target that produced it.
pub fn parse_summary(payload: &str, claim_id: &str, model: &str) -> Result<ClaimSummary, SummaryError> {
    let parse_error = |source| SummaryError::Parse {
        source,
        text: payload.to_string(),
        generated: payload.to_string(),
    };

    let value: Value = serde_json::from_str(payload).map_err(parse_error)?;
    if !value.is_object() {
        return Err(SummaryError::NotAnObject {
            text: payload.to_string(),
            generated: payload.to_string(),
        });
    }

    let fields: SummaryFields = serde_json::from_value(value).map_err(parse_error)?;

    Ok(ClaimSummary {
        claim_id: claim_id.to_string(),
        overall_summary: fields.overall_summary.unwrap_or_default(),
        customer_facing_summary: fields.customer_facing_summary.unwrap_or_default(),
        adjuster_focused_summary: fields.adjuster_focused_summary.unwrap_or_default(),
        recommended_next_step: fields.recommended_next_step.unwrap_or_default(),
        generated_at: Utc::now(),
        model: model.to_string(),
    })
}
