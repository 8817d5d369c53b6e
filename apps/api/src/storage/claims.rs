use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{ClaimStore, StorageError};
use crate::models::claim::ClaimStatus;

type Item = HashMap<String, AttributeValue>;

/// Claim records in a DynamoDB table keyed by `id`. Every attribute is stored as a string.
#[derive(Clone)]
pub struct DynamoDbClaimStore {
    client: Client,
    table_name: String,
}

impl DynamoDbClaimStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl ClaimStore for DynamoDbClaimStore {
    async fn get_claim_status(&self, claim_id: &str) -> Result<Option<ClaimStatus>, StorageError> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(claim_id.to_string()))
            .send()
            .await
            .map_err(|e| StorageError::DynamoDb {
                operation: "GetItem",
                message: DisplayErrorContext(&e).to_string(),
            })?;

        match response.item() {
            Some(item) if !item.is_empty() => claim_from_item(item).map(Some),
            _ => {
                warn!(claim_id, table = %self.table_name, "Claim not found in DynamoDB");
                Ok(None)
            }
        }
    }

    async fn save_claim_status(&self, claim: &ClaimStatus) -> Result<(), StorageError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(claim_to_item(claim)))
            .send()
            .await
            .map_err(|e| StorageError::DynamoDb {
                operation: "PutItem",
                message: DisplayErrorContext(&e).to_string(),
            })?;

        info!(claim_id = %claim.id, table = %self.table_name, "Claim saved to DynamoDB");
        Ok(())
    }
}

fn string_attr<'a>(item: &'a Item, name: &str) -> Option<&'a str> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(String::as_str)
}

pub(crate) fn claim_from_item(item: &Item) -> Result<ClaimStatus, StorageError> {
    let id = string_attr(item, "id").unwrap_or_default().to_string();
    let malformed = |reason: String| StorageError::Malformed {
        id: id.clone(),
        reason,
    };

    let submission_date = match string_attr(item, "submissionDate").filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| malformed(format!("submissionDate '{raw}': {e}")))?,
        ),
        None => None,
    };

    let amount = match string_attr(item, "amount").filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|e| malformed(format!("amount '{raw}': {e}")))?,
        None => 0.0,
    };

    let text = |name: &str| string_attr(item, name).unwrap_or_default().to_string();

    Ok(ClaimStatus {
        status: text("status"),
        claim_type: text("claimType"),
        submission_date,
        claimant_name: text("claimantName"),
        amount,
        notes_key: text("notesKey"),
        id,
    })
}

pub(crate) fn claim_to_item(claim: &ClaimStatus) -> Item {
    let mut item = Item::new();
    let mut put = |name: &str, value: String| {
        item.insert(name.to_string(), AttributeValue::S(value));
    };

    put("id", claim.id.clone());
    put("status", claim.status.clone());
    put("claimType", claim.claim_type.clone());
    if let Some(date) = claim.submission_date {
        put("submissionDate", date.to_rfc3339());
    }
    put("claimantName", claim.claimant_name.clone());
    put("amount", claim.amount.to_string());
    put("notesKey", claim.notes_key.clone());

    item
}
