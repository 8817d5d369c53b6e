//! Claim records (DynamoDB) and claim notes (S3).
//!
//! Both stores sit behind traits so `AppState` can carry them as `Arc<dyn …>`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::claim::ClaimStatus;

pub mod claims;
pub mod notes;

pub use claims::DynamoDbClaimStore;
pub use notes::S3NotesStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("DynamoDB {operation} failed: {message}")]
    DynamoDb {
        operation: &'static str,
        message: String,
    },

    #[error("S3 {operation} failed: {message}")]
    S3 {
        operation: &'static str,
        message: String,
    },

    #[error("Object not found: s3://{bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("Malformed claim record {id}: {reason}")]
    Malformed { id: String, reason: String },
}

#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Returns `None` when no claim with this ID exists.
    async fn get_claim_status(&self, claim_id: &str) -> Result<Option<ClaimStatus>, StorageError>;

    async fn save_claim_status(&self, claim: &ClaimStatus) -> Result<(), StorageError>;
}

#[async_trait]
pub trait NotesStore: Send + Sync {
    /// Reads the whole notes object as UTF-8 text.
    async fn get_claim_notes(&self, bucket: &str, key: &str) -> Result<String, StorageError>;

    async fn save_claim_notes(
        &self,
        bucket: &str,
        key: &str,
        content: &str,
    ) -> Result<(), StorageError>;
}
