use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::info;

use super::{NotesStore, StorageError};

/// Claim notes as plain-text objects in S3.
#[derive(Clone)]
pub struct S3NotesStore {
    client: Client,
}

impl S3NotesStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotesStore for S3NotesStore {
    async fn get_claim_notes(&self, bucket: &str, key: &str) -> Result<String, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::ObjectNotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    StorageError::S3 {
                        operation: "GetObject",
                        message: DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3 {
                operation: "GetObject",
                message: format!("failed to read body: {e}"),
            })?
            .into_bytes();

        let content = String::from_utf8(bytes.to_vec()).map_err(|e| StorageError::S3 {
            operation: "GetObject",
            message: format!("notes are not valid UTF-8: {e}"),
        })?;

        info!("Retrieved claim notes from s3://{}/{}", bucket, key);
        Ok(content)
    }

    async fn save_claim_notes(
        &self,
        bucket: &str,
        key: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(content.as_bytes().to_vec()))
            .content_type("text/plain")
            .send()
            .await
            .map_err(|e| StorageError::S3 {
                operation: "PutObject",
                message: DisplayErrorContext(&e).to_string(),
            })?;

        info!("Saved claim notes to s3://{}/{}", bucket, key);
        Ok(())
    }
}
