//! LLM client: the only place that talks to the Bedrock generation endpoint.
//!
//! Two request shapes are supported, chosen at startup via `BEDROCK_INVOKE_STYLE`:
//! the `Converse` API (`ConverseGenerator`) and raw `InvokeModel` with the Anthropic
//! messages body (`InvokeGenerator`). Both hand back a `ResponseEnvelope`; turning that
//! into generated text is the job of `summary::extract`.
//!
//! Neither adapter retries. A failed call fails the request.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

pub mod converse;
pub mod invoke;
pub mod target;

pub use converse::ConverseGenerator;
pub use invoke::InvokeGenerator;
pub use target::InvocationTarget;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Transport or service failure of the generation endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Bedrock {operation} call failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to build Bedrock request: {0}")]
    Request(String),

    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl LlmError {
    pub fn service<E>(operation: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Service {
            operation,
            message: aws_sdk_bedrockruntime::error::DisplayErrorContext(&err).to_string(),
            source: Box::new(err),
        }
    }
}

/// A single content block of a model reply. Only text blocks carry `text`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: Some(text.into()),
        }
    }
}

/// What the generation endpoint handed back, still in the shape of the API used.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// `Converse` output. `None` when the response carried no output message.
    Converse { message: Option<Vec<ContentBlock>> },
    /// Raw `InvokeModel` response body.
    Invoke { body: Bytes },
}

/// A generation endpoint strategy. One call per summarization, no retries.
///
/// Dropping the returned future aborts the in-flight request.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        target: &InvocationTarget,
        prompt: &str,
    ) -> Result<ResponseEnvelope, LlmError>;
}
