use async_trait::async_trait;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use super::{InvocationTarget, LlmError, ResponseEnvelope, TextGenerator};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.2;

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    anthropic_version: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<InvokeMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct InvokeMessage<'a> {
    role: &'a str,
    content: Vec<InvokeContent<'a>>,
}

#[derive(Debug, Serialize)]
struct InvokeContent<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    text: &'a str,
}

fn build_request_body(prompt: &str) -> Result<Vec<u8>, LlmError> {
    let request = InvokeRequest {
        anthropic_version: ANTHROPIC_VERSION,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        messages: vec![InvokeMessage {
            role: "user",
            content: vec![InvokeContent {
                content_type: "text",
                text: prompt,
            }],
        }],
    };
    Ok(serde_json::to_vec(&request)?)
}

/// Generation through raw `InvokeModel` with the Anthropic messages body.
#[derive(Clone)]
pub struct InvokeGenerator {
    client: Client,
}

impl InvokeGenerator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextGenerator for InvokeGenerator {
    async fn generate(
        &self,
        target: &InvocationTarget,
        prompt: &str,
    ) -> Result<ResponseEnvelope, LlmError> {
        let body = build_request_body(prompt)?;

        let response = self
            .client
            .invoke_model()
            .model_id(target.as_str())
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| LlmError::service("InvokeModel", e))?;

        let body = Bytes::from(response.body.into_inner());
        debug!(bytes = body.len(), "InvokeModel call succeeded");

        Ok(ResponseEnvelope::Invoke { body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_request_body_shape() {
        let body = build_request_body("Summarize this").unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(json["max_tokens"], 1024);
        assert!(json["temperature"].is_number());
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][0]["text"], "Summarize this");
    }

    #[test]
    fn test_request_body_keeps_special_characters() {
        let prompt = "line one\n\"quoted\" {braces} ```fence```";
        let body = build_request_body(prompt).unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["messages"][0]["content"][0]["text"], prompt);
    }
}
