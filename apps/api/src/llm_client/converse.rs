use async_trait::async_trait;
use aws_sdk_bedrockruntime::types::{ContentBlock as SdkContentBlock, ConversationRole, Message};
use aws_sdk_bedrockruntime::Client;
use tracing::debug;

use super::{ContentBlock, InvocationTarget, LlmError, ResponseEnvelope, TextGenerator};

/// Generation through the Bedrock `Converse` API.
#[derive(Clone)]
pub struct ConverseGenerator {
    client: Client,
}

impl ConverseGenerator {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextGenerator for ConverseGenerator {
    async fn generate(
        &self,
        target: &InvocationTarget,
        prompt: &str,
    ) -> Result<ResponseEnvelope, LlmError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(SdkContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let response = self
            .client
            .converse()
            .model_id(target.as_str())
            .messages(message)
            .send()
            .await
            .map_err(|e| LlmError::service("Converse", e))?;

        if let Some(usage) = response.usage() {
            debug!(
                input_tokens = usage.input_tokens(),
                output_tokens = usage.output_tokens(),
                "Converse call succeeded"
            );
        }

        let message = response
            .output()
            .and_then(|output| output.as_message().ok())
            .map(|message| message.content().iter().map(to_content_block).collect());

        Ok(ResponseEnvelope::Converse { message })
    }
}

fn to_content_block(block: &SdkContentBlock) -> ContentBlock {
    match block.as_text() {
        Ok(text) => ContentBlock::text(text.as_str()),
        Err(_) => ContentBlock {
            block_type: "other".to_string(),
            text: None,
        },
    }
}
