//! Summarization pipeline for a single claim.
//!
//! prompt built → target resolved → Bedrock invoked → text extracted → JSON isolated → parsed.
//! Any failing step ends the request; nothing partial is returned and nothing is retried.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::Config;
use crate::llm_client::{InvocationTarget, TextGenerator};
use crate::models::claim::ClaimSummary;
use crate::summary::error::SummaryError;
use crate::summary::extract::{generated_text, json_payload};
use crate::summary::parser::parse_summary;
use crate::summary::prompts::build_prompt;

/// Pipeline step, used to label failures in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStage {
    Invoke,
    ExtractText,
    Parse,
}

impl fmt::Display for SummaryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SummaryStage::Invoke => "invoke",
            SummaryStage::ExtractText => "extract_text",
            SummaryStage::Parse => "parse",
        };
        f.write_str(name)
    }
}

/// Turns claim notes into a `ClaimSummary`.
///
/// Holds no per-request state. The target is fixed at construction, so the ID sent
/// to Bedrock and the `model` stamped on the summary cannot diverge.
pub struct SummaryService {
    generator: Arc<dyn TextGenerator>,
    target: InvocationTarget,
}

impl SummaryService {
    pub fn new(generator: Arc<dyn TextGenerator>, target: InvocationTarget) -> Self {
        Self { generator, target }
    }

    pub fn from_config(generator: Arc<dyn TextGenerator>, config: &Config) -> Self {
        let target = InvocationTarget::resolve(
            &config.bedrock_inference_profile_id,
            &config.bedrock_inference_profile_arn,
            &config.bedrock_model_id,
        );
        Self::new(generator, target)
    }

    pub fn target(&self) -> &InvocationTarget {
        &self.target
    }

    /// Generates the summary for `claim_id` from `claim_notes`.
    ///
    /// Errors are logged with the claim ID and the failing stage, then returned as-is.
    pub async fn generate_summary(
        &self,
        claim_id: &str,
        claim_notes: &str,
    ) -> Result<ClaimSummary, SummaryError> {
        let result = self.run(claim_id, claim_notes).await;

        match &result {
            Ok(_) => info!(claim_id, target = %self.target, "Generated claim summary"),
            Err((stage, e)) => error!(
                claim_id,
                target = %self.target,
                stage = %stage,
                error = %e,
                "Claim summary generation failed"
            ),
        }

        result.map_err(|(_, e)| e)
    }

    async fn run(
        &self,
        claim_id: &str,
        claim_notes: &str,
    ) -> Result<ClaimSummary, (SummaryStage, SummaryError)> {
        let prompt = build_prompt(claim_notes);

        info!(
            claim_id,
            target = %self.target,
            target_kind = self.target.kind(),
            "Invoking Bedrock"
        );
        let envelope = self
            .generator
            .generate(&self.target, &prompt)
            .await
            .map_err(|e| (SummaryStage::Invoke, SummaryError::from(e)))?;

        let text = generated_text(&envelope).map_err(|e| (SummaryStage::ExtractText, e))?;

        parse_summary(json_payload(&text), claim_id, self.target.as_str())
            .map_err(|e| (SummaryStage::Parse, e.with_generated(&text)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;

    use crate::llm_client::{ContentBlock, LlmError, ResponseEnvelope};

    /// Generator that records what it was asked and replays a canned reply.
    pub(crate) struct FakeGenerator {
        reply: Mutex<Option<Result<ResponseEnvelope, LlmError>>>,
        pub(crate) calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeGenerator {
        pub(crate) fn replying(reply: Result<ResponseEnvelope, LlmError>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn converse_text(text: &str) -> Arc<Self> {
            Self::replying(Ok(ResponseEnvelope::Converse {
                message: Some(vec![ContentBlock::text(text)]),
            }))
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(
            &self,
            target: &InvocationTarget,
            prompt: &str,
        ) -> Result<ResponseEnvelope, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((target.as_str().to_string(), prompt.to_string()));
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("FakeGenerator called more than once")
        }
    }

    const EXAMPLE_REPLY: &str = "```json\n{\"overall_summary\":\"Roof water damage claim, estimate pending.\",\"customer_facing_summary\":\"We are assessing your roof damage.\",\"adjuster_focused_summary\":\"Roof water intrusion, awaiting estimate.\",\"recommended_next_step\":\"Schedule inspection.\"}\n```";

    fn config_with(profile_id: &str, profile_arn: &str, model_id: &str) -> Config {
        let vars = [
            ("BEDROCK_INFERENCE_PROFILE_ID", profile_id),
            ("BEDROCK_INFERENCE_PROFILE_ARN", profile_arn),
            ("BEDROCK_MODEL_ID", model_id),
        ];
        Config::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_fenced_reply() {
        let generator = FakeGenerator::converse_text(EXAMPLE_REPLY);
        let service = SummaryService::new(
            generator.clone(),
            InvocationTarget::ModelId("model-xyz".to_string()),
        );

        let before = Utc::now();
        let summary = service
            .generate_summary("C-42", "Water damage to roof, estimate pending.")
            .await
            .unwrap();

        assert_eq!(summary.claim_id, "C-42");
        assert_eq!(summary.model, "model-xyz");
        assert_eq!(
            summary.overall_summary,
            "Roof water damage claim, estimate pending."
        );
        assert_eq!(
            summary.customer_facing_summary,
            "We are assessing your roof damage."
        );
        assert_eq!(
            summary.adjuster_focused_summary,
            "Roof water intrusion, awaiting estimate."
        );
        assert_eq!(summary.recommended_next_step, "Schedule inspection.");
        assert!(summary.generated_at >= before && summary.generated_at <= Utc::now());

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "model-xyz");
        assert!(calls[0]
            .1
            .contains("Water damage to roof, estimate pending."));
    }

    #[tokio::test]
    async fn test_model_label_matches_sent_target_for_each_precedence() {
        let cases = [
            (config_with("profile-id", "profile-arn", "model-id"), "profile-id"),
            (config_with("", "profile-arn", "model-id"), "profile-arn"),
            (config_with("", "", "model-id"), "model-id"),
        ];

        for (config, expected) in cases {
            let generator = FakeGenerator::converse_text(r#"{"overall_summary":"o"}"#);
            let service = SummaryService::from_config(generator.clone(), &config);

            let summary = service.generate_summary("C-1", "notes").await.unwrap();

            assert_eq!(service.target().as_str(), expected);
            assert_eq!(summary.model, expected);
            assert_eq!(generator.calls.lock().unwrap()[0].0, expected);
        }
    }

    #[tokio::test]
    async fn test_invoke_style_reply() {
        let body = serde_json::json!({
            "content": [{"type": "text", "text": "Here you go: {\"overall_summary\": \"o\", \"recommended_next_step\": \"r\"}"}]
        });
        let generator = FakeGenerator::replying(Ok(ResponseEnvelope::Invoke {
            body: Bytes::from(serde_json::to_vec(&body).unwrap()),
        }));
        let service = SummaryService::new(
            generator,
            InvocationTarget::InferenceProfileArn("arn:profile".to_string()),
        );

        let summary = service.generate_summary("C-2", "notes").await.unwrap();
        assert_eq!(summary.overall_summary, "o");
        assert_eq!(summary.customer_facing_summary, "");
        assert_eq!(summary.recommended_next_step, "r");
        assert_eq!(summary.model, "arn:profile");
    }

    #[tokio::test]
    async fn test_empty_content_list_fails_extraction() {
        let generator = FakeGenerator::replying(Ok(ResponseEnvelope::Converse {
            message: Some(vec![]),
        }));
        let service = SummaryService::new(generator, InvocationTarget::ModelId("m".to_string()));

        let err = service.generate_summary("C-3", "notes").await.unwrap_err();
        assert!(matches!(err, SummaryError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_missing_output_message_fails_extraction() {
        let generator = FakeGenerator::replying(Ok(ResponseEnvelope::Converse { message: None }));
        let service = SummaryService::new(generator, InvocationTarget::ModelId("m".to_string()));

        let err = service.generate_summary("C-3", "notes").await.unwrap_err();
        assert!(matches!(err, SummaryError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_prose_reply_fails_parse() {
        let generator = FakeGenerator::converse_text("Sorry, I can't help with that.");
        let service = SummaryService::new(generator, InvocationTarget::ModelId("m".to_string()));

        let err = service.generate_summary("C-4", "notes").await.unwrap_err();
        match err {
            SummaryError::Parse { text, .. } => assert_eq!(text, "Sorry, I can't help with that."),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_parse_error_keeps_full_generated_text() {
        let reply = "Here is the summary: {overall_summary: unquoted} Hope this helps!";
        let generator = FakeGenerator::converse_text(reply);
        let service = SummaryService::new(generator, InvocationTarget::ModelId("m".to_string()));

        let err = service.generate_summary("C-6", "notes").await.unwrap_err();
        match &err {
            SummaryError::Parse {
                text, generated, ..
            } => {
                assert_eq!(text, "{overall_summary: unquoted}");
                assert_eq!(generated, reply);
            }
            other => panic!("expected Parse, got {other:?}"),
        }
        assert!(err.to_string().contains("Hope this helps!"));
    }

    #[tokio::test]
    async fn test_whitespace_reply_fails_extraction() {
        let generator = FakeGenerator::converse_text("  \n ");
        let service = SummaryService::new(generator, InvocationTarget::ModelId("m".to_string()));

        let err = service.generate_summary("C-6", "notes").await.unwrap_err();
        assert!(matches!(err, SummaryError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_transport_error_is_passed_through() {
        use std::error::Error;

        let generator = FakeGenerator::replying(Err(LlmError::service(
            "Converse",
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"),
        )));
        let service = SummaryService::new(generator, InvocationTarget::ModelId("m".to_string()));

        let err = service.generate_summary("C-5", "notes").await.unwrap_err();
        assert!(matches!(
            err,
            SummaryError::Transport(LlmError::Service { .. })
        ));
        // transparent: the LLM error's own source chain is preserved
        let root = err.source().unwrap();
        assert!(root.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(SummaryStage::Invoke.to_string(), "invoke");
        assert_eq!(SummaryStage::ExtractText.to_string(), "extract_text");
        assert_eq!(SummaryStage::Parse.to_string(), "parse");
    }
}
