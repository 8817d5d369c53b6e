use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Model used when `BEDROCK_MODEL_ID` is unset or blank.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Which Bedrock API shape is used to reach the generation endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvokeStyle {
    /// `Converse` API; works with model IDs and inference profiles alike.
    #[default]
    Converse,
    /// `InvokeModel` with the Anthropic messages body.
    Invoke,
}

impl std::str::FromStr for InvokeStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "converse" => Ok(InvokeStyle::Converse),
            "invoke" => Ok(InvokeStyle::Invoke),
            other => bail!("BEDROCK_INVOKE_STYLE must be 'converse' or 'invoke', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub aws_region: Option<String>,
    /// Endpoint override for local stacks (LocalStack, MinIO).
    pub aws_endpoint_url: Option<String>,
    pub claims_table: String,
    pub notes_bucket: String,
    pub bedrock_model_id: String,
    pub bedrock_inference_profile_id: String,
    pub bedrock_inference_profile_arn: String,
    pub bedrock_invoke_style: InvokeStyle,
    pub aws_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            aws_region: var("AWS_REGION"),
            aws_endpoint_url: var("AWS_ENDPOINT_URL"),
            claims_table: var("CLAIMS_TABLE_NAME").unwrap_or_else(|| "claims".to_string()),
            notes_bucket: var("NOTES_BUCKET_NAME").unwrap_or_else(|| "claim-notes".to_string()),
            bedrock_model_id: var("BEDROCK_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            bedrock_inference_profile_id: var("BEDROCK_INFERENCE_PROFILE_ID").unwrap_or_default(),
            bedrock_inference_profile_arn: var("BEDROCK_INFERENCE_PROFILE_ARN")
                .unwrap_or_default(),
            bedrock_invoke_style: var("BEDROCK_INVOKE_STYLE")
                .map(|s| s.parse::<InvokeStyle>())
                .transpose()?
                .unwrap_or_default(),
            aws_timeout: Duration::from_secs(
                var("BEDROCK_TIMEOUT_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse::<u64>()
                    .context("BEDROCK_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
