use std::fmt;

/// The identifier handed to Bedrock as `modelId`. Resolved once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationTarget {
    InferenceProfileId(String),
    InferenceProfileArn(String),
    ModelId(String),
}

impl InvocationTarget {
    /// Picks the target: profile ID, then profile ARN, then model ID.
    /// Blank or whitespace-only values are treated as not configured.
    pub fn resolve(profile_id: &str, profile_arn: &str, model_id: &str) -> Self {
        if !profile_id.trim().is_empty() {
            InvocationTarget::InferenceProfileId(profile_id.to_string())
        } else if !profile_arn.trim().is_empty() {
            InvocationTarget::InferenceProfileArn(profile_arn.to_string())
        } else {
            InvocationTarget::ModelId(model_id.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InvocationTarget::InferenceProfileId(s)
            | InvocationTarget::InferenceProfileArn(s)
            | InvocationTarget::ModelId(s) => s,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InvocationTarget::InferenceProfileId(_) => "inference_profile_id",
            InvocationTarget::InferenceProfileArn(_) => "inference_profile_arn",
            InvocationTarget::ModelId(_) => "model_id",
        }
    }
}

impl fmt::Display for InvocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
