use thiserror::Error;

use crate::llm_client::LlmError;

#[derive(Debug, Error)]
pub enum SummaryError {
    /// The endpoint answered but no usable text could be found.
    #[error("No generated text found: {0}")]
    Extraction(String),

    /// `text` is the isolated payload; `generated` is everything the model returned.
    #[error("Summary payload is not valid JSON: {source}; payload: {text}; generated text: {generated}")]
    Parse {
        #[source]
        source: serde_json::Error,
        text: String,
        generated: String,
    },

    #[error("Summary payload is not a JSON object: {text}; generated text: {generated}")]
    NotAnObject { text: String, generated: String },

    #[error(transparent)]
    Transport(#[from] LlmError),
}

impl SummaryError {
    /// Records the full generated text on payload errors.
    pub fn with_generated(self, generated_text: &str) -> Self {
        match self {
            SummaryError::Parse { source, text, .. } => SummaryError::Parse {
                source,
                text,
                generated: generated_text.to_string(),
            },
            SummaryError::NotAnObject { text, .. } => SummaryError::NotAnObject {
                text,
                generated: generated_text.to_string(),
            },
            other => other,
        }
    }
}
