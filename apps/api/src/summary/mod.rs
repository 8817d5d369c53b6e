// Claim summarization: prompt → Bedrock → generated text → JSON payload → ClaimSummary.
// All Bedrock calls go through llm_client.

pub mod error;
pub mod extract;
pub mod parser;
pub mod prompts;
pub mod service;

pub use error::SummaryError;
pub use service::SummaryService;
