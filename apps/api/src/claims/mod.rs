// Claims API: claim records, claim notes, and on-demand summaries.
// Summaries go through summary::SummaryService; no direct Bedrock calls here.

pub mod handlers;
