/// Summarization prompt template. Replace `{claim_notes}` before sending.
const CLAIM_SUMMARY_PROMPT_TEMPLATE: &str = r#"Analyze the following insurance claim notes and provide structured summaries:

CLAIM NOTES:
{claim_notes}

Please provide your response in the following JSON format:
{
    "overall_summary": "A concise 2-3 sentence summary of the entire claim",
    "customer_facing_summary": "A professional, empathetic summary suitable for the customer (avoid jargon)",
    "adjuster_focused_summary": "A detailed technical summary for insurance adjusters with key facts and assessments",
    "recommended_next_step": "A specific recommended action for the insurance team to take next"
}

Ensure the response is valid JSON that can be parsed."#;

/// Renders the claim notes into the summarization prompt.
/// Notes are interpolated verbatim, with no escaping.
pub fn build_prompt(claim_notes: &str) -> String {
    // Split instead of `replace` so notes that themselves contain the placeholder are left alone.
    let (head, tail) = CLAIM_SUMMARY_PROMPT_TEMPLATE
        .split_once("{claim_notes}")
        .unwrap_or((CLAIM_SUMMARY_PROMPT_TEMPLATE, ""));

    let mut prompt = String::with_capacity(head.len() + claim_notes.len() + tail.len());
    prompt.push_str(head);
    prompt.push_str(claim_notes);
    prompt.push_str(tail);
    prompt
}
