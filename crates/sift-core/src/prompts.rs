//! Prompt templates for every model call the pipeline makes.

/// Instruction used for the report's action steps.
pub const REPORT_ACTION_INSTRUCTION: &str =
    "Suggest actionable steps the instructor can take to improve the course, based on the feedback";

/// Render items as one `- item` bullet per line.
pub fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking whether one feedback item is inappropriate or carries PII.
pub fn classification(text: &str) -> String {
    format!(
        "You review student feedback before it is shared with an instructor. \
For the feedback below, respond with a JSON object with exactly these keys:\n\
1. \"contains_inappropriate\": true if the feedback is abusive, hateful, harassing or otherwise inappropriate, else false\n\
2. \"contains_pii\": true if the feedback contains personally identifying information (names, emails, phone numbers, student IDs), else false\n\
3. \"cleaned_text\": the feedback with every piece of personal information replaced by \"[REDACTED]\"\n\n\
Respond with raw JSON only, no markdown fences and no commentary.\n\n\
Feedback:\n{text}"
    )
}

/// Prompt asking for a thematic summary and a sentiment tally.
pub fn analysis(items: &[String]) -> String {
    format!(
        "Analyze the following student feedback and respond with a JSON object with these keys:\n\
1. \"summary\": a short paragraph describing the overall themes\n\
2. \"sentiment\": an object with integer fields \"positive\", \"neutral\" and \"negative\" \
counting the feedback items of each tone\n\n\
Judge the tone of each item holistically, from its overall meaning, rather than by counting keywords. \
Respond with raw JSON only, no markdown fences and no commentary.\n\n\
Feedback:\n{}",
        bullet_list(items)
    )
}

/// Prompt asking for a concise bulleted list toward `instruction`.
pub fn action_steps(items: &[String], instruction: &str) -> String {
    format!(
        "You are an experienced teaching advisor. {}. \
Respond with a concise bulleted list, one suggestion per line, each line starting with \"- \".\n\n\
Feedback:\n{}",
        instruction.trim().trim_end_matches('.'),
        bullet_list(items)
    )
}
