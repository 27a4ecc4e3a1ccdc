//! System and user prompts for the three generation channels.
//!
//! Each request type carries its template and renders itself with minijinja.

use harmony_core::error::{HarmonyError, Result};
use minijinja::Environment;
use serde::Serialize;

/// User prompt sent with the opening instruction.
pub const OPENING_USER_PROMPT: &str = "Please give me the question.";
/// User prompt sent with the scribe instruction.
pub const SUMMARY_USER_PROMPT: &str = "Update the file.";

/// A serializable request that renders into prompt text.
pub trait PromptTemplate: Serialize {
    const TEMPLATE: &'static str;

    fn to_prompt(&self) -> Result<String> {
        Environment::new()
            .render_str(Self::TEMPLATE, self)
            .map_err(|e| HarmonyError::internal(format!("prompt template failed: {e}")))
    }
}

/// Wraps the selected question for light rephrasing.
#[derive(Debug, Clone, Serialize)]
pub struct OpeningQuestionRequest {
    /// Prior summary; rendered as "New Patient" when absent.
    pub history: Option<String>,
    pub template: String,
}

impl PromptTemplate for OpeningQuestionRequest {
    const TEMPLATE: &'static str = r#"
Role: You are a Compassionate Architect of the Self.
Goal: Use the provided template to ask the user a reflection question.
Tone: Validating, Curious, Somatic, Action-Oriented.
History: {{ history if history else "New Patient" }}

INSTRUCTIONS:
- The backend has already selected the perfect question template for this user.
- Your job is to output this question.
- You may make minor edits to smooth the phrasing, but KEEP THE CORE MESSAGE AND STRUCTURE.
- DO NOT use quotation marks around the output.
- DO NOT explain why you chose it.
- DO NOT say "Based on your data".
- Output ONLY the question.

TEMPLATE:
{{ template }}
"#;
}

/// Instruction for conversational replies.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoachReplyRequest {}

impl PromptTemplate for CoachReplyRequest {
    const TEMPLATE: &'static str = r#"You are a Compassionate Integration Coach.
INSTRUCTIONS:
- Keep your replies SHORT, SNAPPY, and ONE SENTENCE mostly.
- Be like a mirror: reflect back what they said with a deepening question.
- NO quotation marks.
- Natural, conversational tone."#;
}

/// Instruction that folds the session log into the running summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryUpdateRequest {
    pub old_summary: Option<String>,
    pub log: String,
}

impl PromptTemplate for SummaryUpdateRequest {
    const TEMPLATE: &'static str = r#"You are a Medical Scribe for a Psychologist. Update the "Patient File Summary" based on the new session logs.
- OLD SUMMARY: {{ old_summary if old_summary else "None" }}
- NEW SESSION LOG: {{ log }}

INSTRUCTIONS:
- rewrite the summary to include new insights.
- Highlight recurring themes (e.g. "User consistently scores low on Bodily Self").
- Keep it under 150 words.
- Output ONLY the new summary text."#;
}
