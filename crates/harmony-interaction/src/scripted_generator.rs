//! Offline generator with deterministic answers.
//!
//! Routes on the user prompt, never on the system prompt, which may quote
//! the user's own words:
//! - opening: the user prompt asks for the question; the system prompt's
//!   trailing `TEMPLATE:` block is echoed
//! - summary: the user prompt asks to update the file; the user lines of the
//!   log become the summary
//! - reply: anything else gets a mirror question built from the last user line

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use harmony_core::generation::{GenerationError, GenerationRequest, TextGenerator};

const TEMPLATE_MARKER: &str = "TEMPLATE:";
const OPENING_PROMPT: &str = "Please give me the question.";
const SUMMARY_PROMPT: &str = "Update the file.";
const USER_LINE_PREFIXES: [&str; 2] = ["User: ", "user: "];
const SUMMARY_LINE_LIMIT: usize = 5;

#[derive(Default)]
pub struct ScriptedGenerator {
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of generate calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match request.prompt.trim() {
            SUMMARY_PROMPT => Ok(summarize(&request.system_prompt)),
            OPENING_PROMPT => template_block(&request.system_prompt).ok_or(GenerationError::EmptyOutput),
            _ => Ok(mirror(&request.prompt)),
        }
    }
}

fn template_block(system_prompt: &str) -> Option<String> {
    let (_, rest) = system_prompt.rsplit_once(TEMPLATE_MARKER)?;
    let template = rest.trim();
    (!template.is_empty()).then(|| template.to_string())
}

fn user_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            USER_LINE_PREFIXES
                .iter()
                .find_map(|prefix| line.strip_prefix(prefix))
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn summarize(system_prompt: &str) -> String {
    let lines = user_lines(system_prompt);
    if lines.is_empty() {
        return "No new insights this session.".to_string();
    }
    let start = lines.len().saturating_sub(SUMMARY_LINE_LIMIT);
    format!("The user talked about: {}", lines[start..].join("; "))
}

fn mirror(transcript: &str) -> String {
    match user_lines(transcript).last() {
        Some(last) => format!(
            "You said \"{}\". What do you notice in your body as you say that?",
            last.trim_end_matches(['.', '!', '?'])
        ),
        None => "What feels most present for you right now?".to_string(),
    }
}
