//! Conversation turns and the append-only session log.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TurnRole {
    /// Text the user typed.
    User,
    /// Text the model produced.
    Assistant,
}

/// A single turn in the reflection conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
    /// Creation time (RFC 3339).
    pub timestamp: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Ordered turns of one session. Turns are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: TurnRole, text: impl Into<String>) -> &ConversationTurn {
        self.turns.push(ConversationTurn::new(role, text));
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Transcript for the coach prompt, ending with an open `Coach:` line.
    pub fn coach_transcript(&self) -> String {
        let lines: Vec<String> = self
            .turns
            .iter()
            .map(|turn| {
                let speaker = match turn.role {
                    TurnRole::User => "User",
                    TurnRole::Assistant => "Coach",
                };
                format!("{speaker}: {}", turn.text)
            })
            .collect();
        format!("{}\nCoach:", lines.join("\n"))
    }

    /// Raw `role: text` lines for the scribe prompt.
    pub fn scribe_log(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
