//! Chat view model shown in the reflection scene.

use serde::{Deserialize, Serialize};

use super::message::TurnRole;

/// Placeholder shown while a reply is pending.
pub const PENDING_TEXT: &str = "...";
/// Inline marker left in place of a failed reply.
pub const FAILED_TEXT: &str = "error...";
/// Shown until the opening question arrives.
pub const OPENING_LOADING_TEXT: &str = "Reading your architecture...";
/// Replaces the loading line when the opening question fails.
pub const OPENING_FAILED_TEXT: &str = "Error connecting to AI. Please refresh.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleState {
    Final,
    Pending,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatBubble {
    pub role: TurnRole,
    pub text: String,
    pub state: BubbleState,
}

/// State of the line above the chat before the first question shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningStatus {
    Loading,
    Ready,
    Failed,
}

/// Bubbles in display order plus the opening status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatView {
    bubbles: Vec<ChatBubble>,
    opening: OpeningStatus,
}

impl Default for ChatView {
    fn default() -> Self {
        Self {
            bubbles: Vec::new(),
            opening: OpeningStatus::Loading,
        }
    }
}

impl ChatView {
    pub fn bubbles(&self) -> &[ChatBubble] {
        &self.bubbles
    }

    pub fn opening(&self) -> OpeningStatus {
        self.opening
    }

    /// Text of the status line, if one is showing.
    pub fn status_line(&self) -> Option<&'static str> {
        match self.opening {
            OpeningStatus::Loading => Some(OPENING_LOADING_TEXT),
            OpeningStatus::Failed => Some(OPENING_FAILED_TEXT),
            OpeningStatus::Ready => None,
        }
    }

    /// The input box only appears once the opening question is shown.
    pub fn input_enabled(&self) -> bool {
        self.opening == OpeningStatus::Ready
    }

    pub fn show_opening(&mut self, question: &str) {
        self.opening = OpeningStatus::Ready;
        self.push_final(TurnRole::Assistant, question);
    }

    pub fn fail_opening(&mut self) {
        self.opening = OpeningStatus::Failed;
    }

    pub fn push_final(&mut self, role: TurnRole, text: &str) {
        self.bubbles.push(ChatBubble {
            role,
            text: text.trim().to_string(),
            state: BubbleState::Final,
        });
    }

    /// Adds the "..." placeholder and returns its position.
    pub fn push_pending(&mut self) -> usize {
        self.bubbles.push(ChatBubble {
            role: TurnRole::Assistant,
            text: PENDING_TEXT.to_string(),
            state: BubbleState::Pending,
        });
        self.bubbles.len() - 1
    }

    /// Replaces the placeholder at `index` with the reply.
    pub fn resolve(&mut self, index: usize, reply: &str) {
        if let Some(bubble) = self.pending_mut(index) {
            bubble.text = reply.trim().to_string();
            bubble.state = BubbleState::Final;
        }
    }

    /// Leaves the inline error marker where the placeholder was.
    pub fn fail(&mut self, index: usize) {
        if let Some(bubble) = self.pending_mut(index) {
            bubble.text = FAILED_TEXT.to_string();
            bubble.state = BubbleState::Failed;
        }
    }

    fn pending_mut(&mut self, index: usize) -> Option<&mut ChatBubble> {
        self.bubbles
            .get_mut(index)
            .filter(|bubble| bubble.state == BubbleState::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_gates_input() {
        let mut view = ChatView::default();
        assert!(!view.input_enabled());
        assert_eq!(view.status_line(), Some(OPENING_LOADING_TEXT));

        view.show_opening("\n  How are you?  ");
        assert!(view.input_enabled());
        assert_eq!(view.status_line(), None);
        assert_eq!(view.bubbles()[0].text, "How are you?");
    }

    #[test]
    fn test_failed_opening_keeps_input_hidden() {
        let mut view = ChatView::default();
        view.fail_opening();
        assert!(!view.input_enabled());
        assert_eq!(view.status_line(), Some(OPENING_FAILED_TEXT));
    }

    #[test]
    fn test_pending_bubble_resolves_once() {
        let mut view = ChatView::default();
        view.push_final(TurnRole::User, "hi");
        let index = view.push_pending();
        assert_eq!(view.bubbles()[index].text, "...");

        view.resolve(index, " hello ");
        assert_eq!(view.bubbles()[index].text, "hello");
        assert_eq!(view.bubbles()[index].state, BubbleState::Final);

        view.fail(index);
        assert_eq!(view.bubbles()[index].text, "hello");
    }

    #[test]
    fn test_failed_reply_shows_marker() {
        let mut view = ChatView::default();
        let index = view.push_pending();
        view.fail(index);
        assert_eq!(view.bubbles()[index].text, "error...");
        assert_eq!(view.bubbles()[index].state, BubbleState::Failed);
    }
}
