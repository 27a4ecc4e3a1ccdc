//! Reflection conversation: the turn log and the chat view built from it.

mod chat;
mod message;

pub use chat::{
    BubbleState, ChatBubble, ChatView, FAILED_TEXT, OPENING_FAILED_TEXT, OPENING_LOADING_TEXT,
    OpeningStatus, PENDING_TEXT,
};
pub use message::{ConversationLog, ConversationTurn, TurnRole};
