//! Opener selection for the reflection conversation.
//!
//! `heuristic` decides the category from the finished entry; `template` turns
//! the decision into the question text.

mod heuristic;
mod template;

pub use heuristic::{
    AxisReading, DominantAxis, GapCategory, LOW_CONGRUENCE_THRESHOLD, MIN_SIGNIFICANT_GAP,
    PromptSelection, select_prompt,
};
