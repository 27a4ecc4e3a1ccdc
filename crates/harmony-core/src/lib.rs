//! Domain layer of the Harmony self-reflection session.
//!
//! Everything here is synchronous and free of I/O except for the async
//! `TextGenerator` and `JournalStore` contracts that outer crates implement.

pub mod audio;
pub mod blobs;
pub mod chart;
pub mod config;
pub mod conversation;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod interaction;
pub mod journal;
pub mod prompt;
pub mod session;

pub use error::{HarmonyError, Result};
