//! Firebase REST clients: Identity Toolkit sign-in and the Realtime Database
//! journal store.

pub mod auth;
pub mod dto;
pub mod realtime_db;

pub use auth::{AuthError, FirebaseAuth, FirebaseUser};
pub use realtime_db::FirebaseJournalStore;
