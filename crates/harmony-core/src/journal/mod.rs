//! Journal persistence: record types and the store contract.

mod model;
mod repository;

pub use model::{ARCHITECTURE_DESCRIPTION, CONGRUENCE_DESCRIPTION, JournalRecord};
pub use repository::JournalStore;
