//! Local storage: the config file and the in-memory journal.

pub mod config_storage;
pub mod memory;

pub use config_storage::{ConfigStorage, ConfigStorageError, apply_env_overrides};
pub use memory::InMemoryJournalStore;
