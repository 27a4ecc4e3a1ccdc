pub mod firebase;
pub mod paths;
pub mod storage;

pub use firebase::{FirebaseAuth, FirebaseJournalStore, FirebaseUser};
pub use paths::{HarmonyPaths, PathError};
pub use storage::{ConfigStorage, ConfigStorageError, InMemoryJournalStore};
