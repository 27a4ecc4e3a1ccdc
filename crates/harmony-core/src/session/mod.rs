//! Session scenes and the state object that sequences them.

mod scene;
mod state;

pub use scene::Scene;
pub use state::{SIDEBAR_WIDTH, SessionState};
