pub mod ambient;
pub mod conversation;
pub mod frame_loop;
pub mod in_flight;
pub mod prompts;
pub mod session_usecase;

pub use conversation::{ConversationController, Reply};
pub use session_usecase::{ChartStep, SessionUseCase};
