//! Text-generation backends.

pub mod replicate_proxy_agent;
pub mod scripted_generator;

pub use replicate_proxy_agent::ReplicateProxyAgent;
pub use scripted_generator::ScriptedGenerator;
