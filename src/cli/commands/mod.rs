//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a
//! specific CLI command.

pub mod ask;
pub mod chat;
pub mod completions;
pub mod config;
pub mod index;
pub mod process;

// Re-export argument types for use in mod.rs
pub use ask::AskArgs;
pub use chat::ChatArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use process::ProcessArgs;
