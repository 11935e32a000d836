//! Query-side retrieval.
//!
//! Embeds a question, searches a persisted vector index, and builds
//! the prompt handed to the answer model.

pub mod prompt;
mod retriever;

pub use prompt::{join_context, render, PROMPT_TEMPLATE};
pub use retriever::Retriever;
