//! Minimal OpenAI client for judgment-style LLM calls.
//!
//! Exposes a thin chat-completions agent ([`OpenAi`]) plus the
//! [`StructuredOutput`] helper for requesting schema-constrained JSON
//! responses.

pub mod openai;

pub use openai::{OpenAi, StructuredOutput};
