//! LLM provider access.
//!
//! - [`ChatClient`]: OpenAI-compatible chat-completion client
//! - [`ChatCompletion`]: the raw text-generation seam, stubbed in tests
//! - [`StructuredClient`]: prompt + schema in, validated value out

mod client;
mod structured;
mod types;

pub use client::*;
pub use structured::*;
pub use types::*;
