//! Text-generation collaborator and structured-output extraction.
//!
//! [`LlmClient`] talks to an OpenAI-compatible chat-completions endpoint;
//! [`extract::parse_analysis`] recovers a typed [`tickercast_core::AnalysisRecord`]
//! from whatever text the model produced, no matter how mangled.

mod client;
mod error;
pub mod extract;
pub mod prompt;

pub use client::LlmClient;
pub use error::AnalystError;
