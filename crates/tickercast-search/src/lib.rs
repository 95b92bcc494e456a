//! Context-search collaborator: ticker news and macro-background snippets.
//!
//! Wraps a search API that answers free-text queries with content snippets
//! and an optional synthesized answer. The pipeline's item fetcher turns
//! failures from this client into `"Error: <message>"` marker lists; the
//! client itself stays `Result`-shaped.

mod client;
mod error;

pub use client::SearchClient;
pub use error::SearchError;
