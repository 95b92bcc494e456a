//! Market-data collaborator: daily-candle chart API client.
//!
//! Fetches a ticker's recent daily history and condenses it into the
//! [`tickercast_core::PriceSummary`] the analysis prompt is built from.

mod client;
mod error;
mod summary;
mod types;

pub use client::QuoteClient;
pub use error::QuoteError;
