//! Shared foundation for the tickercast pipeline.
//!
//! Holds the environment-driven configuration, ticker normalization, the
//! watchlist file loader, the record types passed between pipeline stages,
//! and the retry policy used by every collaborator client.

mod app_config;
mod config;
mod error;
pub mod retry;
mod tickers;
mod types;
mod watchlist;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use tickers::normalize_tickers;
pub use types::{AnalysisRecord, GatheredRecord, MarketData, PriceSummary};
pub use watchlist::{load_watchlist, WatchlistFile};
