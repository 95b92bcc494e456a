use std::path::Path;

use serde::Deserialize;

use crate::tickers::normalize_tickers;
use crate::ConfigError;

/// On-disk watchlist: the set of tickers a default run processes.
#[derive(Debug, Deserialize)]
pub struct WatchlistFile {
    pub tickers: Vec<String>,
}

/// Load and validate the watchlist from a YAML file.
///
/// The returned tickers are already normalized (trimmed, uppercased, blanks
/// dropped).
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or if no
/// usable ticker remains after normalization.
pub fn load_watchlist(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WatchlistIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: WatchlistFile = serde_yaml::from_str(&content)?;
    let tickers = normalize_tickers(&file.tickers);
    if tickers.is_empty() {
        return Err(ConfigError::Validation(format!(
            "watchlist {} contains no usable tickers",
            path.display()
        )));
    }
    Ok(tickers)
}
