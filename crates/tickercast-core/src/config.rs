use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any set variable has an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if any set variable has an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation core is decoupled from the real environment so tests
/// can drive it with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let llm_api_key = lookup("TICKERCAST_LLM_API_KEY").ok();
    let llm_base_url = or_default("TICKERCAST_LLM_BASE_URL", "https://api.deepseek.com");
    let llm_model = or_default("TICKERCAST_LLM_MODEL", "deepseek-reasoner");
    let search_api_key = lookup("TICKERCAST_SEARCH_API_KEY").ok();
    let sheet_id = lookup("TICKERCAST_SHEET_ID").ok();
    let sheets_token = lookup("TICKERCAST_SHEETS_TOKEN").ok();

    let state_dir = PathBuf::from(or_default("TICKERCAST_STATE_DIR", "./pipeline_state"));
    let watchlist_path = PathBuf::from(or_default(
        "TICKERCAST_WATCHLIST_PATH",
        "./config/watchlist.yaml",
    ));

    let concurrency = parse_usize("TICKERCAST_CONCURRENCY", "5")?;
    if concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TICKERCAST_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let max_retries = parse_u32("TICKERCAST_MAX_RETRIES", "2")?;
    let lookback_days = parse_u32("TICKERCAST_LOOKBACK_DAYS", "30")?;
    let top_k = parse_usize("TICKERCAST_TOP_K", "5")?;
    let request_timeout_secs = parse_u64("TICKERCAST_REQUEST_TIMEOUT_SECS", "30")?;

    let quotes_base_url = or_default(
        "TICKERCAST_QUOTES_BASE_URL",
        "https://query1.finance.yahoo.com",
    );
    let search_base_url = or_default("TICKERCAST_SEARCH_BASE_URL", "https://api.tavily.com");

    Ok(AppConfig {
        llm_api_key,
        llm_base_url,
        llm_model,
        search_api_key,
        sheet_id,
        sheets_token,
        state_dir,
        watchlist_path,
        concurrency,
        max_retries,
        lookback_days,
        top_k,
        request_timeout_secs,
        quotes_base_url,
        search_base_url,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.llm_api_key.is_none());
        assert!(cfg.search_api_key.is_none());
        assert!(cfg.sheet_id.is_none());
        assert_eq!(cfg.llm_base_url, "https://api.deepseek.com");
        assert_eq!(cfg.llm_model, "deepseek-reasoner");
        assert_eq!(cfg.concurrency, 5);
        assert_eq!(cfg.max_retries, 2);
        assert_eq!(cfg.lookback_days, 30);
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.state_dir, PathBuf::from("./pipeline_state"));
        assert_eq!(cfg.watchlist_path, PathBuf::from("./config/watchlist.yaml"));
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = HashMap::new();
        map.insert("TICKERCAST_CONCURRENCY", "8");
        map.insert("TICKERCAST_TOP_K", "3");
        map.insert("TICKERCAST_LLM_MODEL", "deepseek-chat");
        map.insert("TICKERCAST_STATE_DIR", "/tmp/ckpt");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.concurrency, 8);
        assert_eq!(cfg.top_k, 3);
        assert_eq!(cfg.llm_model, "deepseek-chat");
        assert_eq!(cfg.state_dir, PathBuf::from("/tmp/ckpt"));
    }

    #[test]
    fn build_app_config_rejects_non_numeric_concurrency() {
        let mut map = HashMap::new();
        map.insert("TICKERCAST_CONCURRENCY", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TICKERCAST_CONCURRENCY"),
            "expected InvalidEnvVar(TICKERCAST_CONCURRENCY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_concurrency() {
        let mut map = HashMap::new();
        map.insert("TICKERCAST_CONCURRENCY", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TICKERCAST_CONCURRENCY"),
            "expected InvalidEnvVar(TICKERCAST_CONCURRENCY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_invalid_max_retries() {
        let mut map = HashMap::new();
        map.insert("TICKERCAST_MAX_RETRIES", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TICKERCAST_MAX_RETRIES"),
            "expected InvalidEnvVar(TICKERCAST_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn require_accessors_name_the_missing_var() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();

        let err = cfg.require_llm_api_key().unwrap_err();
        assert!(err.to_string().contains("TICKERCAST_LLM_API_KEY"));

        let err = cfg.require_search_api_key().unwrap_err();
        assert!(err.to_string().contains("TICKERCAST_SEARCH_API_KEY"));

        let err = cfg.require_sheet_id().unwrap_err();
        assert!(err.to_string().contains("TICKERCAST_SHEET_ID"));

        let err = cfg.require_sheets_token().unwrap_err();
        assert!(err.to_string().contains("TICKERCAST_SHEETS_TOKEN"));
    }

    #[test]
    fn require_accessors_return_present_values() {
        let mut map = HashMap::new();
        map.insert("TICKERCAST_LLM_API_KEY", "sk-test");
        map.insert("TICKERCAST_SEARCH_API_KEY", "tvly-test");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.require_llm_api_key().unwrap(), "sk-test");
        assert_eq!(cfg.require_search_api_key().unwrap(), "tvly-test");
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut map = HashMap::new();
        map.insert("TICKERCAST_LLM_API_KEY", "sk-secret");
        map.insert("TICKERCAST_SHEETS_TOKEN", "ya29.secret");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("sk-secret"), "api key leaked: {rendered}");
        assert!(!rendered.contains("ya29.secret"), "token leaked: {rendered}");
        assert!(rendered.contains("[redacted]"));
    }
}
