/// Normalize a raw ticker list: trim, uppercase, drop blank entries.
///
/// Order is preserved and duplicates are kept — downstream maps keyed by
/// ticker collapse them naturally.
#[must_use]
pub fn normalize_tickers(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}
