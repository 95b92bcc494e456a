//! Tolerant extraction of a typed analysis record from generated text.
//!
//! Models are asked for bare JSON but return it wrapped in prose, code
//! fences, or single-quoted pseudo-JSON often enough that strict parsing is
//! not an option. [`parse_analysis`] tries progressively more forgiving
//! passes and bottoms out in a zero-prediction fallback record — it never
//! fails, so one mangled response can never take down a batch.

use regex::Regex;
use serde_json::Value;

use tickercast_core::AnalysisRecord;

const EMPTY_MSG: &str = "Could not parse model output (empty).";
const UNPARSEABLE_MSG: &str = "Could not parse model output.";
const NO_REASON_MSG: &str = "No reason provided.";

/// Parse generated text into an [`AnalysisRecord`] for `ticker`, dated
/// `date`. Total: every input yields a well-formed record.
///
/// Passes, in order: locate the first top-level `{...}` block (stripping
/// code fences when present), strict JSON parse, single-quote repair parse,
/// permissive literal-syntax parse, fallback record.
#[must_use]
pub fn parse_analysis(raw: &str, ticker: &str, date: &str) -> AnalysisRecord {
    let text = raw.trim();
    if text.is_empty() {
        return fallback(ticker, date, EMPTY_MSG);
    }

    let mut block = find_json_block(text).to_owned();
    if block.contains("```") {
        let stripped = block.replace("```json", "").replace("```", "");
        block = find_json_block(&stripped).to_owned();
    }

    let parsed = serde_json::from_str::<Value>(&block)
        .ok()
        .or_else(|| serde_json::from_str(&requote_single_quoted(&block)).ok())
        .or_else(|| parse_literal_syntax(&block));

    let Some(Value::Object(fields)) = parsed else {
        tracing::warn!(ticker, "model output unparseable — using fallback record");
        return fallback(ticker, date, UNPARSEABLE_MSG);
    };

    AnalysisRecord {
        date: date.to_owned(),
        ticker: ticker.to_owned(),
        predicted_change_pct: coerce_pct(fields.get("predicted_change_pct")),
        reason: coerce_reason(fields.get("reason")),
    }
}

/// First top-level brace-delimited block: scan to the first `{`, then track
/// depth until it returns to zero. Falls back to the tail (or the whole
/// input when there is no `{`) so later passes still get a chance.
fn find_json_block(s: &str) -> &str {
    let Some(start) = s.find('{') else {
        return s;
    };
    let mut depth = 0usize;
    for (i, c) in s[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &s[start..=start + i];
                }
            }
            _ => {}
        }
    }
    &s[start..]
}

/// Rewrites single-quoted keys/values that are followed by `:`, `,` or `]`
/// to double-quoted. Values directly before `}` are left for the literal
/// pass.
fn requote_single_quoted(block: &str) -> String {
    let re = Regex::new(r"'([^']*)'(\s*[:,\]])").expect("valid requote regex");
    re.replace_all(block, "\"${1}\"${2}").into_owned()
}

/// Last resort: treat the block as Python-style literal syntax — swap
/// `True`/`False`/`None` for their JSON spellings, swap every single quote
/// for a double quote, drop trailing commas — and parse the result.
fn parse_literal_syntax(block: &str) -> Option<Value> {
    let words = Regex::new(r"\b(True|False|None)\b").expect("valid literal-words regex");
    let trailing = Regex::new(r",\s*([}\]])").expect("valid trailing-comma regex");

    let repaired = words.replace_all(block, |caps: &regex::Captures<'_>| {
        match caps.get(1).map_or("", |m| m.as_str()) {
            "True" => "true",
            "False" => "false",
            _ => "null",
        }
    });
    let repaired = repaired.replace('\'', "\"");
    let repaired = trailing.replace_all(&repaired, "${1}");

    serde_json::from_str(&repaired).ok()
}

fn coerce_pct(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn coerce_reason(value: Option<&Value>) -> String {
    let reason = match value {
        Some(Value::String(s)) => s.trim().to_owned(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };
    if reason.is_empty() {
        NO_REASON_MSG.to_owned()
    } else {
        reason
    }
}

fn fallback(ticker: &str, date: &str, reason: &str) -> AnalysisRecord {
    AnalysisRecord {
        date: date.to_owned(),
        ticker: ticker.to_owned(),
        predicted_change_pct: 0.0,
        reason: reason.to_owned(),
    }
}
