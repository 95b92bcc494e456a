//! Stage orchestration.
//!
//! The pipeline is a fixed linear sequence of typed stage calls:
//! gather → analyze → (optional raw write) → rank → deliver. The same stage
//! functions back two invocation modes — [`run_pipeline`] holds all state in
//! memory, while the `run_stage_*` wrappers read and write checkpoint
//! artifacts so each stage can be re-run independently.

use std::collections::BTreeMap;

use chrono::Local;

use tickercast_analyst::extract::parse_analysis;
use tickercast_analyst::prompt::{build_user_prompt, ANALYST_SYSTEM};
use tickercast_analyst::{AnalystError, LlmClient};
use tickercast_core::retry::retry_with_backoff;
use tickercast_core::{normalize_tickers, AnalysisRecord, AppConfig, GatheredRecord};
use tickercast_quotes::QuoteClient;
use tickercast_search::SearchClient;
use tickercast_sheets::SheetsClient;

use crate::error::PipelineError;
use crate::fetcher::gather_one;
use crate::rank::rank_top_k;
use crate::runner::run_batch;
use crate::state::StateStore;

/// Where pipeline output goes. Delivery pieces are optional so a run without
/// sink configuration still produces in-memory (and checkpoint) results.
pub struct PipelineSink<'a> {
    pub client: &'a SheetsClient,
    /// Append target for the ranked rows; ranked delivery is skipped when absent.
    pub ranked_sheet_id: Option<&'a str>,
    /// Also write ALL analysis rows to a fresh sheet before ranking.
    pub write_all_results: bool,
    /// Title for that sheet; a timestamped default is generated when absent.
    pub all_results_title: Option<String>,
}

/// Everything a monolithic run produced, keyed the same way the checkpoint
/// artifacts are.
#[derive(Debug)]
pub struct RunOutcome {
    pub gathered: BTreeMap<String, GatheredRecord>,
    pub analyses: Vec<AnalysisRecord>,
    pub ranked: Vec<AnalysisRecord>,
}

/// Gather stage: normalize tickers, then fetch market data and context for
/// each with at most `cfg.concurrency` fetches in flight. Results are keyed
/// by ticker, so completion order does not matter.
pub async fn stage_gather(
    cfg: &AppConfig,
    quotes: &QuoteClient,
    search: &SearchClient,
    raw_tickers: &[String],
) -> BTreeMap<String, GatheredRecord> {
    let tickers = normalize_tickers(raw_tickers);
    if tickers.is_empty() {
        tracing::info!("no tickers to gather");
        return BTreeMap::new();
    }

    let outcomes = run_batch(tickers, cfg.concurrency, |ticker| async move {
        let record =
            gather_one(quotes, search, &ticker, cfg.lookback_days, cfg.max_retries).await;
        Ok::<GatheredRecord, std::convert::Infallible>(record)
    })
    .await;

    let mut gathered = BTreeMap::new();
    for (ticker, outcome) in outcomes {
        if let Some(record) = outcome.into_done() {
            println!("  gathered: {ticker}");
            gathered.insert(ticker, record);
        }
    }
    gathered
}

/// Analyze stage: one generation per ticker with usable market data, at most
/// `cfg.concurrency` in flight. Error-marker market data skips generation
/// for that ticker (progress line, no record); generation retry exhaustion
/// degrades to a runner-level skip for that ticker only.
pub async fn stage_analyze(
    cfg: &AppConfig,
    llm: &LlmClient,
    gathered: &BTreeMap<String, GatheredRecord>,
) -> Vec<AnalysisRecord> {
    if gathered.is_empty() {
        tracing::info!("no gathered records to analyze");
        return Vec::new();
    }

    let today = Local::now().format("%Y-%m-%d").to_string();
    let tickers: Vec<String> = gathered.keys().cloned().collect();

    let outcomes = run_batch(tickers, cfg.concurrency, |ticker| {
        let today = today.clone();
        async move {
            let Some(record) = gathered.get(&ticker) else {
                return Ok(None);
            };
            if record.market.is_unavailable() {
                println!("  [skip] {ticker}: no usable market data.");
                return Ok(None);
            }

            let user = build_user_prompt(&ticker, record);
            let raw =
                retry_with_backoff(cfg.max_retries, || llm.generate(ANALYST_SYSTEM, &user))
                    .await?;
            let analysis = parse_analysis(&raw, &ticker, &today);

            let preview: String = analysis.reason.chars().take(60).collect();
            println!(
                "  -> {}: {}% | {preview}",
                analysis.ticker, analysis.predicted_change_pct
            );
            Ok::<Option<AnalysisRecord>, AnalystError>(Some(analysis))
        }
    })
    .await;

    outcomes
        .into_iter()
        .filter_map(|(_, outcome)| outcome.into_done())
        .flatten()
        .collect()
}

/// Deliver stage: append the ranked rows to the configured sheet. An empty
/// ranked set is a logged no-op; a write failure is this stage's failure.
///
/// # Errors
///
/// Returns [`PipelineError::Sheets`] when the append fails.
pub async fn stage_deliver(
    sheets: &SheetsClient,
    sheet_id: &str,
    ranked: &[AnalysisRecord],
) -> Result<usize, PipelineError> {
    if ranked.is_empty() {
        tracing::info!("no ranked records to deliver");
        println!("  no ranked results to write.");
        return Ok(0);
    }
    let appended = sheets.append_rows(sheet_id, ranked).await?;
    println!("  wrote {appended} ranked rows to sheet {sheet_id}.");
    Ok(appended)
}

/// Writes ALL analysis rows to a fresh sheet before ranking. Failures here
/// are logged and swallowed — the raw write is a convenience, not a stage.
pub async fn write_all_analyses(
    sheets: &SheetsClient,
    title: Option<&str>,
    analyses: &[AnalysisRecord],
) -> Option<String> {
    if analyses.is_empty() {
        return None;
    }

    let generated;
    let title = match title {
        Some(t) => t,
        None => {
            generated = format!("Stock Analysis {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
            &generated
        }
    };

    match sheets.create_with_rows(title, analyses).await {
        Ok(id) => {
            println!(
                "  created sheet '{title}' with {} analysis rows (id: {id}).",
                analyses.len()
            );
            Some(id)
        }
        Err(e) => {
            tracing::warn!(error = %e, "all-results sheet write failed — continuing");
            println!("  warning: failed to create analysis sheet: {e}");
            None
        }
    }
}

/// Monolithic invocation: the full gather → analyze → rank → deliver
/// sequence in one call, in-memory state only.
///
/// # Errors
///
/// Returns [`PipelineError::Sheets`] when the ranked delivery fails. Raw
/// (all-results) write failures are swallowed.
pub async fn run_pipeline(
    cfg: &AppConfig,
    quotes: &QuoteClient,
    search: &SearchClient,
    llm: &LlmClient,
    sink: Option<&PipelineSink<'_>>,
    raw_tickers: &[String],
) -> Result<RunOutcome, PipelineError> {
    let gathered = stage_gather(cfg, quotes, search, raw_tickers).await;
    let analyses = stage_analyze(cfg, llm, &gathered).await;

    if let Some(sink) = sink {
        if sink.write_all_results {
            write_all_analyses(sink.client, sink.all_results_title.as_deref(), &analyses).await;
        }
    }

    let ranked = rank_top_k(&analyses, cfg.top_k);

    if let Some(sink) = sink {
        if let Some(sheet_id) = sink.ranked_sheet_id {
            stage_deliver(sink.client, sheet_id, &ranked).await?;
        } else {
            tracing::info!("no sheet id configured — skipping ranked delivery");
        }
    }

    Ok(RunOutcome {
        gathered,
        analyses,
        ranked,
    })
}

/// Staged gather: run the gather stage and write `gathered.json`.
///
/// # Errors
///
/// Returns [`PipelineError::State`] when the artifact cannot be written.
pub async fn run_stage_gather(
    cfg: &AppConfig,
    quotes: &QuoteClient,
    search: &SearchClient,
    store: &StateStore,
    raw_tickers: &[String],
) -> Result<BTreeMap<String, GatheredRecord>, PipelineError> {
    let gathered = stage_gather(cfg, quotes, search, raw_tickers).await;
    let path = store.save_gathered(&gathered)?;
    println!("  saved gathered data to {}", path.display());
    Ok(gathered)
}

/// Staged analyze: load `gathered.json`, run the analyze stage, write
/// `analyses.json`, and optionally write the all-results sheet. An empty
/// gathered artifact is a logged no-op that writes nothing.
///
/// # Errors
///
/// Returns [`PipelineError::State`] when the gathered artifact is missing
/// or malformed, or the analyses artifact cannot be written.
pub async fn run_stage_analyze(
    cfg: &AppConfig,
    llm: &LlmClient,
    store: &StateStore,
    raw_sink: Option<(&SheetsClient, Option<&str>)>,
) -> Result<Vec<AnalysisRecord>, PipelineError> {
    let gathered = store.load_gathered()?;
    if gathered.is_empty() {
        println!("  no gathered data to analyze.");
        return Ok(Vec::new());
    }

    let analyses = stage_analyze(cfg, llm, &gathered).await;
    let path = store.save_analyses(&analyses)?;
    println!("  saved analysis results to {}", path.display());

    if let Some((sheets, title)) = raw_sink {
        write_all_analyses(sheets, title, &analyses).await;
    }
    Ok(analyses)
}

/// Staged rank: load `analyses.json`, rank, write `ranked.json`. Ranking an
/// unchanged artifact rewrites a byte-identical output.
///
/// # Errors
///
/// Returns [`PipelineError::State`] when the analyses artifact is missing
/// or malformed, or the ranked artifact cannot be written.
pub fn run_stage_rank(
    cfg: &AppConfig,
    store: &StateStore,
) -> Result<Vec<AnalysisRecord>, PipelineError> {
    let analyses = store.load_analyses()?;
    let ranked = rank_top_k(&analyses, cfg.top_k);
    let path = store.save_ranked(&ranked)?;
    println!("  saved ranked results to {}", path.display());
    Ok(ranked)
}

/// Staged deliver: load `ranked.json` and append to the configured sheet.
///
/// # Errors
///
/// Returns [`PipelineError::State`] when the ranked artifact is missing or
/// malformed, and [`PipelineError::Sheets`] when the append fails.
pub async fn run_stage_deliver(
    sheets: &SheetsClient,
    sheet_id: &str,
    store: &StateStore,
) -> Result<usize, PipelineError> {
    let ranked = store.load_ranked()?;
    stage_deliver(sheets, sheet_id, &ranked).await
}
