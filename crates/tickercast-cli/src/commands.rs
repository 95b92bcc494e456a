//! Command handlers for the CLI.
//!
//! These are called from `main` after config is loaded. All collaborator
//! clients are constructed here and passed by reference into the pipeline,
//! so missing credentials fail fast with the variable name before any batch
//! work starts. Per-ticker failures are degraded inside the pipeline and
//! never abort a run.

use std::path::PathBuf;

use tickercast_analyst::LlmClient;
use tickercast_core::{load_watchlist, AppConfig};
use tickercast_pipeline::{
    run_pipeline, run_stage_analyze, run_stage_deliver, run_stage_gather, run_stage_rank,
    PipelineSink, StateStore,
};
use tickercast_quotes::QuoteClient;
use tickercast_search::SearchClient;
use tickercast_sheets::SheetsClient;

const USER_AGENT: &str = "tickercast/0.1 (batch-forecast)";

/// Tickers from `--ticker` flags, else from the watchlist file.
fn resolve_tickers(
    config: &AppConfig,
    tickers: Vec<String>,
    watchlist: Option<PathBuf>,
) -> anyhow::Result<Vec<String>> {
    if !tickers.is_empty() {
        return Ok(tickers);
    }
    let path = watchlist.unwrap_or_else(|| config.watchlist_path.clone());
    Ok(load_watchlist(&path)?)
}

fn build_quote_client(config: &AppConfig) -> anyhow::Result<QuoteClient> {
    QuoteClient::with_base_url(
        config.request_timeout_secs,
        USER_AGENT,
        &config.quotes_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build quote client: {e}"))
}

fn build_search_client(config: &AppConfig) -> anyhow::Result<SearchClient> {
    let api_key = config.require_search_api_key()?;
    SearchClient::with_base_url(api_key, config.request_timeout_secs, &config.search_base_url)
        .map_err(|e| anyhow::anyhow!("failed to build search client: {e}"))
}

fn build_llm_client(config: &AppConfig) -> anyhow::Result<LlmClient> {
    let api_key = config.require_llm_api_key()?;
    LlmClient::with_base_url(
        api_key,
        &config.llm_model,
        config.request_timeout_secs,
        &config.llm_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build generation client: {e}"))
}

fn build_sheets_client(config: &AppConfig) -> anyhow::Result<SheetsClient> {
    let token = config.require_sheets_token()?;
    SheetsClient::new(token, config.request_timeout_secs)
        .map_err(|e| anyhow::anyhow!("failed to build sheets client: {e}"))
}

/// `run`: the monolithic pipeline. Delivery runs only when a sheet id is
/// known; the all-results sheet only when `--new-sheet` was passed.
pub(crate) async fn run_full(
    config: &AppConfig,
    tickers: Vec<String>,
    watchlist: Option<PathBuf>,
    sheet_id: Option<String>,
    new_sheet: bool,
    sheet_name: Option<String>,
) -> anyhow::Result<()> {
    let tickers = resolve_tickers(config, tickers, watchlist)?;
    let quotes = build_quote_client(config)?;
    let search = build_search_client(config)?;
    let llm = build_llm_client(config)?;

    let sheet_id = sheet_id.or_else(|| config.sheet_id.clone());
    let sheets = if new_sheet || sheet_id.is_some() {
        Some(build_sheets_client(config)?)
    } else {
        tracing::info!("no sheet configured — skipping spreadsheet delivery");
        None
    };
    let sink = sheets.as_ref().map(|client| PipelineSink {
        client,
        ranked_sheet_id: sheet_id.as_deref(),
        write_all_results: new_sheet,
        all_results_title: sheet_name,
    });

    let outcome = run_pipeline(config, &quotes, &search, &llm, sink.as_ref(), &tickers).await?;
    println!(
        "gathered {}, analyzed {}, ranked {}",
        outcome.gathered.len(),
        outcome.analyses.len(),
        outcome.ranked.len()
    );
    Ok(())
}

/// `stage gather`: fetch and checkpoint gathered data.
pub(crate) async fn run_gather_stage(
    config: &AppConfig,
    tickers: Vec<String>,
    watchlist: Option<PathBuf>,
) -> anyhow::Result<()> {
    let tickers = resolve_tickers(config, tickers, watchlist)?;
    let quotes = build_quote_client(config)?;
    let search = build_search_client(config)?;
    let store = StateStore::new(&config.state_dir);

    let gathered = run_stage_gather(config, &quotes, &search, &store, &tickers).await?;
    println!("gathered {} tickers", gathered.len());
    Ok(())
}

/// `stage analyze`: generate, parse, and checkpoint analysis records.
pub(crate) async fn run_analyze_stage(
    config: &AppConfig,
    new_sheet: bool,
    sheet_name: Option<String>,
) -> anyhow::Result<()> {
    let llm = build_llm_client(config)?;
    let store = StateStore::new(&config.state_dir);

    let sheets = if new_sheet {
        Some(build_sheets_client(config)?)
    } else {
        None
    };
    let raw_sink = sheets.as_ref().map(|client| (client, sheet_name.as_deref()));

    let analyses = run_stage_analyze(config, &llm, &store, raw_sink).await?;
    println!("analyzed {} tickers", analyses.len());
    Ok(())
}

/// `stage rank`: rank checkpointed analyses and checkpoint the result.
pub(crate) fn run_rank_stage(config: &AppConfig) -> anyhow::Result<()> {
    let store = StateStore::new(&config.state_dir);
    let ranked = run_stage_rank(config, &store)?;
    println!("ranked {} records", ranked.len());
    Ok(())
}

/// `stage deliver`: append checkpointed ranked rows to the sheet.
pub(crate) async fn run_deliver_stage(
    config: &AppConfig,
    sheet_id: Option<String>,
) -> anyhow::Result<()> {
    let sheet_id = match sheet_id {
        Some(id) => id,
        None => config.require_sheet_id()?.to_owned(),
    };
    let sheets = build_sheets_client(config)?;
    let store = StateStore::new(&config.state_dir);

    let appended = run_stage_deliver(&sheets, &sheet_id, &store).await?;
    println!("delivered {appended} rows to sheet {sheet_id}");
    Ok(())
}
