use thiserror::Error;

/// Stage-level failures. Per-item faults never reach this type — they
/// degrade to markers or skips inside the batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    State(#[from] crate::state::StateError),

    #[error("spreadsheet write failed: {0}")]
    Sheets(#[from] tickercast_sheets::SheetsError),
}
