//! Pipeline engine: bounded batch execution, per-item degradation, ranking,
//! checkpointing, and the stage orchestrator.
//!
//! Control flow is a fixed linear sequence —
//! gather → analyze → (optional raw write) → rank → deliver — exposed both
//! as one monolithic in-memory run and as independently invocable stages
//! backed by JSON checkpoint artifacts.

mod error;
mod fetcher;
mod rank;
pub mod runner;
mod stages;
mod state;

pub use error::PipelineError;
pub use fetcher::gather_one;
pub use rank::rank_top_k;
pub use runner::{run_batch, ItemOutcome};
pub use stages::{
    run_pipeline, run_stage_analyze, run_stage_deliver, run_stage_gather, run_stage_rank,
    stage_analyze, stage_deliver, stage_gather, write_all_analyses, PipelineSink, RunOutcome,
};
pub use state::{StateError, StateStore};
