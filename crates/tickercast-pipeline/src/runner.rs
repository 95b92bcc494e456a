//! Bounded fan-out/fan-in executor.
//!
//! Runs a unit function over a batch with a concurrency ceiling. One item's
//! failure degrades to a [`ItemOutcome::Skipped`] marker for that item only;
//! siblings keep running and the runner itself never fails for data-level
//! reasons. Completion order is arbitrary — callers key results by item,
//! never by position.

use futures::stream::{self, StreamExt};

/// Per-item result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome<T> {
    Done(T),
    Skipped { reason: String },
}

impl<T> ItemOutcome<T> {
    /// The success value, if this item completed.
    pub fn into_done(self) -> Option<T> {
        match self {
            ItemOutcome::Done(value) => Some(value),
            ItemOutcome::Skipped { .. } => None,
        }
    }
}

/// Runs `unit` over `items` with at most `limit` invocations in flight.
///
/// Every item produces exactly one `(item, outcome)` pair; a unit error is
/// converted to [`ItemOutcome::Skipped`] with a warning log and a printed
/// `[skip]` progress line. Empty input yields an empty result set.
pub async fn run_batch<K, T, E, F, Fut>(
    items: Vec<K>,
    limit: usize,
    unit: F,
) -> Vec<(K, ItemOutcome<T>)>
where
    K: Clone + std::fmt::Display,
    E: std::fmt::Display,
    F: Fn(K) -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let limit = limit.max(1);
    stream::iter(items)
        .map(|item| {
            let work = unit(item.clone());
            async move {
                match work.await {
                    Ok(value) => (item, ItemOutcome::Done(value)),
                    Err(e) => {
                        tracing::warn!(item = %item, error = %e, "batch item failed — skipping");
                        println!("  [skip] {item}: {e}");
                        (
                            item,
                            ItemOutcome::Skipped {
                                reason: e.to_string(),
                            },
                        )
                    }
                }
            }
        })
        .buffer_unordered(limit)
        .collect()
        .await
}
