//! Bounded Worker Pool
//!
//! Fans a list of items out to concurrent per-item fetches while capping the
//! number of in-flight calls with a counting semaphore. Every item produces
//! exactly one result, stored at the item's original index, so output order
//! matches input order no matter which task finishes first. Per-item errors
//! land in their own slot and never abort the batch.

use crate::azure::http::FetchError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Clamp a configured concurrency to at least 1. A zero-capacity admission
/// gate would never admit any worker and the pool would hang forever.
pub fn clamp_concurrency(requested: i64) -> usize {
    if requested < 1 {
        tracing::warn!(
            "max concurrency {} is less than 1, using 1 to prevent hanging",
            requested
        );
        1
    } else {
        requested as usize
    }
}

/// Run `per_item` over every item with at most `limit` calls in flight.
///
/// All tasks are spawned up front; each acquires one semaphore permit before
/// invoking `per_item` and releases it when the task ends (the permit guard
/// drops even if the future errors). The permit is held for the task's whole
/// duration including any retry sleeps inside the fetch, which applies
/// backpressure while the upstream API is throttling us.
///
/// Returns one result per input item, index-aligned with the input. A task
/// that panics is recorded as [`FetchError::Worker`] in its slot rather than
/// taking the batch down.
pub async fn run_bounded<T, P, F, Fut>(
    items: Vec<T>,
    limit: usize,
    per_item: F,
) -> Vec<Result<P, FetchError>>
where
    T: Send + 'static,
    P: Send + 'static,
    F: Fn(T) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<P, FetchError>> + Send + 'static,
{
    if items.is_empty() {
        return Vec::new();
    }

    let limit = limit.max(1);
    let gate = Arc::new(Semaphore::new(limit));
    let total = items.len();

    let mut tasks: JoinSet<(usize, Result<P, FetchError>)> = JoinSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let gate = Arc::clone(&gate);
        let fetch = per_item.clone();
        tasks.spawn(async move {
            // The only suspension point before the fetch itself: wait for
            // an admission permit. acquire_owned only fails if the semaphore
            // is closed, which we never do.
            let _permit = gate
                .acquire_owned()
                .await
                .expect("admission semaphore closed");
            (index, fetch(item).await)
        });
    }

    // Pre-assigned slots: each index is written exactly once, so the join
    // loop is the only place that touches the output.
    let mut slots: Vec<Option<Result<P, FetchError>>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    let mut last_join_error = String::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(join_err) => {
                // Task panicked before reporting its index; its slot is
                // filled after the join loop, once every surviving task has
                // claimed its own.
                tracing::error!("worker task failed: {}", join_err);
                last_join_error = join_err.to_string();
            }
        }
    }

    slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| Err(FetchError::Worker(last_join_error.clone())))
        })
        .collect()
}
