use std::future::Future;
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;

/// Execute a single phase of tasks in parallel
///
/// Futures are created in `task_ids` order and each waits for a permit
/// before it starts, so dispatch follows that order while at most
/// `max_concurrency` run at once. Outputs are returned in completion order.
///
/// # Arguments
///
/// * `task_ids` - Task IDs to execute in this phase, in dispatch order
/// * `max_concurrency` - Maximum number of concurrent tasks
/// * `executor_fn` - Async function running a single task
pub async fn execute_phase_parallel<F, Fut>(
    task_ids: &[String],
    max_concurrency: usize,
    executor_fn: F,
) -> Vec<Fut::Output>
where
    F: Fn(String) -> Fut,
    Fut: Future,
{
    let sem = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut futs: FuturesUnordered<_> = FuturesUnordered::new();

    for id in task_ids {
        let sem = sem.clone();
        let task = executor_fn(id.clone());

        futs.push(async move {
            // The semaphore is never closed, so acquisition only waits.
            let _permit = sem.acquire_owned().await.ok();
            task.await
        });
    }

    let mut outputs = Vec::with_capacity(task_ids.len());
    while let Some(out) = futs.next().await {
        outputs.push(out);
    }
    outputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_respects_concurrency_limit() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        let outputs = execute_phase_parallel(&ids(&["a", "b", "c", "d", "e"]), 2, |id| {
            let in_flight = &in_flight;
            let peak = &peak;
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                id
            }
        })
        .await;

        assert_eq!(outputs.len(), 5);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_slot_preserves_order() {
        let order = Mutex::new(Vec::new());

        execute_phase_parallel(&ids(&["a", "b", "c"]), 1, |id| {
            let order = &order;
            async move {
                order.lock().unwrap().push(format!("start:{id}"));
                tokio::time::sleep(Duration::from_millis(5)).await;
                order.lock().unwrap().push(format!("end:{id}"));
            }
        })
        .await;

        assert_eq!(
            *order.lock().unwrap(),
            vec!["start:a", "end:a", "start:b", "end:b", "start:c", "end:c"]
        );
    }

    #[tokio::test]
    async fn test_zero_limit_treated_as_one() {
        let outputs = execute_phase_parallel(&ids(&["only"]), 0, |id| async move { id }).await;
        assert_eq!(outputs, vec!["only".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_phase() {
        let outputs = execute_phase_parallel(&[], 4, |id| async move { id }).await;
        assert!(outputs.is_empty());
    }
}
