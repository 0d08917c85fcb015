use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use boombox_core::{sanitize_name, TaskResult, WorkItem};
use engine_logging::{engine_debug, engine_error, engine_warn};
use futures_util::FutureExt;
use tokio::sync::{mpsc, Mutex};

use crate::TaskError;

/// Receives progress as tasks finish, in completion order.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, result: &TaskResult);

    /// A work-list line that could not be turned into a work item.
    fn skipped(&self, line: &str) {
        engine_warn!("Skipping malformed line: {}", line);
    }
}

/// Prints progress lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgressSink;

impl ProgressSink for ConsoleProgressSink {
    fn emit(&self, result: &TaskResult) {
        println!("{result}");
    }

    fn skipped(&self, line: &str) {
        println!("Malformed line, skipped: {line}");
    }
}

/// The unit of work executed by the scheduler's workers.
#[async_trait]
pub trait ItemProcessor: Send + Sync {
    async fn process(&self, item: WorkItem) -> TaskResult;
}

/// Run every item on a pool of `workers` workers and collect results as they complete.
///
/// A failing or panicking item never stops the others; each item yields exactly one result.
pub async fn run_all(
    processor: Arc<dyn ItemProcessor>,
    items: Vec<WorkItem>,
    workers: usize,
    sink: &dyn ProgressSink,
) -> Vec<TaskResult> {
    let total = items.len();
    let workers = workers.clamp(1, total.max(1));

    let (queue_tx, queue_rx) = mpsc::unbounded_channel();
    for item in items {
        // The receiver is alive until the workers below are done.
        let _ = queue_tx.send(item);
    }
    drop(queue_tx);
    let queue = Arc::new(Mutex::new(queue_rx));

    let (result_tx, mut result_rx) = mpsc::unbounded_channel();
    for worker in 0..workers {
        let queue = queue.clone();
        let processor = processor.clone();
        let result_tx = result_tx.clone();
        tokio::spawn(async move {
            loop {
                let next = queue.lock().await.recv().await;
                let Some(item) = next else {
                    break;
                };
                let result = process_isolated(processor.as_ref(), item).await;
                if result_tx.send(result).is_err() {
                    break;
                }
            }
            engine_debug!("worker {} finished", worker);
        });
    }
    drop(result_tx);

    let mut results = Vec::with_capacity(total);
    while let Some(result) = result_rx.recv().await {
        sink.emit(&result);
        results.push(result);
    }
    if results.len() != total {
        engine_error!("collected {} results for {} items", results.len(), total);
    }
    results
}

async fn process_isolated(processor: &dyn ItemProcessor, item: WorkItem) -> TaskResult {
    let name = sanitize_name(&item.display_name);
    match AssertUnwindSafe(processor.process(item)).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let err = TaskError::Unexpected(panic_message(&*panic));
            engine_error!("task {} panicked: {}", name, err);
            TaskResult::failed(name, err.to_string())
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(text) = panic.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else {
        "task panicked".to_string()
    }
}
