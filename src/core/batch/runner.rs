//! Sequential batch runner
//!
//! A [`Batch`] is an ordered list of operations that share one mutable
//! accumulator, plus a finisher that receives the accumulator once all
//! operations have run. The runner awaits operations one at a time, checks
//! the shutdown signal between them and reports progress after each one.

use crate::domain::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Default progress template; `{current}`, `{total}` and `{percentage}` are
/// substituted after every operation
pub const DEFAULT_PROGRESS_MESSAGE: &str = "Processed {current} out of {total}.";

/// Default message shown before the first operation runs
pub const DEFAULT_INIT_MESSAGE: &str = "Initializing.";

/// Shared state handed to every operation of a batch
#[derive(Debug)]
pub struct BatchContext<R> {
    /// Accumulated results
    pub results: R,

    /// Message describing the operation that just ran
    pub message: String,
}

impl<R> BatchContext<R> {
    pub fn new(results: R) -> Self {
        Self {
            results,
            message: String::new(),
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }
}

/// One step of a batch
#[async_trait]
pub trait BatchOperation<R: Send>: Send + Sync {
    /// Run the step
    ///
    /// Returning `Err` aborts the batch: the remaining operations are skipped
    /// and the finisher is called with `success = false`.
    async fn run(&self, ctx: &mut BatchContext<R>) -> Result<()>;
}

/// Called exactly once when a batch ends
#[async_trait]
pub trait BatchFinished<R: Send>: Send + Sync {
    type Output: Send;

    async fn finished(&self, success: bool, results: R) -> Self::Output;
}

/// Ordered operations plus the finisher that consumes their results
pub struct Batch<R: Send, F> {
    title: String,
    init_message: String,
    progress_message: String,
    results: R,
    operations: Vec<Box<dyn BatchOperation<R>>>,
    finished: F,
}

impl<R, F> Batch<R, F>
where
    R: Send,
    F: BatchFinished<R>,
{
    pub fn new(title: impl Into<String>, results: R, finished: F) -> Self {
        Self {
            title: title.into(),
            init_message: DEFAULT_INIT_MESSAGE.to_string(),
            progress_message: DEFAULT_PROGRESS_MESSAGE.to_string(),
            results,
            operations: Vec::new(),
            finished,
        }
    }

    pub fn init_message(mut self, message: impl Into<String>) -> Self {
        self.init_message = message.into();
        self
    }

    pub fn progress_message(mut self, template: impl Into<String>) -> Self {
        self.progress_message = template.into();
        self
    }

    pub fn add_operation(&mut self, operation: impl BatchOperation<R> + 'static) {
        self.operations.push(Box::new(operation));
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Progress snapshot passed to the progress callback
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress {
    /// Operations completed so far
    pub current: usize,

    /// Operations in the batch
    pub total: usize,

    /// Formatted progress line (`Processed 3 out of 10.`)
    pub progress: String,

    /// Message set by the operation that just ran
    pub message: String,
}

impl BatchProgress {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.current as f64 / self.total as f64 * 100.0
        }
    }
}

/// Lifecycle of a batch inside the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Operations are being processed in order
    Running,
    /// The finisher has been called; terminal
    Finished,
}

/// Outcome of [`BatchRunner::run`]
#[derive(Debug)]
pub struct BatchRun<O> {
    /// Whatever the finisher returned
    pub output: O,

    /// Operations that completed
    pub processed: usize,

    /// Operations in the batch
    pub total: usize,

    /// Value passed to the finisher
    pub success: bool,

    /// The shutdown signal stopped the batch
    pub interrupted: bool,

    /// Error returned by the failing operation, if any
    pub error: Option<String>,

    pub duration: Duration,
}

/// Callback invoked after every operation
pub type ProgressCallback = Box<dyn Fn(&BatchProgress) + Send + Sync>;

/// Runs batches to completion
pub struct BatchRunner {
    shutdown: Option<watch::Receiver<bool>>,
    on_progress: Option<ProgressCallback>,
    state: Option<BatchState>,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchRunner {
    pub fn new() -> Self {
        Self {
            shutdown: None,
            on_progress: None,
            state: None,
        }
    }

    /// Stop between operations once `shutdown` turns `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn on_progress(mut self, callback: impl Fn(&BatchProgress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// State of the last batch handed to [`BatchRunner::run`], `None` before the first
    pub fn state(&self) -> Option<BatchState> {
        self.state
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Run every operation of `batch` in order, then its finisher
    pub async fn run<R, F>(&mut self, batch: Batch<R, F>) -> BatchRun<F::Output>
    where
        R: Send,
        F: BatchFinished<R>,
    {
        let start = Instant::now();
        let Batch {
            title,
            init_message,
            progress_message,
            results,
            operations,
            finished,
        } = batch;

        let total = operations.len();
        let mut ctx = BatchContext::new(results);
        let mut processed = 0;
        let mut interrupted = false;
        let mut error = None;

        self.state = Some(BatchState::Running);
        tracing::info!(title = %title, total = total, "{}", init_message);

        for operation in &operations {
            if self.shutdown_requested() {
                tracing::warn!(
                    title = %title,
                    processed = processed,
                    total = total,
                    "Shutdown requested, stopping batch"
                );
                interrupted = true;
                break;
            }

            if let Err(e) = operation.run(&mut ctx).await {
                tracing::error!(
                    title = %title,
                    step = processed + 1,
                    error = %e,
                    "Batch operation failed, aborting"
                );
                error = Some(e.to_string());
                break;
            }

            processed += 1;
            let progress = BatchProgress {
                current: processed,
                total,
                progress: format_progress(&progress_message, processed, total),
                message: ctx.message.clone(),
            };

            crate::log_batch_processing!(processed, total);
            tracing::debug!(message = %progress.message, "{}", progress.progress);
            if let Some(callback) = &self.on_progress {
                callback(&progress);
            }
        }

        let success = !interrupted && error.is_none();
        let output = finished.finished(success, ctx.results).await;
        self.state = Some(BatchState::Finished);

        let duration = start.elapsed();
        tracing::info!(
            title = %title,
            processed = processed,
            total = total,
            success = success,
            duration_ms = duration.as_millis() as u64,
            "Batch finished"
        );

        BatchRun {
            output,
            processed,
            total,
            success,
            interrupted,
            error,
            duration,
        }
    }
}

fn format_progress(template: &str, current: usize, total: usize) -> String {
    let percentage = if total == 0 {
        100
    } else {
        current * 100 / total
    };

    template
        .replace("{current}", &current.to_string())
        .replace("{total}", &total.to_string())
        .replace("{percentage}", &percentage.to_string())
}
