//! Core batch processor for parallel execution.

use crate::batch::error::BatchError;
use crate::batch::types::{BatchProgress, BatchResult, ProgressCallback};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// Concurrency used when none is configured.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Runs an async operation over every item with at most `concurrency` in flight.
///
/// Items are never retried. Each item's outcome lands at its input index no
/// matter in which order the operations finish.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Maximum number of concurrent operations.
    concurrency: usize,
    /// Optional timeout per item.
    timeout: Option<Duration>,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
        }
    }
}

#[derive(Default)]
struct Counters {
    completed: usize,
    successful: usize,
    failed: usize,
}

impl BatchProcessor {
    /// Create a new batch processor.
    ///
    /// # Errors
    /// Returns `InvalidConfig` when `concurrency` is zero.
    pub fn new(concurrency: usize) -> Result<Self, BatchError> {
        if concurrency == 0 {
            return Err(BatchError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            concurrency,
            timeout: None,
        })
    }

    /// Fails any item still running after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Process a batch of items concurrently.
    ///
    /// `processor` receives each item with its index. `progress_callback`, if
    /// given, is invoked once per finished item.
    pub async fn process_batch<T, R, F, Fut>(
        &self,
        items: Vec<T>,
        processor: F,
        progress_callback: Option<ProgressCallback>,
    ) -> BatchResult<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(usize, T) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<R, String>> + Send + 'static,
    {
        let start_time = Instant::now();
        let total = items.len();

        if total == 0 {
            return BatchResult::new(vec![], start_time.elapsed());
        }

        debug!(
            total_items = total,
            concurrency = self.concurrency,
            "Starting batch processing"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let counters = Arc::new(Mutex::new(Counters::default()));
        let mut handles = Vec::with_capacity(total);

        for (index, item) in items.into_iter().enumerate() {
            let processor = processor.clone();
            let semaphore = Arc::clone(&semaphore);
            let counters = Arc::clone(&counters);
            let progress_callback = progress_callback.clone();
            let item_timeout = self.timeout;

            let handle = tokio::spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => run_item(index, item, processor, item_timeout).await,
                    Err(e) => Err(BatchError::Aborted {
                        index,
                        message: format!("semaphore closed: {e}"),
                    }),
                };

                let progress = match counters.lock() {
                    Ok(mut c) => {
                        c.completed += 1;
                        if outcome.is_ok() {
                            c.successful += 1;
                        } else {
                            c.failed += 1;
                        }
                        Some(BatchProgress {
                            index,
                            completed: c.completed,
                            total,
                            successful: c.successful,
                            failed: c.failed,
                        })
                    }
                    Err(_) => None,
                };

                if let (Some(cb), Some(progress)) = (&progress_callback, progress) {
                    cb(progress);
                }
                outcome
            });
            handles.push(handle);
        }

        let mut outcomes = Vec::with_capacity(total);
        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = handle.await.unwrap_or_else(|e| {
                error!(index = index, "Task join error: {}", e);
                Err(BatchError::Aborted {
                    index,
                    message: e.to_string(),
                })
            });
            outcomes.push(outcome);
        }

        let result = BatchResult::new(outcomes, start_time.elapsed());
        debug!(
            total_items = total,
            successful = result.successful(),
            failed = result.failed(),
            duration_ms = result.total_duration.as_millis() as u64,
            "Batch processing completed"
        );
        result
    }
}

async fn run_item<T, R, F, Fut>(
    index: usize,
    item: T,
    processor: F,
    item_timeout: Option<Duration>,
) -> Result<R, BatchError>
where
    F: Fn(usize, T) -> Fut,
    Fut: Future<Output = Result<R, String>>,
{
    let fut = processor(index, item);
    let result = match item_timeout {
        Some(after) => match timeout(after, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    index = index,
                    timeout_ms = after.as_millis() as u64,
                    "Batch item timed out"
                );
                return Err(BatchError::Timeout { index, after });
            }
        },
        None => fut.await,
    };
    result.map_err(|message| BatchError::Item { index, message })
}
