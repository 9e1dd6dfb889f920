//! # Dataset Cache
//!
//! Holds the loaded dataset for the lifetime of a session.
//!
//! - Created empty; the first `get_or_load` runs the source's load on the
//!   blocking pool and stores the result.
//! - Callers that arrive while a load is in flight wait for it and receive
//!   its outcome: the same `Arc<Dataset>` on success, the same error on
//!   failure. None of them starts a load of its own.
//! - A failed load is not remembered as the dataset; the next call that
//!   arrives after the failure loads again.
//! - There is no invalidation. Drop the cache to drop the data.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use data_loader::{DataLoadError, Dataset, DatasetSource};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

/// Single-flight, session-scoped cache of one dataset
pub struct DatasetCache {
    source: Arc<dyn DatasetSource>,
    cell: OnceCell<Arc<Dataset>>,
    /// Serializes load attempts. Holds the error of the latest failed attempt.
    attempt: Mutex<Option<Arc<DataLoadError>>>,
    /// Number of load attempts started, successful or not
    loads: AtomicUsize,
    /// Number of load attempts that failed; only changes under `attempt`
    failures: AtomicUsize,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
            attempt: Mutex::new(None),
            loads: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// Return the cached dataset, loading it first if nothing is cached yet.
    ///
    /// Errors are shared between every caller that waited on the failed
    /// attempt, hence the `Arc`.
    pub async fn get_or_load(&self) -> Result<Arc<Dataset>, Arc<DataLoadError>> {
        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }

        let failures_seen = self.failures.load(Ordering::SeqCst);
        let mut last_failure = self.attempt.lock().await;

        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }

        // An attempt failed while we were queued behind it
        if self.failures.load(Ordering::SeqCst) != failures_seen {
            if let Some(err) = last_failure.as_ref() {
                debug!("Sharing failed load result with a waiting caller");
                return Err(Arc::clone(err));
            }
        }

        match self.load().await {
            Ok(dataset) => {
                let _ = self.cell.set(Arc::clone(&dataset));
                *last_failure = None;
                Ok(dataset)
            }
            Err(err) => {
                let err = Arc::new(err);
                *last_failure = Some(Arc::clone(&err));
                self.failures.fetch_add(1, Ordering::SeqCst);
                Err(err)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    async fn load(&self) -> Result<Arc<Dataset>, DataLoadError> {
        let attempt = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
        let description = self.source.describe();
        info!("Loading dataset from {} (attempt {})", description, attempt);

        let start = Instant::now();
        let source = Arc::clone(&self.source);
        let result = match tokio::task::spawn_blocking(move || source.load()).await {
            Ok(result) => result,
            Err(join_err) => Err(DataLoadError::LoadTaskFailed(join_err.to_string())),
        };

        match result {
            Ok(dataset) => {
                let (entities, rows, owners) = dataset.counts();
                info!(
                    "Dataset loaded in {:.2?}: {} repositories, {} relationship rows, {} owners",
                    start.elapsed(),
                    entities,
                    rows,
                    owners
                );
                Ok(Arc::new(dataset))
            }
            Err(e) => {
                warn!("Dataset load from {} failed: {}", description, e);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for DatasetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCache")
            .field("source", &self.source.describe())
            .field("loaded", &self.is_loaded())
            .field("loads", &self.load_count())
            .finish()
    }
}
