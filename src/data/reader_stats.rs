//! Progress counters shared between the feed worker and the training loop.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Counters {
    batches_emitted: usize,
    epochs_completed: usize,
}

/// Cheap clonable handle; the worker thread updates it, callers poll it.
#[derive(Debug, Clone, Default)]
pub struct ReaderStats {
    inner: Arc<Mutex<Counters>>,
}

impl ReaderStats {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn batches_emitted(&self) -> usize {
        self.inner.lock().batches_emitted
    }

    pub fn epochs_completed(&self) -> usize {
        self.inner.lock().epochs_completed
    }

    pub(crate) fn add_batch(&self) {
        self.inner.lock().batches_emitted += 1;
    }

    pub(crate) fn add_epoch(&self) {
        self.inner.lock().epochs_completed += 1;
    }
}
