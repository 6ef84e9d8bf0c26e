//! Append-only result storage.

use crate::scanner::result::ProbeResult;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Thread-safe, unordered, append-only collection of finalized results.
///
/// Duplicate values are kept. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: Mutex<Vec<ProbeResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProbeResult>> {
        // Appends cannot leave the vector half-written, so a poisoned lock is still usable.
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a finalized result.
    pub fn push(&self, result: ProbeResult) {
        trace!(result = %result, status = %result.status, "result published");
        self.lock().push(result);
    }

    /// Copy of everything published so far.
    pub fn snapshot(&self) -> Vec<ProbeResult> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
