//! Loading state and cancellation for backend calls.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Mutex;

use optimly_core::{OptimlyError, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::Operation;

/// Tracks which operations are in flight for one session.
///
/// An operation is "loading" from the moment [`run`](Self::run) starts until
/// it resolves. Starting the same operation again while it is loading is
/// rejected, which is what a disabled trigger control would do. Once
/// [`cancel_all`](Self::cancel_all) is called the tracker is spent: pending
/// and future runs resolve to [`OptimlyError::Cancelled`].
#[derive(Default)]
pub struct OperationTracker {
    pending: Mutex<HashSet<Operation>>,
    cancel: CancellationToken,
}

/// Clears the loading flag when the run finishes, however it finishes.
struct PendingGuard<'a> {
    tracker: &'a OperationTracker,
    operation: Operation,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.tracker.pending_set().remove(&self.operation);
    }
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending_set(&self) -> std::sync::MutexGuard<'_, HashSet<Operation>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, operation: Operation) -> Result<PendingGuard<'_>> {
        if !self.pending_set().insert(operation) {
            return Err(OptimlyError::OperationPending(operation.to_string()));
        }
        Ok(PendingGuard {
            tracker: self,
            operation,
        })
    }

    pub fn is_loading(&self, operation: Operation) -> bool {
        self.pending_set().contains(&operation)
    }

    pub fn is_idle(&self) -> bool {
        self.pending_set().is_empty()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs `task` as `operation`, unless that operation is already loading.
    pub async fn run<T, F>(&self, operation: Operation, task: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(OptimlyError::Cancelled(operation.to_string()));
        }
        let _guard = self.begin(operation)?;
        debug!(%operation, "operation loading");

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(%operation, "operation cancelled");
                Err(OptimlyError::Cancelled(operation.to_string()))
            }
            result = task => result,
        }
    }

    /// Cancels every pending run. Used when the session is abandoned.
    pub fn cancel_all(&self) {
        let pending = self.pending_set().len();
        info!(pending, "cancelling pending operations");
        self.cancel.cancel();
    }
}
