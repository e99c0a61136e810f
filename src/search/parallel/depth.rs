//! Per-depth bookkeeping: processed counters and completion barriers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A counter of outstanding work that can be waited on until it drains.
///
/// `add` before handing work off, `done` when it has finished. Waiters wake
/// once the count is back to zero.
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    pending: Mutex<u64>,
    cleared: Condvar,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, u64> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one more outstanding unit of work.
    pub fn add(&self) {
        *self.lock() += 1;
    }

    /// Record that one unit of work finished.
    pub fn done(&self) {
        let mut pending = self.lock();
        debug_assert!(*pending > 0, "barrier released more times than entered");
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.cleared.notify_all();
        }
    }

    /// Release one unit of work when the returned guard drops, including on
    /// unwind.
    pub fn release_on_drop(&self) -> BarrierRelease<'_> {
        BarrierRelease(self)
    }

    /// Outstanding units of work.
    pub fn pending(&self) -> u64 {
        *self.lock()
    }

    /// Block until nothing is outstanding.
    pub fn wait(&self) {
        let guard = self.lock();
        let _cleared = self
            .cleared
            .wait_while(guard, |pending| *pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Block until nothing is outstanding or `timeout` passes. Returns whether
    /// the barrier cleared.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (pending, _) = self
            .cleared
            .wait_timeout_while(guard, timeout, |pending| *pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *pending == 0
    }
}

/// Guard returned by [`CompletionBarrier::release_on_drop`].
#[must_use = "the barrier is released as soon as the guard drops"]
pub struct BarrierRelease<'a>(&'a CompletionBarrier);

impl Drop for BarrierRelease<'_> {
    fn drop(&mut self) {
        self.0.done();
    }
}

/// Bookkeeping for one depth level.
#[derive(Debug, Default)]
pub struct DepthEntry {
    /// Nodes at this depth whose processing has begun.
    pub processed: AtomicU64,
    /// Nodes submitted at this depth that have not finished processing.
    pub pending: CompletionBarrier,
}

/// One [`DepthEntry`] for every depth from 0 to the depth limit inclusive.
#[derive(Debug)]
pub struct DepthTracker {
    entries: Vec<DepthEntry>,
}

impl DepthTracker {
    pub fn new(depth_limit: u32) -> Self {
        let entries = (0..=depth_limit).map(|_| DepthEntry::default()).collect();
        Self { entries }
    }

    /// Entry for `depth`. Depths beyond the limit are never submitted.
    pub fn entry(&self, depth: u32) -> &DepthEntry {
        &self.entries[depth as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DepthEntry> {
        self.entries.iter()
    }

    /// Number of tracked depths (`depth_limit + 1`).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn processed_counts(&self) -> Vec<u64> {
        self.entries
            .iter()
            .map(|entry| entry.processed.load(Ordering::SeqCst))
            .collect()
    }
}
