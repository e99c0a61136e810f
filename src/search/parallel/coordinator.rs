//! Depth-synchronized parallel breadth-first search.
//!
//! Every node goes through three steps:
//! 1. submit: the node's depth barrier is entered, then the node is queued
//!    on the worker pool
//! 2. process (on a worker): count it, then either hand it to the result
//!    queue (goal), expand it, submitting each child at `depth + 1`
//!    (below the depth limit), or drop it (at the limit)
//! 3. complete: the depth barrier is released
//!
//! Children are submitted before their parent completes, so when the barrier
//! of depth `d` clears, the whole frontier at `d + 1` has been submitted. The
//! announcer thread walks the barriers from depth 0 to the depth limit and
//! closes the result queue after the last one clears.

use crate::search::Searchable;
use crate::search::config::{OverflowPolicy, SearchConfig};
use crate::search::error::SearchError;
use crate::search::parallel::channel::{Delivery, ResultCollector};
use crate::search::parallel::depth::{CompletionBarrier, DepthTracker};
use crate::search::parallel::pool::WorkerPool;
use crate::search::result::{SearchStatistics, rank_by_score};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// State shared by the caller's handle, the announcer and every queued job.
struct Scheduler<N> {
    pool: WorkerPool,
    depths: DepthTracker,
    found: ResultCollector<N>,
    depth_limit: u32,
    depths_completed: AtomicUsize,
    /// Held at 1 until the result queue is closed.
    exhaustion: CompletionBarrier,
    started_at: OnceLock<Instant>,
    finished_at: OnceLock<Instant>,
}

impl<N: Searchable> Scheduler<N> {
    fn submit(self: &Arc<Self>, node: N, depth: u32) {
        // Enter the barrier before queueing so the depth can't clear while
        // this node is in flight.
        self.depths.entry(depth).pending.add();
        let scheduler = Arc::clone(self);
        self.pool.submit(move || scheduler.process(node, depth));
    }

    fn process(self: &Arc<Self>, node: N, depth: u32) {
        let entry = self.depths.entry(depth);
        // Released after all children are submitted, or on unwind.
        let _release = entry.pending.release_on_drop();
        entry.processed.fetch_add(1, Ordering::SeqCst);

        if node.is_goal() {
            match self.found.push(node) {
                Delivery::Queued => tracing::debug!(depth, "goal queued"),
                Delivery::Discarded => tracing::debug!(depth, "result queue full; goal discarded"),
                Delivery::Closed => tracing::warn!(depth, "result queue closed; goal dropped"),
            }
        } else if depth < self.depth_limit {
            node.expand(&mut |child| self.submit(child, depth + 1));
        }
    }

    fn announce_depth_completion(&self) {
        for (depth, entry) in self.depths.iter().enumerate() {
            entry.pending.wait();
            let processed = entry.processed.load(Ordering::SeqCst);
            if processed > 0 {
                tracing::info!(depth, processed, "finished depth");
            }
            self.depths_completed.fetch_add(1, Ordering::SeqCst);
        }

        // Nothing is left in flight, so no more goals can arrive.
        self.found.close();
        let _ = self.finished_at.set(Instant::now());
        self.exhaustion.done();
        tracing::debug!("search exhausted; result queue closed");
    }
}

/// Parallel breadth-first search over [`Searchable`] nodes.
///
/// One instance runs one search: [`ParallelSearch::start`] once, then
/// [`ParallelSearch::wait_for_found`].
///
/// Worker threads are detached. They exit once the search is exhausted and
/// this handle is dropped. Under [`OverflowPolicy::Block`] a worker that
/// finds a goal after the caller stopped draining stays parked for the life
/// of the process. Its job keeps the scheduler and with it the job queue
/// alive, so the announcer and every idle worker stay blocked as well.
/// The whole pool is leaked.
pub struct ParallelSearch<N> {
    scheduler: Arc<Scheduler<N>>,
    config: SearchConfig,
}

impl<N: Searchable> ParallelSearch<N> {
    /// Validate `config` and spawn the worker pool.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;

        let pool = WorkerPool::new(config.pool_size, &config.thread_name)?;
        let exhaustion = CompletionBarrier::new();
        exhaustion.add();

        let scheduler = Scheduler {
            pool,
            depths: DepthTracker::new(config.depth_limit),
            found: ResultCollector::new(config.search_limit, config.overflow),
            depth_limit: config.depth_limit,
            depths_completed: AtomicUsize::new(0),
            exhaustion,
            started_at: OnceLock::new(),
            finished_at: OnceLock::new(),
        };

        tracing::debug!(
            pool_size = config.pool_size,
            depth_limit = config.depth_limit,
            search_limit = config.search_limit,
            overflow = %config.overflow,
            "search engine created"
        );

        Ok(Self {
            scheduler: Arc::new(scheduler),
            config,
        })
    }

    /// Start searching from `roots`, each at depth 0.
    ///
    /// Returns [`SearchError::AlreadyStarted`] on a second call.
    pub fn start<I>(&self, roots: I) -> Result<(), SearchError>
    where
        I: IntoIterator<Item = N>,
    {
        if self.scheduler.started_at.set(Instant::now()).is_err() {
            return Err(SearchError::AlreadyStarted);
        }

        let mut submitted = 0usize;
        for root in roots {
            self.scheduler.submit(root, 0);
            submitted += 1;
        }
        tracing::debug!(roots = submitted, "search started");

        // Spawned after the roots are submitted: an empty depth-0 barrier
        // would otherwise clear immediately.
        let scheduler = Arc::clone(&self.scheduler);
        thread::Builder::new()
            .name(format!("{}-announcer", self.config.thread_name))
            .spawn(move || scheduler.announce_depth_completion())?;

        Ok(())
    }

    /// Wait until `search_limit` goals have been found or the search is
    /// exhausted, and return the goals best-first.
    ///
    /// Equally scored goals keep the order they were found in.
    pub fn wait_for_found(&self) -> Vec<N> {
        self.collect(None)
    }

    /// Like [`ParallelSearch::wait_for_found`], but gives up waiting for more
    /// goals after `timeout` and ranks whatever arrived.
    pub fn wait_for_found_timeout(&self, timeout: Duration) -> Vec<N> {
        self.collect(Some(Instant::now() + timeout))
    }

    fn collect(&self, deadline: Option<Instant>) -> Vec<N> {
        if self.scheduler.started_at.get().is_none() {
            tracing::warn!("waiting on a search that was never started");
            return Vec::new();
        }

        let limit = self.config.search_limit;
        let mut found = self.scheduler.found.drain(limit, deadline);
        rank_by_score(&mut found);
        tracing::info!(found = found.len(), limit, "search results collected");
        found
    }

    /// Wait up to `timeout` for every depth to complete. Returns whether the
    /// search is exhausted.
    pub fn wait_for_exhaustion(&self, timeout: Duration) -> bool {
        self.scheduler.exhaustion.wait_timeout(timeout)
    }

    /// Snapshot of the search's progress.
    pub fn statistics(&self) -> SearchStatistics {
        let scheduler = &self.scheduler;
        // Read completion first: a depth reported complete has final counts.
        let depths_completed = scheduler.depths_completed.load(Ordering::SeqCst);
        let exhausted = scheduler.exhaustion.pending() == 0;

        let elapsed_time = match scheduler.started_at.get() {
            Some(started) => scheduler
                .finished_at
                .get()
                .map_or_else(|| started.elapsed(), |finished| *finished - *started),
            None => Duration::ZERO,
        };

        SearchStatistics {
            processed_per_depth: scheduler.depths.processed_counts(),
            depths_completed,
            goals_discarded: scheduler.found.discarded(),
            exhausted,
            elapsed_time,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}
