//! Fixed-size worker pool fed by an unbounded FIFO job queue.
//!
//! Submission never blocks: the queue absorbs any backlog and the pool only
//! bounds how many jobs run at once. Workers are detached; each exits once
//! every sender of the queue is gone (the pool handle and every queued job
//! that holds a clone of it through its captures).

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;

/// A unit of work run by one worker.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle for submitting jobs to the pool.
#[derive(Debug)]
pub struct WorkerPool {
    jobs: Sender<Job>,
    size: usize,
}

impl WorkerPool {
    /// Spawn `size` workers named `{name_prefix}-{id}`.
    pub fn new(size: usize, name_prefix: &str) -> std::io::Result<Self> {
        let (jobs, queue) = unbounded::<Job>();

        for worker_id in 0..size {
            let queue = queue.clone();
            thread::Builder::new()
                .name(format!("{}-{}", name_prefix, worker_id))
                .spawn(move || run_worker(worker_id, queue))?;
        }

        Ok(Self { jobs, size })
    }

    /// Queue a job. Jobs start in submission order as workers free up.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Workers only hang up once every sender is dropped, and we hold one.
        if self.jobs.send(Box::new(job)).is_err() {
            tracing::error!("worker pool has no workers left; job dropped");
        }
    }

    /// Number of workers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of jobs waiting for a free worker.
    pub fn queued(&self) -> usize {
        self.jobs.len()
    }
}

fn run_worker(worker_id: usize, queue: Receiver<Job>) {
    for job in queue.iter() {
        // A panicking job is not retried; the worker moves on to the next one.
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!(worker_id, "search job panicked");
        }
    }
    tracing::trace!(worker_id, "worker exiting");
}
