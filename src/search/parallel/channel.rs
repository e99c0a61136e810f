//! Bounded result queue between search workers and the waiting caller.

use crate::search::config::OverflowPolicy;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// What happened to a goal handed to [`ResultCollector::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The goal is in the queue.
    Queued,
    /// The queue was full and the policy is [`OverflowPolicy::Discard`].
    Discarded,
    /// The queue was already closed.
    Closed,
}

/// Goal sink with a capacity fixed at construction.
///
/// Workers push, the caller drains. The queue is closed exactly once, by
/// dropping the only long-lived sender; the caller then sees the end of the
/// stream once the buffered goals are consumed.
#[derive(Debug)]
pub struct ResultCollector<N> {
    sender: Mutex<Option<Sender<N>>>,
    receiver: Receiver<N>,
    capacity: usize,
    policy: OverflowPolicy,
    discarded: AtomicU64,
}

impl<N: Send> ResultCollector<N> {
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender: Mutex::new(Some(sender)),
            receiver,
            capacity,
            policy,
            discarded: AtomicU64::new(0),
        }
    }

    /// Hand a goal to the queue according to the overflow policy.
    ///
    /// With [`OverflowPolicy::Block`] this waits for room, possibly forever.
    pub fn push(&self, node: N) -> Delivery {
        // Send through a clone so a blocked worker never holds the lock.
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(sender) = sender else {
            return Delivery::Closed;
        };

        match self.policy {
            OverflowPolicy::Block => match sender.send(node) {
                Ok(()) => Delivery::Queued,
                Err(_) => Delivery::Closed,
            },
            OverflowPolicy::Discard => match sender.try_send(node) {
                Ok(()) => Delivery::Queued,
                Err(TrySendError::Full(_)) => {
                    self.discarded.fetch_add(1, Ordering::SeqCst);
                    Delivery::Discarded
                }
                Err(TrySendError::Disconnected(_)) => Delivery::Closed,
            },
        }
    }

    /// Close the queue. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    /// Receive up to `limit` goals in arrival order, stopping early when the
    /// queue is closed and empty or when `deadline` passes.
    pub fn drain(&self, limit: usize, deadline: Option<Instant>) -> Vec<N> {
        let mut found = Vec::with_capacity(limit.min(self.capacity));
        while found.len() < limit {
            let next = match deadline {
                Some(deadline) => self.receiver.recv_deadline(deadline).ok(),
                None => self.receiver.recv().ok(),
            };
            match next {
                Some(node) => found.push(node),
                None => break,
            }
        }
        found
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Goals dropped under [`OverflowPolicy::Discard`].
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::SeqCst)
    }
}
