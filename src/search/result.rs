//! Search statistics and result ranking

use crate::search::Searchable;
use std::cmp::Reverse;
use std::time::Duration;

/// Snapshot of a search run's progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Nodes processed at each depth, indexed by depth
    pub processed_per_depth: Vec<u64>,
    /// Number of depths whose completion barrier has cleared, counted from 0
    pub depths_completed: usize,
    /// Goals dropped because the result queue was already full
    pub goals_discarded: u64,
    /// Whether every depth has completed and the result queue is closed
    pub exhausted: bool,
    /// Time since `start`, frozen once the search is exhausted
    pub elapsed_time: Duration,
}

impl SearchStatistics {
    /// Total nodes processed across all depths
    pub fn total_processed(&self) -> u64 {
        self.processed_per_depth.iter().sum()
    }

    /// Get nodes processed per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.total_processed() as f64 / secs
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Nodes processed: {}\n", self.total_processed()));
        s.push_str(&format!("Throughput: {:.0} nodes/sec\n", self.throughput()));
        for (depth, processed) in self.processed_per_depth.iter().enumerate() {
            if *processed > 0 {
                s.push_str(&format!("  depth {}: {}\n", depth, processed));
            }
        }
        s.push_str(&format!(
            "Depths completed: {}/{}\n",
            self.depths_completed,
            self.processed_per_depth.len()
        ));
        if self.goals_discarded > 0 {
            s.push_str(&format!("Goals discarded: {}\n", self.goals_discarded));
        }
        s.push_str(&format!("Exhausted: {}\n", self.exhausted));
        s
    }
}

/// Sort found nodes best-first (descending score).
///
/// The sort is stable: equally scored nodes keep the order in which they
/// were discovered.
pub fn rank_by_score<N: Searchable>(found: &mut [N]) {
    found.sort_by_key(|node| Reverse(node.score()));
}
