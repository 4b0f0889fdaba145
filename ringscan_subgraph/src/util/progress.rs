//! Counters reported by eager and parallel searches.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Search counters shared between worker threads.
#[derive(Debug, Default)]
pub struct Progress {
    total_seeds: AtomicU64,
    scanned_seeds: AtomicU64,
    steps: AtomicU64,
    truncated: AtomicBool,
}

/// Point-in-time copy of [`Progress`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Search roots planned.
    pub total_seeds: u64,
    /// Search roots finished.
    pub scanned_seeds: u64,
    /// Pairs pushed across all roots.
    pub steps: u64,
    /// Whether any root hit the step budget.
    pub truncated: bool,
}

impl Progress {
    /// All counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of search roots that will be explored.
    /// A sequential search counts as a single root.
    pub fn set_total_seeds(&self, total: u64) {
        self.total_seeds.store(total, Ordering::Relaxed);
    }

    /// Record one finished root together with the steps it took.
    pub fn finish_seed(&self, steps: usize, truncated: bool) {
        self.scanned_seeds.fetch_add(1, Ordering::Relaxed);
        self.steps.fetch_add(steps as u64, Ordering::Relaxed);
        if truncated {
            self.truncated.store(true, Ordering::Relaxed);
        }
    }

    /// Read a snapshot for display/reporting.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total_seeds: self.total_seeds.load(Ordering::Relaxed),
            scanned_seeds: self.scanned_seeds.load(Ordering::Relaxed),
            steps: self.steps.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
        }
    }
}
