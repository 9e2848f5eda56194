use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::count::processor::{LARGE_FILE_THRESHOLD, SMALL_FILE_THRESHOLD};

/// Tracks walk and dispatch counters for a single run
#[derive(Debug, Clone, Default)]
pub struct WalkMetrics {
    // Walker metrics
    entries_visited: Arc<AtomicU64>,
    directories_seen: Arc<AtomicU64>,

    // Dispatcher metrics
    tasks_dispatched: Arc<AtomicU64>,
    in_flight: Arc<AtomicU64>,
    peak_in_flight: Arc<AtomicU64>,

    // File processing metrics
    small_files_read: Arc<AtomicU64>,
    buffered_files_read: Arc<AtomicU64>,
    mmap_files_read: Arc<AtomicU64>,
}

impl WalkMetrics {
    /// Creates a new WalkMetrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one entry produced by the walker
    pub fn record_entry(&self, is_dir: bool) {
        self.entries_visited.fetch_add(1, Ordering::Relaxed);
        if is_dir {
            self.directories_seen.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records a task taking a concurrency slot
    pub fn record_task_start(&self) {
        self.tasks_dispatched.fetch_add(1, Ordering::Relaxed);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let mut peak = self.peak_in_flight.load(Ordering::SeqCst);
        while current > peak {
            match self.peak_in_flight.compare_exchange_weak(
                peak,
                current,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break,
                Err(actual) => peak = actual,
            }
        }
        debug!("Task started, {} in flight", current);
    }

    /// Records a task giving its concurrency slot back
    pub fn record_task_end(&self) {
        let current = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!("Task finished, {} in flight", current);
    }

    /// Records which read strategy a file of `size` bytes used
    pub fn record_file_processing(&self, size: u64) {
        if size < SMALL_FILE_THRESHOLD {
            self.small_files_read.fetch_add(1, Ordering::Relaxed);
        } else if size >= LARGE_FILE_THRESHOLD {
            self.mmap_files_read.fetch_add(1, Ordering::Relaxed);
        } else {
            self.buffered_files_read.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Gets a snapshot of the current counters
    pub fn get_stats(&self) -> WalkStats {
        WalkStats {
            entries_visited: self.entries_visited.load(Ordering::Relaxed),
            directories_seen: self.directories_seen.load(Ordering::Relaxed),
            tasks_dispatched: self.tasks_dispatched.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::SeqCst),
            peak_in_flight: self.peak_in_flight.load(Ordering::SeqCst),
            small_files_read: self.small_files_read.load(Ordering::Relaxed),
            buffered_files_read: self.buffered_files_read.load(Ordering::Relaxed),
            mmap_files_read: self.mmap_files_read.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Walk stats: {} entries ({} directories), {} tasks dispatched, peak {} in flight",
            stats.entries_visited,
            stats.directories_seen,
            stats.tasks_dispatched,
            stats.peak_in_flight
        );
        debug!(
            "Files read: {} small, {} buffered, {} mapped",
            stats.small_files_read, stats.buffered_files_read, stats.mmap_files_read
        );
    }
}

/// Snapshot of walk and dispatch counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub entries_visited: u64,
    pub directories_seen: u64,
    pub tasks_dispatched: u64,
    pub in_flight: u64,
    pub peak_in_flight: u64,
    pub small_files_read: u64,
    pub buffered_files_read: u64,
    pub mmap_files_read: u64,
}
