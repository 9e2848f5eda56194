//! Bounded fan-out of file tasks.
//!
//! Concurrency is capped twice over: the rayon pool has exactly
//! `max_concurrency` worker threads, and a slot channel of the same capacity
//! acts as a counting semaphore. The walker takes a slot *before* spawning
//! each task, so when every slot is busy the walk itself pauses until a task
//! finishes:
//!
//! ```text
//! walker thread                    worker pool (N threads)
//! ─────────────                    ───────────────────────
//! next entry
//! acquire slot ── blocks if N busy
//! spawn task ───────────────────▶  filter ─▶ Skipped
//! next entry                        └─────▶ count ─▶ lock tally, add
//! ...                               release slot
//! end of scope ◀── join barrier ── all tasks done
//! ```
//!
//! Filtering happens inside the task, so a skipped file still occupies a slot
//! for the short time it takes to check its name.
use crossbeam_channel::{bounded, Receiver, Sender};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace, warn};

use super::processor::FileProcessor;
use super::walker::FileTask;
use crate::errors::{CountError, CountResult};
use crate::filters::has_valid_extension;
use crate::metrics::WalkMetrics;
use crate::results::{Tally, TaskOutcome};

/// Counting semaphore backed by a bounded channel
#[derive(Debug, Clone)]
struct Semaphore {
    slots: Sender<()>,
    releases: Receiver<()>,
}

/// A held concurrency slot, given back on drop
#[derive(Debug)]
struct Permit {
    releases: Receiver<()>,
}

impl Semaphore {
    fn new(capacity: NonZeroUsize) -> Self {
        let (slots, releases) = bounded(capacity.get());
        Self { slots, releases }
    }

    /// Takes a slot, blocking while all of them are held
    fn acquire(&self) -> CountResult<Permit> {
        self.slots.send(()).map_err(|_| CountError::SlotsClosed)?;
        Ok(Permit {
            releases: self.releases.clone(),
        })
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        // The semaphore holds the sending side for the whole run, and this
        // permit's own slot is still queued, so the receive cannot block.
        let _ = self.releases.recv();
    }
}

/// Runs file tasks on a fixed-size pool, at most `max_concurrency` at a time
#[derive(Debug)]
pub struct Dispatcher {
    pool: ThreadPool,
    max_concurrency: NonZeroUsize,
    metrics: WalkMetrics,
}

impl Dispatcher {
    pub fn new(max_concurrency: NonZeroUsize, metrics: WalkMetrics) -> CountResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_concurrency.get())
            .thread_name(|i| format!("linecount-worker-{}", i))
            .build()?;

        debug!("Built worker pool with {} threads", max_concurrency);
        Ok(Self {
            pool,
            max_concurrency,
            metrics,
        })
    }

    /// Dispatches every task and waits for all of them.
    ///
    /// The task stream is consumed on the calling thread. An `Err` item stops
    /// dispatching; tasks already spawned still run to completion before the
    /// error is returned.
    pub fn run<I>(
        &self,
        tasks: I,
        extensions: &[String],
        processor: &FileProcessor,
    ) -> CountResult<Tally>
    where
        I: IntoIterator<Item = CountResult<FileTask>>,
    {
        let tally = Mutex::new(Tally::new());
        let shared_tally = &tally;
        let semaphore = Semaphore::new(self.max_concurrency);
        let metrics = &self.metrics;

        let walked = self.pool.in_place_scope(|scope| -> CountResult<()> {
            for task in tasks {
                let task = task?;
                let permit = semaphore.acquire()?;
                metrics.record_task_start();

                scope.spawn(move |_| {
                    let outcome = process_task(&task, extensions, processor);
                    shared_tally
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .record(outcome);
                    metrics.record_task_end();
                    drop(permit);
                });
            }
            Ok(())
        });

        if let Err(e) = &walked {
            warn!("Walk aborted after in-flight tasks finished: {}", e);
        }
        walked?;

        Ok(tally.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Filters, then counts, a single file
fn process_task(task: &FileTask, extensions: &[String], processor: &FileProcessor) -> TaskOutcome {
    if !has_valid_extension(&task.file_name, extensions) {
        trace!("Skipping file: {}", task.path.display());
        return TaskOutcome::Skipped;
    }

    match processor.count_file(&task.path) {
        Ok(lines) => {
            trace!("Counted {} lines in {}", lines, task.path.display());
            TaskOutcome::Counted(lines)
        }
        Err(e) => {
            warn!("{}", e);
            TaskOutcome::Failed
        }
    }
}
