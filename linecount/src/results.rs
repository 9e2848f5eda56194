//! Result types for a counting run.
//!
//! Tasks report a [`TaskOutcome`]; the dispatcher folds those into a single
//! [`Tally`] behind a mutex, and once every task has been joined the tally is
//! turned into the [`CountSummary`] handed back to the caller.
use std::fmt;
use std::time::Duration;

/// What a single file task ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The file name did not pass the extension filter
    Skipped,
    /// The file was read to the end
    Counted(u64),
    /// The file could not be opened or read; contributes zero lines
    Failed,
}

/// Shared accumulator updated by every task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub lines: u64,
    pub files_counted: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one task's outcome
    pub fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Skipped => self.files_skipped += 1,
            TaskOutcome::Counted(lines) => {
                self.lines += lines;
                self.files_counted += 1;
            }
            TaskOutcome::Failed => self.files_failed += 1,
        }
    }

    /// Total number of tasks that reported back
    pub fn files_seen(&self) -> u64 {
        self.files_counted + self.files_skipped + self.files_failed
    }
}

/// Final result of a counting run
#[derive(Debug, Clone, PartialEq)]
pub struct CountSummary {
    /// Sum of line counts over every successfully counted file
    pub total_lines: u64,
    pub files_counted: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    /// Highest number of tasks observed in flight at once
    pub peak_in_flight: u64,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl CountSummary {
    pub fn from_tally(tally: Tally, peak_in_flight: u64, elapsed: Duration) -> Self {
        Self {
            total_lines: tally.lines,
            files_counted: tally.files_counted,
            files_skipped: tally.files_skipped,
            files_failed: tally.files_failed,
            peak_in_flight,
            elapsed,
        }
    }
}

/// Renders the two-line report printed by the command-line tool
impl fmt::Display for CountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total lines: {}", self.total_lines)?;
        write!(f, "Execution time is {:.6}sec", self.elapsed.as_secs_f64())
    }
}
