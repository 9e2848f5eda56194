//! Error types for line counting.
//!
//! Errors fall into three groups, and callers treat each group differently:
//!
//! 1. **Startup fatal**: the working directory cannot be determined, the
//!    configuration cannot be loaded, or the worker pool cannot be built.
//!    The run never starts.
//! 2. **Traversal fatal**: the tree walker cannot enumerate a path. The walk
//!    stops, tasks already in flight are joined, and the error is returned.
//! 3. **Per-file**: a single file cannot be opened or read. The error is
//!    logged by the task that hit it, the file contributes zero lines, and
//!    sibling tasks are unaffected.
//!
//! Only the first two groups ever reach the caller of [`crate::count`]:
//! ```rust,ignore
//! match linecount::count(&config) {
//!     Ok(summary) => println!("Total lines: {}", summary.total_lines),
//!     Err(CountError::Walk(e)) => eprintln!("walk aborted: {}", e),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for counting operations
pub type CountResult<T> = Result<T, CountError>;

/// Errors that can occur while counting lines
#[derive(Error, Debug)]
pub enum CountError {
    #[error("Cannot determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
    #[error("Concurrency slots closed unexpectedly")]
    SlotsClosed,
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CountError {
    pub fn working_directory(source: std::io::Error) -> Self {
        Self::WorkingDirectory(source)
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Maps an error from opening `path` onto the matching variant.
    pub fn from_open(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::read(path, err),
        }
    }
}

impl From<config::ConfigError> for CountError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
