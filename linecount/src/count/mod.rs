//! Concurrent line counting over a directory tree.
//!
//! A run is split into four pieces:
//!
//! 1. **Walker** ([`walker::TreeWalker`]): enumerates every non-directory
//!    entry under the root and turns each into a [`walker::FileTask`].
//! 2. **Filter** ([`crate::filters::has_valid_extension`]): decides, inside
//!    each task, whether the file name is on the allow-list.
//! 3. **Processor** ([`processor::FileProcessor`]): opens a file and counts
//!    its lines, picking a read strategy by file size.
//! 4. **Dispatcher** ([`dispatcher::Dispatcher`]): runs tasks on a fixed-size
//!    pool behind a counting semaphore and folds their outcomes into a shared
//!    tally.
//!
//! [`engine::count`] wires them together:
//! ```rust,ignore
//! let config = CountConfig::with_root("src");
//! let summary = linecount::count(&config)?;
//! println!("{}", summary);
//! ```
pub mod dispatcher;
pub mod engine;
pub mod processor;
pub mod walker;

pub use dispatcher::Dispatcher;
pub use engine::count;
pub use processor::FileProcessor;
pub use walker::{FileTask, TreeWalker};
