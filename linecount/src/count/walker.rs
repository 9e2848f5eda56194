use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{CountError, CountResult};
use crate::metrics::WalkMetrics;

/// One unit of work: a non-directory entry found by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub path: PathBuf,
    pub file_name: String,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name }
    }

    fn from_entry(entry: DirEntry) -> Self {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        Self {
            path: entry.into_path(),
            file_name,
        }
    }
}

/// Recursive walker over every entry under a root.
///
/// None of the usual source-tree filters apply here: hidden files,
/// `.gitignore`d paths and the like are all visited. Symlinks are not
/// followed, so a link shows up as a single non-directory entry.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    metrics: WalkMetrics,
}

impl TreeWalker {
    pub fn new(root: impl AsRef<Path>, metrics: WalkMetrics) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            metrics,
        }
    }

    /// Yields a task for every non-directory entry.
    ///
    /// The first walk error is yielded as `Err` and ends the stream.
    pub fn into_tasks(self) -> impl Iterator<Item = CountResult<FileTask>> {
        debug!("Walking directory: {}", self.root.display());

        let mut builder = WalkBuilder::new(&self.root);
        builder.standard_filters(false).follow_links(false);

        let metrics = self.metrics;
        let mut failed = false;

        builder.build().map_while(move |entry| {
            if failed {
                return None;
            }
            Some(match entry {
                Ok(entry) => {
                    let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                    metrics.record_entry(is_dir);
                    if is_dir {
                        trace!("Entering directory: {}", entry.path().display());
                        None
                    } else {
                        Some(Ok(FileTask::from_entry(entry)))
                    }
                }
                Err(e) => {
                    failed = true;
                    Some(Err(CountError::Walk(e)))
                }
            })
        })
        .flatten()
    }
}
