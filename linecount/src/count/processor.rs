use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

use crate::errors::{CountError, CountResult};
use crate::metrics::WalkMetrics;

// Constants for file processing
const BUFFER_CAPACITY: usize = 65536;
pub(crate) const SMALL_FILE_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// Counts newline-terminated segments in `bytes`, plus a trailing segment
/// that lacks its newline.
pub fn count_segments(bytes: &[u8]) -> u64 {
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count() as u64;
    match bytes.last().copied() {
        None | Some(b'\n') => newlines,
        Some(_) => newlines + 1,
    }
}

/// Counts lines in individual files
#[derive(Debug, Clone, Default)]
pub struct FileProcessor {
    metrics: WalkMetrics,
}

impl FileProcessor {
    /// Creates a new FileProcessor reporting into `metrics`
    pub fn new(metrics: WalkMetrics) -> Self {
        Self { metrics }
    }

    /// Gets the metrics this processor records into
    pub fn metrics(&self) -> &WalkMetrics {
        &self.metrics
    }

    /// Reads a small file in one go
    fn count_small_file(&self, path: &Path) -> CountResult<u64> {
        trace!("Reading small file whole: {}", path.display());
        let bytes = std::fs::read(path).map_err(|e| CountError::from_open(path, e))?;
        Ok(count_segments(&bytes))
    }

    /// Scans a file line by line through a buffered reader.
    ///
    /// Lines may be any length; one longer than the buffer still counts once.
    fn count_file_buffered(&self, path: &Path) -> CountResult<u64> {
        trace!("Scanning file line by line: {}", path.display());
        let file = File::open(path).map_err(|e| CountError::from_open(path, e))?;

        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut line_buffer = Vec::with_capacity(256);
        let mut lines = 0;

        while reader
            .read_until(b'\n', &mut line_buffer)
            .map_err(|e| CountError::read(path, e))?
            > 0
        {
            lines += 1;
            line_buffer.clear();
        }

        Ok(lines)
    }

    /// Counts a large file through a read-only memory map
    fn count_mmap_file(&self, path: &Path) -> CountResult<u64> {
        trace!("Memory mapping file: {}", path.display());
        let file = File::open(path).map_err(|e| CountError::from_open(path, e))?;

        // SAFETY: the mapping is read-only and dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| CountError::read(path, e))?;

        Ok(count_segments(&mmap))
    }

    /// Counts the lines in a file, choosing a read strategy by size
    pub fn count_file(&self, path: &Path) -> CountResult<u64> {
        trace!("Counting file: {}", path.display());

        match path.metadata() {
            Ok(metadata) => {
                let size = metadata.len();
                let lines = if size < SMALL_FILE_THRESHOLD {
                    self.count_small_file(path)?
                } else if size >= LARGE_FILE_THRESHOLD {
                    self.count_mmap_file(path)?
                } else {
                    self.count_file_buffered(path)?
                };

                self.metrics.record_file_processing(size);
                Ok(lines)
            }
            Err(e) => {
                debug!("Failed to get metadata for {}: {}", path.display(), e);
                self.count_file_buffered(path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_count_segments() {
        assert_eq!(count_segments(b""), 0);
        assert_eq!(count_segments(b"\n"), 1);
        assert_eq!(count_segments(b"one"), 1);
        assert_eq!(count_segments(b"one\ntwo\n"), 2);
        assert_eq!(count_segments(b"one\ntwo"), 2); // Unterminated final line
        assert_eq!(count_segments(b"a\n\nb"), 3); // Blank line in the middle
        assert_eq!(count_segments(b"a\r\nb\r\n"), 2); // CRLF is one line
    }

    #[test]
    fn test_strategies_agree() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("mixed.js");
        let mut file = File::create(&file_path).unwrap();
        for i in 0..5000 {
            writeln!(file, "const value{} = {};", i, i).unwrap();
        }
        file.write_all(b"// no newline at end").unwrap();
        drop(file);

        let processor = FileProcessor::default();
        assert_eq!(processor.count_small_file(&file_path).unwrap(), 5001);
        assert_eq!(processor.count_file_buffered(&file_path).unwrap(), 5001);
        assert_eq!(processor.count_mmap_file(&file_path).unwrap(), 5001);
        assert_eq!(processor.count_file(&file_path).unwrap(), 5001);
    }

    #[test]
    fn test_small_file_uses_small_strategy() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("small.go");
        std::fs::write(&file_path, "package main\n\nfunc main() {}\n").unwrap();

        let processor = FileProcessor::default();
        assert_eq!(processor.count_file(&file_path).unwrap(), 3);

        let stats = processor.metrics().get_stats();
        assert_eq!(stats.small_files_read, 1);
        assert_eq!(stats.buffered_files_read, 0);
    }

    #[test]
    fn test_buffered_strategy_for_medium_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("medium.css");
        let line = "body { margin: 0; padding: 0; }\n";
        let repeats = (SMALL_FILE_THRESHOLD as usize / line.len()) + 10;
        std::fs::write(&file_path, line.repeat(repeats)).unwrap();

        let processor = FileProcessor::default();
        assert_eq!(processor.count_file(&file_path).unwrap(), repeats as u64);
        assert_eq!(processor.metrics().get_stats().buffered_files_read, 1);
    }

    #[test]
    fn test_long_line_counts_once() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("minified.js");
        let mut content = "x".repeat(100 * 1024);
        content.push('\n');
        content.push_str("tail");
        std::fs::write(&file_path, content).unwrap();

        let processor = FileProcessor::default();
        assert_eq!(processor.count_file(&file_path).unwrap(), 2);
        assert_eq!(processor.count_file_buffered(&file_path).unwrap(), 2);
        assert_eq!(processor.metrics().get_stats().buffered_files_read, 1);
    }

    #[test]
    fn test_failed_read_not_recorded() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("styles.css");
        std::fs::create_dir(&sub_dir).unwrap();

        // Metadata succeeds for a directory, reading it does not
        let processor = FileProcessor::default();
        assert!(processor.count_file(&sub_dir).is_err());

        let stats = processor.metrics().get_stats();
        assert_eq!(stats.small_files_read, 0);
        assert_eq!(stats.buffered_files_read, 0);
        assert_eq!(stats.mmap_files_read, 0);
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.html");
        File::create(&file_path).unwrap();

        let processor = FileProcessor::default();
        assert_eq!(processor.count_file(&file_path).unwrap(), 0);
        assert_eq!(processor.count_file_buffered(&file_path).unwrap(), 0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing.go");

        let processor = FileProcessor::default();
        let err = processor.count_file(&file_path).unwrap_err();
        assert!(matches!(err, CountError::FileNotFound(_)));
    }
}
