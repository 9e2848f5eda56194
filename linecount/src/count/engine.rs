use std::time::Instant;
use tracing::{debug, info};

use super::dispatcher::Dispatcher;
use super::processor::FileProcessor;
use super::walker::TreeWalker;
use crate::config::CountConfig;
use crate::errors::CountResult;
use crate::metrics::WalkMetrics;
use crate::results::CountSummary;

/// Counts lines in every allow-listed file under the configured root
pub fn count(config: &CountConfig) -> CountResult<CountSummary> {
    let started = Instant::now();
    let root = config.resolved_root()?;

    info!(
        "Starting line count in {} with up to {} concurrent tasks",
        root.display(),
        config.max_concurrency
    );
    debug!("Allowed extensions: {:?}", config.extensions);

    let metrics = WalkMetrics::new();
    let walker = TreeWalker::new(&root, metrics.clone());
    let processor = FileProcessor::new(metrics.clone());
    let dispatcher = Dispatcher::new(config.max_concurrency, metrics.clone())?;

    let tally = dispatcher.run(walker.into_tasks(), &config.extensions, &processor)?;

    metrics.log_stats();

    let summary = CountSummary::from_tally(
        tally,
        metrics.get_stats().peak_in_flight,
        started.elapsed(),
    );

    info!(
        "Count complete. {} lines in {} files ({} skipped, {} failed)",
        summary.total_lines, summary.files_counted, summary.files_skipped, summary.files_failed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use tempfile::tempdir;

    #[test]
    fn test_count_with_metrics() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("main.go"), "package main\n\nfunc main() {}\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "# readme\n").unwrap();

        let config = CountConfig {
            root_path: Some(dir.path().to_path_buf()),
            max_concurrency: NonZeroUsize::new(1).unwrap(),
            ..CountConfig::default()
        };

        let summary = count(&config).unwrap();
        assert_eq!(summary.total_lines, 3);
        assert_eq!(summary.files_counted, 1);
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.peak_in_flight, 1);
    }
}
