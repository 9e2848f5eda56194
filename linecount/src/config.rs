use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use crate::errors::{CountError, CountResult};
use crate::filters::default_extensions;

/// Configuration for a counting run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations, later sources
/// overriding earlier ones:
/// 1. Global `$HOME/.config/linecount/config.yaml`
/// 2. Local `.linecount.yaml` in the current directory
/// 3. Custom config file specified via `--config` flag
///
/// Command-line flags are applied last through [`CountConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Root directory to count in (default: current working directory)
/// root_path: "src"
///
/// # Maximum number of files read at the same time
/// max_concurrency: 10
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// The extension allow-list is fixed to [`crate::filters::DEFAULT_EXTENSIONS`]
/// and is never read from a file. Library callers may still replace it on the
/// struct directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountConfig {
    /// Root directory to walk. `None` means the current working directory,
    /// resolved when the run starts.
    #[serde(default)]
    pub root_path: Option<PathBuf>,

    /// Maximum number of file tasks in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: NonZeroUsize,

    /// Extensions eligible for counting; empty means every file
    #[serde(skip, default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Values supplied on the command line; `None` leaves the file value alone
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_path: Option<PathBuf>,
    pub max_concurrency: Option<NonZeroUsize>,
    pub log_level: Option<String>,
}

pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

fn default_max_concurrency() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_MAX_CONCURRENCY).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            max_concurrency: default_max_concurrency(),
            extensions: default_extensions(),
            log_level: default_log_level(),
        }
    }
}

impl CountConfig {
    /// Creates a configuration rooted at `root` with default settings
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root_path: Some(root.into()),
            ..Self::default()
        }
    }

    /// Loads configuration from the default locations plus a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let optional_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("linecount/config.yaml")),
            // Local config
            Some(PathBuf::from(".linecount.yaml")),
        ];

        for path in optional_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicitly named file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(root) = cli.root_path {
            self.root_path = Some(root);
        }
        if let Some(max) = cli.max_concurrency {
            self.max_concurrency = max;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Parses `log_level`, rejecting anything that is not a level name
    pub fn log_filter(&self) -> CountResult<LevelFilter> {
        self.log_level.parse().map_err(|_| {
            CountError::config_error(format!(
                "Invalid log level '{}' (expected off, error, warn, info, debug or trace)",
                self.log_level
            ))
        })
    }

    /// Returns the root to walk, looking up the working directory when unset
    pub fn resolved_root(&self) -> CountResult<PathBuf> {
        match &self.root_path {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().map_err(CountError::working_directory),
        }
    }
}
