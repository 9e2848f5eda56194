use anyhow::{Context, Result};
use clap::Parser;
use linecount::{count, CliOverrides, CountConfig, CountSummary};
use std::{ffi::OsString, num::NonZeroUsize, path::PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Count lines in .go, .html, .css and .js files under a directory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to directory (default: current working directory)
    #[arg(long, allow_hyphen_values = true)]
    path: Option<PathBuf>,

    /// Maximum number of files read at the same time [default: 10]
    #[arg(long)]
    max: Option<NonZeroUsize>,

    /// Additional YAML configuration file
    #[arg(long, allow_hyphen_values = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(self) -> CliOverrides {
        CliOverrides {
            root_path: self.path,
            max_concurrency: self.max,
            log_level: self.log_level,
        }
    }
}

/// Long flags that take their value from the following argument
const VALUE_FLAGS: [&str; 4] = ["path", "max", "config", "log-level"];

/// Rewrites single-dash long flags (`-path dir`, `-max=4`) into their
/// double-dash form. The value following a flag and everything after a bare
/// `--` are left alone, so `-path -web` still names the directory `-web`.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    let mut value_next = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || passthrough || std::mem::take(&mut value_next) {
                return arg;
            }
            let rewritten = match arg.to_str() {
                Some("--") => {
                    passthrough = true;
                    None
                }
                Some(s) if s.starts_with("--") => {
                    value_next = VALUE_FLAGS.contains(&&s[2..]);
                    None
                }
                Some(s)
                    if s.len() > 2
                        && s.starts_with('-')
                        && s[1..].starts_with(|c: char| c.is_ascii_alphabetic()) =>
                {
                    value_next = VALUE_FLAGS.contains(&&s[1..]);
                    Some(OsString::from(format!("-{}", s)))
                }
                _ => None,
            };
            rewritten.unwrap_or(arg)
        })
        .collect()
}

fn init_tracing(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary(summary: &CountSummary) {
    // Two lines: the total, then the elapsed time
    println!("{}", summary);
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let config = CountConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?
        .merge_with_cli(cli.overrides());

    init_tracing(config.log_filter()?);

    let summary = count(&config)?;
    print_summary(&summary);
    Ok(())
}
