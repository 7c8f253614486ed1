//! Run configuration built from parsed CLI arguments

use crate::cli::args::Cli;
use crate::core::target::{load_targets, ScanTarget};
use crate::evidence::capture::{DEFAULT_BROWSER_TIMEOUT, DEFAULT_SETTLE};
use crate::http::client::DEFAULT_TIMEOUT;
use crate::reporting::reporter::ReportFormat;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 5;
pub const MAX_CONCURRENCY: usize = 64;

/// Settings consumed by the scan engine
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub concurrency: usize,
    pub timeout: Duration,
    pub output_dir: PathBuf,
    pub generate_poc: bool,
    pub capture: bool,
    pub settle: Duration,
    pub browser_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            output_dir: PathBuf::from("output"),
            generate_poc: true,
            capture: false,
            settle: DEFAULT_SETTLE,
            browser_timeout: DEFAULT_BROWSER_TIMEOUT,
        }
    }
}

pub fn clamp_concurrency(requested: usize) -> usize {
    requested.clamp(1, MAX_CONCURRENCY)
}

pub struct Context {
    pub targets: Vec<String>,
    pub config: ScanConfig,
    pub format: Option<ReportFormat>,
    pub quiet: bool,
    pub no_banner: bool,
}

impl Context {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let targets = match (&cli.url, &cli.file) {
            (Some(url), _) => vec![url.trim().to_string()],
            (None, Some(path)) => load_targets(path)?,
            (None, None) => anyhow::bail!("Either --url or --file is required"),
        };

        if targets.iter().all(|t| t.is_empty()) {
            match &cli.file {
                Some(path) => anyhow::bail!("No targets found in {}", path.display()),
                None => anyhow::bail!("No target supplied"),
            }
        }

        // Invalid entries stay in the batch and are reported, but at least
        // one target has to be scannable.
        if !targets.iter().any(|t| ScanTarget::parse(t).is_ok()) {
            anyhow::bail!("No valid targets among {} supplied", targets.len());
        }

        let config = ScanConfig {
            concurrency: clamp_concurrency(cli.concurrency),
            timeout: Duration::from_secs(cli.timeout.max(1)),
            output_dir: cli.output,
            generate_poc: !cli.no_poc,
            capture: cli.screenshot && !cli.no_poc,
            settle: Duration::from_secs(cli.settle),
            browser_timeout: Duration::from_secs(cli.browser_timeout.max(1)),
        };

        if cli.screenshot && cli.no_poc {
            tracing::warn!("--screenshot ignored: screenshots are taken of the PoC page");
        }

        Ok(Self {
            targets,
            config,
            format: cli.format,
            quiet: cli.quiet,
            no_banner: cli.no_banner,
        })
    }
}
