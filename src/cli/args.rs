use crate::reporting::reporter::ReportFormat;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// FRAMEJACK – Clickjacking Exposure Scanner
#[derive(Parser, Debug)]
#[command(
    name = "framejack",
    version = "0.1.0",
    about = "FRAMEJACK – Clickjacking Exposure Scanner",
    long_about = r#"
FRAMEJACK checks web targets for clickjacking exposure:

  • X-Frame-Options analysis (only DENY / SAMEORIGIN count as protection)
  • CSP frame-ancestors detection
  • Embedded <iframe>/<frame> inventory
  • HTML proof-of-concept page for every vulnerable target
  • Optional headless Chrome screenshot of the PoC

Every target yields exactly one result. Unreachable or malformed targets are
reported as errors without affecting the rest of the batch.
"#,
    after_help = r#"EXAMPLES:

  framejack -u example.com
  framejack -u https://example.com/login -o results --screenshot
  framejack -f targets.txt -c 10 --format json
  framejack -f targets.txt --format csv -o reports

Target files contain one URL per line; blank lines and lines starting with
'#' are ignored."#
)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "file"])))]
pub struct Cli {
    /// Single target URL (scheme defaults to http://)
    #[arg(short, long)]
    pub url: Option<String>,

    /// File with newline-separated target URLs
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Directory for PoC pages, screenshots and reports
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Write a report file in the given format
    #[arg(long, value_enum, help_heading = "REPORTING")]
    pub format: Option<ReportFormat>,

    // ═══════════════════════════════════════════════════════════════════
    // SCANNING
    // ═══════════════════════════════════════════════════════════════════

    /// Number of targets scanned concurrently
    #[arg(short, long, default_value_t = 5, help_heading = "SCANNING")]
    pub concurrency: usize,

    /// HTTP request timeout in seconds
    #[arg(short, long, default_value_t = 10, help_heading = "SCANNING")]
    pub timeout: u64,

    /// Do not generate PoC pages (also disables screenshots)
    #[arg(long = "no-poc", help_heading = "SCANNING")]
    pub no_poc: bool,

    // ═══════════════════════════════════════════════════════════════════
    // EVIDENCE
    // ═══════════════════════════════════════════════════════════════════

    /// Capture a headless Chrome screenshot of each vulnerable target's PoC
    #[arg(short, long, help_heading = "EVIDENCE")]
    pub screenshot: bool,

    /// Seconds to let the framed page render before the screenshot
    #[arg(long, default_value_t = 3, help_heading = "EVIDENCE")]
    pub settle: u64,

    /// Browser launch/navigation timeout in seconds
    #[arg(long = "browser-timeout", default_value_t = 30, help_heading = "EVIDENCE")]
    pub browser_timeout: u64,

    // ═══════════════════════════════════════════════════════════════════
    // OUTPUT
    // ═══════════════════════════════════════════════════════════════════

    /// Suppress the startup banner
    #[arg(long = "no-banner", help_heading = "OUTPUT")]
    pub no_banner: bool,

    /// Only print the final summary
    #[arg(short, long, help_heading = "OUTPUT")]
    pub quiet: bool,

    /// Debug logging
    #[arg(short, long, help_heading = "OUTPUT")]
    pub verbose: bool,
}
