mod cli;
mod core;
mod errors;
mod evidence;
mod http;
mod reporting;
mod scanner;
mod validation;

use anyhow::Context as _;
use clap::Parser;
use crate::cli::args::Cli;
use crate::core::context::Context;
use crate::core::engine::Engine;
use crate::evidence::capture::HeadlessChrome;
use crate::http::client::HttpClient;
use crate::reporting::reporter::write_report;
use crate::reporting::text::{render_table, ConsoleObserver};
use tracing_subscriber::EnvFilter;

const BANNER: &str = r#"
 ╔════════════════════════════════════════════════════════════════════╗
 ║                                                                    ║
 ║    ███████╗██████╗  █████╗ ███╗   ███╗███████╗     ██╗ █████╗  ██╗ ║
 ║    ██╔════╝██╔══██╗██╔══██╗████╗ ████║██╔════╝     ██║██╔══██╗ ██║ ║
 ║    █████╗  ██████╔╝███████║██╔████╔██║█████╗       ██║███████║ ██║ ║
 ║    ██╔══╝  ██╔══██╗██╔══██║██║╚██╔╝██║██╔══╝  ██   ██║██╔══██║ ╚═╝ ║
 ║    ██║     ██║  ██║██║  ██║██║ ╚═╝ ██║███████╗╚█████╔╝██║  ██║ ██╗ ║
 ║    ╚═╝     ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝     ╚═╝╚══════╝ ╚════╝ ╚═╝  ╚═╝ ╚═╝ ║
 ║                                                                    ║
 ║    Clickjacking Detection & Evidence Toolkit                       ║
 ║    Version : 0.1.0                                                 ║
 ║                                                                    ║
 ╚════════════════════════════════════════════════════════════════════╝
"#;

fn print_banner() {
    println!("\x1b[36m{}\x1b[0m", BANNER); // Cyan color
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let ctx = Context::from_cli(cli)?;

    if !ctx.no_banner && !ctx.quiet {
        print_banner();
    }

    std::fs::create_dir_all(&ctx.config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            ctx.config.output_dir.display()
        )
    })?;

    let fetcher = HttpClient::new(ctx.config.timeout)?;
    let launcher = ctx
        .config
        .capture
        .then(|| HeadlessChrome::new(ctx.config.browser_timeout));
    let engine = Engine::new(ctx.config.clone(), fetcher, launcher);

    let observer = ConsoleObserver::new(ctx.quiet);
    let report = engine.run(&ctx.targets, &observer).await;

    if ctx.targets.len() > 1 || ctx.quiet {
        print!("{}", render_table(&report));
    }

    if let Some(format) = ctx.format {
        let path = write_report(&report, format, &ctx.config.output_dir)?;
        println!("\n[+] Report saved to {}", path.display());
    }

    Ok(())
}
