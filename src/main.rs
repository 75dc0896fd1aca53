use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use tagwatch::config::Config;
use tagwatch::feed::HttpFetcher;
use tagwatch::scan::{self, ScanSummary};

#[derive(Parser, Debug)]
#[command(
    name = "tagwatch",
    about = "Scan RSS/Atom feeds for keywords and write a highlighted HTML report"
)]
struct Args {
    /// Config file (TOML). Built-in sources and keywords are used when missing
    #[arg(long, short, value_name = "FILE", default_value = "tagwatch.toml")]
    config: PathBuf,

    /// Write the report here instead of the configured output path
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Abort without writing a report if any source fails
    #[arg(long)]
    fail_fast: bool,

    /// Open the report in the default browser when done
    #[arg(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the status lines
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let summary = match run(&args).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("An error occurred: {:#}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Combined HTML file '{}' has been generated!",
        summary.output_path.display()
    );
    println!(
        "{} matching entries across {} feeds",
        summary.matched_entries(),
        summary.sources.len()
    );
    for failed in summary.failed() {
        eprintln!(
            "Warning: {} could not be loaded: {}",
            failed.url,
            failed.error.as_deref().unwrap_or("unknown error")
        );
    }

    if args.open {
        if let Err(e) = open::that(&summary.output_path) {
            tracing::warn!(
                path = %summary.output_path.display(),
                error = %e,
                "Failed to open report"
            );
            eprintln!("Warning: could not open report: {}", e);
        }
    }

    Ok(())
}

async fn run(args: &Args) -> Result<ScanSummary> {
    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config '{}'", args.config.display()))?;

    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if args.fail_fast {
        config.fail_fast = true;
    }
    config.validate()?;

    let fetcher = HttpFetcher::from_config(&config).context("Failed to build HTTP client")?;
    let summary = scan::run(&config, &fetcher).await?;
    Ok(summary)
}
