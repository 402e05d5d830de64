mod aggregate;
mod config;
mod fetch;
mod report;
mod review;
mod tier;

use clap::Parser;
use fetch::{FetchError, Fetcher, LOOKBACK_DAYS};
use report::Report;
use std::path::PathBuf;
use std::process::ExitCode;
use tier::TierSet;

/// Report pull request review metrics (merge time, size, review cycles,
/// throughput and tier distribution) for PRs merged in the last 30 days.
#[derive(Parser, Debug)]
#[command(name = "review-metrics", version, about)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "review-metrics.toml")]
    config: PathBuf,

    /// Extra logging (client invocation, filtering, aggregation)
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "review_metrics=debug"
    } else if cli.quiet {
        "review_metrics=error"
    } else {
        "review_metrics=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(?cli, "parsed CLI arguments");

    let cfg = config::load_config(&cli.config);
    let tiers = TierSet::from_config(&cfg.tiers);
    let fetcher = Fetcher::from_config(&cfg.client);

    println!("📊 Fetching PR review metrics...\n");

    let outcome = match fetcher.fetch_merged(LOOKBACK_DAYS, chrono::Utc::now()) {
        Ok(outcome) => outcome,
        Err(e) => {
            report_fetch_error(&e);
            return ExitCode::from(1);
        }
    };

    if outcome.hit_limit() {
        tracing::warn!(
            fetched = outcome.fetched,
            limit = outcome.limit,
            "result cap reached"
        );
        eprintln!(
            "Warning: fetched {} PRs, which is the --limit cap; older PRs in the window may be missing and metrics may be skewed.",
            outcome.fetched
        );
    }

    if outcome.requests.is_empty() {
        println!("{}", report::no_data_message(LOOKBACK_DAYS));
        return ExitCode::SUCCESS;
    }

    let agg = match aggregate::aggregate(&outcome.requests, &tiers) {
        Ok(agg) => agg,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let text = Report::new(&agg, &tiers, LOOKBACK_DAYS).to_string();

    println!(
        "Found {} merged PRs in the last {} days\n",
        outcome.requests.len(),
        LOOKBACK_DAYS
    );
    print!("{text}");
    ExitCode::SUCCESS
}

fn report_fetch_error(err: &FetchError) {
    match err {
        FetchError::NotFound { command } => {
            eprintln!("Error: GitHub CLI ({command}) not found. Please install it first.");
            eprintln!("Visit: https://cli.github.com/");
        }
        FetchError::CommandFailed { stderr, .. } => {
            eprintln!("Error running gh command: {err}");
            eprintln!("Error output: {}", stderr.trim_end());
        }
        FetchError::Spawn { .. } | FetchError::Parse { .. } => {
            eprintln!("Error: {err}");
        }
    }
}
