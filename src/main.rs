//! jobfeed - search job postings aggregated from RSS feeds
//!
//! Thin front end over the library: runs a search, a single refresh pass,
//! the background scheduler, or cache maintenance. Results go to stdout as
//! JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobfeed::cli::{Cli, Command};
use jobfeed::config::interval_from_minutes;
use jobfeed::{Config, FeedScheduler, JobSearch};

/// Installs the tracing subscriber, honouring `RUST_LOG`
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.apply_to(Config::from_env()?)?;
    let search = JobSearch::from_config(&config);
    let scheduler = FeedScheduler::with_batch_size(
        search.feeds().to_vec(),
        search.cache().clone(),
        config.batch_size,
    );

    match &cli.command {
        Command::Search { limit, .. } => {
            let query = cli.query().unwrap_or_default();
            let response = search.search(&query, *limit).await;
            print_json(&response)?;
        }
        Command::Refresh => {
            let summary = scheduler.refresh_all().await;
            print_json(&summary)?;
        }
        Command::Watch { interval } => {
            let interval = match interval {
                Some(minutes) => interval_from_minutes(*minutes).context("invalid --interval")?,
                None => config.refresh_interval,
            };

            scheduler.start(interval);
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?;
            scheduler.stop();
            info!("shutting down");
        }
        Command::Stats => {
            let stats = scheduler.stats().context("failed to read cache directory")?;
            print_json(&stats)?;
        }
        Command::ClearCache => {
            let removed = scheduler
                .clear_cache()
                .context("failed to clear cache directory")?;
            println!("Removed {removed} cached feed(s)");
        }
    }

    Ok(())
}
