use chrono::Utc;
use clap::Parser;
use rss_filter::{Cli, Fetcher, FilterError, FilterPipeline, RunConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the rendered feed, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), FilterError> {
    // Configuration problems surface before any network activity
    let config = RunConfig::from_env(cli)?;
    info!("Filtering feed {}", config.feed_url);

    let fetcher = Fetcher::new(config.fetch.clone())?;
    let pipeline = FilterPipeline::new(fetcher);
    let output = pipeline.run(&config, Utc::now()).await?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
