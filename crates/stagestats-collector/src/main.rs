//! Stagestats collector - Main entry point

use clap::Parser;
use stagestats_collector::{bootstrap, Cli, Result};
use stagestats_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    // Initialize logging based on verbose flag and environment
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("stagestats-collector".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    // Initialize logging (ignore errors as the collector should work without it)
    let _ = init_logging(&log_config);

    // Top-level error boundary: every failure, categorized or not, ends up
    // logged in full and mapped to a deterministic non-zero exit. Nothing
    // else writes to the standard streams.
    if let Err(e) = run(&cli).await {
        error!(error = %e, cause = ?e, "collector run failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let application = bootstrap::build(cli).await?;
    application.execute().await
}
