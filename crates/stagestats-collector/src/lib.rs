//! Stagestats collector
//!
//! A one-shot tool that extracts aggregated stage usage counts from the
//! statistics database for a date range and publishes them, one record at a
//! time, to the metrics platform's ingestion endpoint.
//!
//! # Pipeline
//!
//! - **Bootstrap**: validate configuration, open the database connection,
//!   probe the platform endpoint — all before any real work ([`bootstrap`])
//! - **Collect**: one bounded range query ([`repository`]), encode each
//!   record ([`encoder`]), POST them sequentially ([`publisher`])
//!
//! Record ids are derived from content ([`model::StageResult::id`]), so a
//! failed run can simply be re-run: records that already went through are
//! overwritten, never duplicated.

pub mod bootstrap;
pub mod collector;
pub mod config;
pub mod encoder;
pub mod error;
pub mod model;
pub mod publisher;
pub mod repository;

// Re-export commonly used types
pub use error::{CollectorError, Result};

use chrono::{Days, Local, NaiveDate};
use clap::Parser;
use model::DateRange;
use std::path::PathBuf;

/// Days of history collected when no explicit start date is given.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 3;

/// Stagestats collector command line
#[derive(Parser, Debug)]
#[command(name = "stagestats-collector")]
#[command(author, version)]
#[command(about = "Collects aggregated stage statistics and publishes them to the metrics platform")]
pub struct Cli {
    /// Path to the collector configuration file
    #[arg(long, default_value = "collector.toml")]
    pub config: PathBuf,

    /// Perform the connectivity checks and exit without collecting
    #[arg(long)]
    pub dry_run: bool,

    /// Date to start collecting from (default: three days ago)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub from: Option<NaiveDate>,

    /// Date to collect up to (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub to: Option<NaiveDate>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the collection range, filling unspecified bounds with the
    /// defaults. Reversed bounds are normalized by [`DateRange`].
    pub fn date_range(&self) -> DateRange {
        let today = Local::now().date_naive();
        let from = self
            .from
            .unwrap_or_else(|| today - Days::new(DEFAULT_LOOKBACK_DAYS));
        let to = self.to.unwrap_or(today);

        DateRange::new(from, to)
    }
}
