//! Staged preflight and application wiring
//!
//! Bootstrap is a one-way gate run before any real work:
//!
//! ```text
//! Unconfigured -> ConfigValidated -> DatabaseConnected -> EndpointVerified -> Ready
//! ```
//!
//! Each stage fails fast, so a run that would break mid-publish is instead
//! turned into a side-effect-free startup failure. Only after every check has
//! passed does the collector read or send a single record.

use crate::collector::Collector;
use crate::config::Config;
use crate::error::{CollectorError, Result};
use crate::model::DateRange;
use crate::publisher::PlatformPublisher;
use crate::repository::StatsRepository;
use crate::Cli;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Proxy, StatusCode};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Database connect timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// The sequential pipeline never uses more than one connection at a time.
pub const DB_MAX_CONNECTIONS: u32 = 1;

/// Timeout for each platform request in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// A fully preflighted application, ready to execute one collection run.
pub struct CollectorApplication {
    pool: PgPool,
    collector: Collector<StatsRepository, PlatformPublisher>,
    range: DateRange,
    dry_run: bool,
}

impl CollectorApplication {
    /// Run the collection unless this is a dry run, then release resources on
    /// every path.
    pub async fn execute(self) -> Result<()> {
        let outcome = if self.dry_run {
            info!("dry run requested, skipping collection");
            Ok(())
        } else {
            self.collector.collect(&self.range).await
        };

        self.pool.close().await;
        outcome
    }
}

/// Run every preflight stage and wire the application.
pub async fn build(cli: &Cli) -> Result<CollectorApplication> {
    // ConfigValidated
    let config = Config::load(&cli.config)?;

    // DatabaseConnected
    let pool = connect_database(&config).await?;

    // EndpointVerified
    let client = build_platform_client(&config)?;
    verify_endpoint(&client, &config.platform_url).await?;

    info!("all connectivity checks passed");

    let repository = StatsRepository::new(pool.clone());
    let publisher = PlatformPublisher::new(client, config.platform_url.clone());

    Ok(CollectorApplication {
        pool,
        collector: Collector::new(repository, publisher),
        range: cli.date_range(),
        dry_run: cli.dry_run,
    })
}

/// Open the database connection pool. No query is attempted here; a failure
/// to connect halts the run before any data is touched.
async fn connect_database(config: &Config) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(&config.database_url)
        .map_err(|e| {
            CollectorError::Connectivity(format!(
                "invalid database url '{}': {}",
                config.database_url, e
            ))
        })?
        .username(&config.database_username)
        .password(&config.database_password);

    PgPoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(DB_CONNECT_TIMEOUT_SECS))
        .connect_with(options)
        .await
        .map_err(|e| CollectorError::Connectivity(format!("could not connect to database: {}", e)))
}

/// Construct the HTTP client shared by the preflight check and the publisher.
///
/// The bearer token travels as a default header on every request. When
/// `proxy_host` is non-empty all traffic is routed through it, with basic
/// auth when a proxy username is configured.
pub fn build_platform_client(config: &Config) -> Result<Client> {
    let mut token = HeaderValue::from_str(&format!("Bearer {}", config.platform_token))
        .map_err(|e| {
            CollectorError::Configuration(format!("platform token is not a valid header value: {}", e))
        })?;
    token.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, token);

    let mut builder = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .default_headers(headers);

    if !config.proxy_host.is_empty() {
        let mut proxy = Proxy::all(&config.proxy_host).map_err(|e| {
            CollectorError::Connectivity(format!(
                "invalid proxy host '{}': {}",
                config.proxy_host, e
            ))
        })?;
        if !config.proxy_username.is_empty() {
            proxy = proxy.basic_auth(&config.proxy_username, &config.proxy_password);
        }
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| CollectorError::Connectivity(format!("could not build http client: {}", e)))
}

/// Probe the real ingestion endpoint with a synthetic request.
///
/// Posts an empty JSON array, which the platform answers without ingesting
/// anything, and requires an exact 200. Anything else halts the run before a
/// single real record is read.
pub async fn verify_endpoint(client: &Client, url: &str) -> Result<()> {
    let response = client
        .post(url)
        .json(&serde_json::json!([]))
        .send()
        .await
        .map_err(|e| {
            CollectorError::Connectivity(format!("could not connect to platform at {}: {}", url, e))
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(CollectorError::Connectivity(format!(
            "platform test query to {} returned {}, expected 200",
            url, status
        )));
    }

    Ok(())
}
