//! Sequential record publishing to the metrics platform

use crate::encoder::encode;
use crate::error::{CollectorError, Result};
use crate::model::StageResult;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Destination for collected stage results (dependency injection seam)
#[async_trait]
pub trait StatsSink: Send + Sync {
    /// Publish every record, in input order. The first failure aborts the
    /// remaining sequence.
    async fn publish(&self, results: &[StageResult]) -> Result<()>;
}

/// Publishes one POST per record to the platform ingestion endpoint.
///
/// Strictly sequential: a POST is not started until the previous one has
/// completed. No batching, no retries. Aborting mid-sequence is safe because
/// record ids are deterministic, so a re-run of the same date range
/// overwrites the records that did get through.
pub struct PlatformPublisher {
    client: Client,
    url: String,
}

impl PlatformPublisher {
    /// `client` carries the bearer token and optional proxy; see
    /// [`crate::bootstrap::build_platform_client`].
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl StatsSink for PlatformPublisher {
    async fn publish(&self, results: &[StageResult]) -> Result<()> {
        for result in results {
            let id = result.id();
            debug!(id = %id, channel = result.channel(), "posting stage result");

            let response = self
                .client
                .post(&self.url)
                .json(&encode(result))
                .send()
                .await
                .map_err(|e| {
                    CollectorError::Publish(format!("request for record {} failed: {}", id, e))
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(CollectorError::Publish(format!(
                    "platform returned {} for record {}",
                    status, id
                )));
            }
        }

        Ok(())
    }
}
