//! Orchestration of one collection run

use crate::error::Result;
use crate::model::DateRange;
use crate::publisher::StatsSink;
use crate::repository::StatsSource;
use tracing::info;

/// Ties repository output to publisher input for a single run.
pub struct Collector<S, P> {
    repository: S,
    publisher: P,
}

impl<S: StatsSource, P: StatsSink> Collector<S, P> {
    pub fn new(repository: S, publisher: P) -> Self {
        Self { repository, publisher }
    }

    /// Collect and publish every stage result in the range.
    ///
    /// An empty result set is a normal terminal state: it is logged and the
    /// publisher is never invoked. Repository and publisher failures
    /// propagate unchanged; nothing is retried.
    pub async fn collect(&self, range: &DateRange) -> Result<()> {
        let results = self.repository.find_stats_between(range).await?;

        if results.is_empty() {
            info!(
                start = %range.start(),
                end = %range.end(),
                "no results found for date range"
            );
            return Ok(());
        }

        let attempted = results.len();
        self.publisher.publish(&results).await?;
        info!(records = attempted, "collection completed");

        Ok(())
    }
}
