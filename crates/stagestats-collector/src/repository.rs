//! Read-only access to the stage statistics table

use crate::error::Result;
use crate::model::{DateRange, StageResult};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};

/// Source of stage results for a date range (dependency injection seam)
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch every stage result whose event date falls inside the inclusive
    /// range, in result-set order.
    async fn find_stats_between(&self, range: &DateRange) -> Result<Vec<StageResult>>;
}

/// Postgres-backed stats source
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FromRow<'_, PgRow> for StageResult {
    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        let event_time = row.try_get("event_time")?;

        let period: String = row.try_get("period")?;
        let period = period.parse().map_err(|e| sqlx::Error::ColumnDecode {
            index: "period".into(),
            source: Box::new(e),
        })?;

        let channel: String = row.try_get("channel")?;

        let count: i32 = row.try_get("event_count")?;
        let count = u32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "event_count".into(),
            source: Box::new(e),
        })?;

        Ok(StageResult::new(event_time, period, channel, count))
    }
}

#[async_trait]
impl StatsSource for StatsRepository {
    async fn find_stats_between(&self, range: &DateRange) -> Result<Vec<StageResult>> {
        // One bounded query, streamed row by row. The stream (and with it the
        // connection it holds) is released on every exit path, including a
        // mapping failure mid-iteration.
        let mut rows = sqlx::query_as::<_, StageResult>(
            "SELECT event_time, period, channel, event_count \
             FROM pp_data \
             WHERE event_time BETWEEN $1 AND $2",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch(&self.pool);

        let mut results = Vec::new();
        while let Some(result) = rows.try_next().await? {
            results.push(result);
        }

        Ok(results)
    }
}
