//! Domain values for collected stage statistics

use chrono::NaiveDate;
use stagestats_common::hash::md5_hex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Aggregation granularity of a stage result.
///
/// This is a closed set: the source table may only carry these values, and an
/// unknown raw string is a mapping failure rather than a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    /// Canonical string form, as stored in the source table and sent on the
    /// wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a raw period string is not one of the known granularities
#[derive(Error, Debug)]
#[error("unknown period '{0}', expected one of: day, week, month, quarter, year")]
pub struct ParsePeriodError(String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            other => Err(ParsePeriodError(other.to_string())),
        }
    }
}

/// One aggregated usage count for a date, period granularity and channel.
///
/// Immutable once constructed; instances flow through the pipeline by value
/// and are discarded after a publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    timestamp: NaiveDate,
    period: Period,
    channel: String,
    count: u32,
}

impl StageResult {
    pub fn new(timestamp: NaiveDate, period: Period, channel: impl Into<String>, count: u32) -> Self {
        Self {
            timestamp,
            period,
            channel: channel.into(),
            count,
        }
    }

    /// Deterministic identifier: the MD5 hex digest of the date, the period
    /// and the raw channel string, in that order.
    ///
    /// The count is deliberately excluded, so recomputing the same
    /// date/period/channel with a corrected count yields the same id and a
    /// re-publish overwrites the downstream record instead of duplicating it.
    pub fn id(&self) -> String {
        let key = format!("{}{}{}", self.timestamp, self.period, self.channel);
        md5_hex(key.as_bytes())
    }

    pub fn timestamp(&self) -> NaiveDate {
        self.timestamp
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Raw channel label, case preserved. Lowercased only at serialization.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Inclusive date range with `start <= end` guaranteed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds when they are given in reverse
    /// order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start > end {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}
