//! Error types for the Stagestats collector
//!
//! One variant per failure class the operator can act on. Preflight failures
//! (configuration, connectivity) happen before any record is touched; data
//! access and publish failures abort the run without retrying, which is safe
//! because record ids are deterministic and a re-run overwrites rather than
//! duplicates.

use thiserror::Error;

/// Result type alias for collector operations
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Failure classes for a collection run
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Configuration file missing, unreadable, or its key set does not match
    /// the canonical set. Raised before any connection is attempted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The database or the platform endpoint failed a preflight check.
    /// Raised before any record is read or sent.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Query or row-mapping failure during real collection. Carries the
    /// original cause; nothing is retried or swallowed.
    #[error("Database error: {0}. Check the stage statistics table and connection settings.")]
    DataAccess(#[from] sqlx::Error),

    /// A record POST failed during real publishing. Remaining records are not
    /// attempted; re-running the same date range is safe.
    #[error("Publish error: {0}")]
    Publish(String),

    /// Anything not covered by the classes above. Logged with full detail at
    /// the top level and mapped to a non-zero exit.
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}
