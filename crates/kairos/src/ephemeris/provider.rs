use crate::bodies::BodySet;
use crate::ephemeris::types::BodyPositions;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors a position lookup can produce. All of them are per-snapshot and
/// non-fatal for a pipeline run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("No ephemeris data covers {datetime}")]
    UnsupportedDate { datetime: DateTime<Utc> },
    #[error("Position lookup for {datetime} timed out after {timeout_ms} ms")]
    Timeout {
        datetime: DateTime<Utc>,
        timeout_ms: u128,
    },
    #[error("Unknown body in position data: {name}")]
    UnknownBody { name: String },
    #[error("Invalid longitude for {body}: {value}")]
    InvalidLongitude { body: String, value: f64 },
    #[error("Invalid ephemeris table: {message}")]
    InvalidTable { message: String },
    #[error("Position source failed: {message}")]
    Source { message: String },
}

/// Source of transit positions.
///
/// Implementations must return an error (or an empty map) for dates they
/// cannot serve; the pipeline treats either as a skipped snapshot.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    async fn get_positions(
        &self,
        at: DateTime<Utc>,
        bodies: &BodySet,
    ) -> Result<BodyPositions, PositionError>;
}
