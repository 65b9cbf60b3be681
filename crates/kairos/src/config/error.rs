use crate::config::ConfigKind;
use crate::period::Scope;
use crate::sampling::StrategyKind;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// Always fatal for the request that triggered them; nothing retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{kind} config not found at {location}")]
    NotFound { kind: ConfigKind, location: String },
    #[error("{kind} config could not be read from {location}: {message}")]
    Io {
        kind: ConfigKind,
        location: String,
        message: String,
    },
    #[error("{kind} config is not valid TOML: {message}")]
    Parse { kind: ConfigKind, message: String },
    #[error("{kind} config: missing required key `{key}`")]
    MissingKey { kind: ConfigKind, key: String },
    #[error("{kind} config: `{key}` must be {expected}, got {found}")]
    InvalidType {
        kind: ConfigKind,
        key: String,
        expected: &'static str,
        found: String,
    },
    #[error("{kind} config: `{key}` = {value} is out of range (expected {expected})")]
    OutOfRange {
        kind: ConfigKind,
        key: String,
        value: String,
        expected: String,
    },
    #[error("{kind} config: unknown value `{value}` for `{key}` (allowed: {allowed})")]
    UnknownValue {
        kind: ConfigKind,
        key: String,
        value: String,
        allowed: String,
    },
    #[error("{kind} config: malformed time `{value}` for `{key}` (expected HH:MM)")]
    MalformedTime {
        kind: ConfigKind,
        key: String,
        value: String,
    },
    #[error("{kind} config: malformed timezone `{value}` (expected UTC or +HH:MM/-HH:MM)")]
    MalformedTimezone { kind: ConfigKind, value: String },
    #[error("sampling strategy `{strategy}` is not supported for the {scope} scope")]
    UnsupportedStrategy { strategy: StrategyKind, scope: Scope },
    #[error("sampling strategy `{strategy}` yields no samples for the {scope} scope from {anchor} over {horizon_days} days")]
    EmptySchedule {
        strategy: StrategyKind,
        scope: Scope,
        anchor: NaiveDate,
        horizon_days: u32,
    },
}
