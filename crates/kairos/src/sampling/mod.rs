//! Which moments of a period get sampled.

pub mod anchor;
pub mod profile;
pub mod scheduler;

pub use anchor::{resolve_anchor, week_start_date};
pub use profile::{SamplingProfile, Strategy, StrategyKind, YearlyAnchor};
pub use scheduler::{days_in_month, schedule, weekday_name, SamplePoint};
