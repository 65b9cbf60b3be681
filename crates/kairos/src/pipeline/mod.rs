//! Period orchestration: schedule, fetch positions, score, aggregate.

pub mod rank;
pub mod runner;
pub mod snapshot;
pub mod subperiods;
pub mod summary;

pub use rank::{compare_aspects, group_aspects, prevalent_bodies, rank_aspects, relevance};
pub use runner::{BodyFilter, PeriodPipeline, PipelineError, PipelineOptions};
pub use snapshot::{Snapshot, SnapshotEvaluator, SnapshotStatus};
pub use subperiods::{monthly_buckets, monthly_subperiods};
pub use summary::{
    AggregatedAspect, Occurrence, PeriodSummary, PrevalentBody, SnapshotMeta, SubPeriod,
};
