//! Transit scoring and temporal sampling for natal charts.
//!
//! Given a natal chart, a scope and a tier, the engine picks sample moments,
//! matches transit positions against the chart, scores each aspect and
//! aggregates everything into a [`PeriodSummary`].

pub mod aggregate;
pub mod aspects;
pub mod bodies;
pub mod config;
pub mod domains;
pub mod ephemeris;
pub mod natal;
pub mod period;
pub mod pipeline;
pub mod sampling;
pub mod scoring;

pub use aggregate::{aggregate, snapshot_weights, Aggregation, AggregationMethod, SnapshotWeighting};
pub use aspects::{AspectInstance, AspectMatch, AspectMatcher, AspectType};
pub use bodies::{Body, BodyGroup, BodySet};
pub use config::{ConfigBundle, ConfigError, ConfigKind, ConfigResolver, ConfigSource};
pub use domains::{DomainIntensities, LifeDomain};
pub use ephemeris::{BodyPositions, PositionError, PositionProvider, TablePositionProvider};
pub use natal::{ChartError, HouseClass, HouseCusps, NatalChart, NatalProfile};
pub use period::{Scope, Tier};
pub use pipeline::{BodyFilter, PeriodPipeline, PeriodSummary, PipelineError, PipelineOptions};
pub use sampling::{resolve_anchor, schedule, SamplePoint, SamplingProfile, Strategy, StrategyKind};
pub use scoring::{Falloff, FalloffMode, OrbContext, ScoredAspect, ScoringEngine};
