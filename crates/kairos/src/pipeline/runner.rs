use crate::aspects::AspectMatcher;
use crate::bodies::BodySet;
use crate::config::{ConfigError, ConfigResolver};
use crate::domains::combine_intensities;
use crate::ephemeris::{PositionError, PositionProvider};
use crate::natal::{NatalChart, NatalProfile};
use crate::period::{Scope, Tier};
use crate::pipeline::rank::{group_aspects, prevalent_bodies, rank_aspects};
use crate::pipeline::snapshot::{Snapshot, SnapshotEvaluator};
use crate::pipeline::subperiods::monthly_subperiods;
use crate::pipeline::summary::{PeriodSummary, SnapshotMeta};
use crate::sampling::{resolve_anchor, schedule, SamplePoint};
use crate::scoring::ScoringEngine;
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Upper bound for one position lookup
    pub position_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            position_timeout: Duration::from_secs(5),
        }
    }
}

/// Per-request body restriction, intersected with the configured sets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyFilter {
    pub transit: Option<BodySet>,
    pub natal: Option<BodySet>,
}

impl BodyFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn transit(bodies: BodySet) -> Self {
        Self {
            transit: Some(bodies),
            natal: None,
        }
    }

    fn apply(configured: BodySet, requested: &Option<BodySet>) -> BodySet {
        match requested {
            Some(requested) => configured.intersection(requested).copied().collect(),
            None => configured,
        }
    }
}

/// Runs one (scope, tier) period for a natal chart
pub struct PeriodPipeline {
    resolver: Arc<ConfigResolver>,
    provider: Arc<dyn PositionProvider>,
    options: PipelineOptions,
}

impl PeriodPipeline {
    pub fn new(resolver: Arc<ConfigResolver>, provider: Arc<dyn PositionProvider>) -> Self {
        Self::with_options(resolver, provider, PipelineOptions::default())
    }

    pub fn with_options(
        resolver: Arc<ConfigResolver>,
        provider: Arc<dyn PositionProvider>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            resolver,
            provider,
            options,
        }
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    /// Sample, score and aggregate one period.
    ///
    /// Position failures only skip the affected snapshot; config errors abort.
    pub async fn run(
        &self,
        scope: Scope,
        tier: Tier,
        chart: &NatalChart,
        input_date: NaiveDate,
        filter: &BodyFilter,
    ) -> Result<PeriodSummary, PipelineError> {
        let bundle = self.resolver.resolve_bundle(scope, tier)?;

        let anchor = resolve_anchor(scope, input_date, &bundle.sampling);
        let points = schedule(scope, tier, anchor, &bundle.sampling)?;
        info!(
            "Running {}/{} period anchored on {} with {} samples ({} provider)",
            scope,
            tier,
            anchor,
            points.len(),
            self.provider.name()
        );

        let matcher = AspectMatcher::with_max_orbs(&bundle.orbs.match_overrides);
        let profile = NatalProfile::derive(chart, &matcher, &bundle.weights.natal);
        let evaluator = Arc::new(SnapshotEvaluator {
            matcher,
            engine: ScoringEngine::from_bundle(&bundle),
            chart: chart.clone(),
            profile: profile.clone(),
            transit_bodies: BodyFilter::apply(
                bundle
                    .weights
                    .weighted_transit_bodies(bundle.filters.include.transit_bodies()),
                &filter.transit,
            ),
            natal_bodies: BodyFilter::apply(bundle.filters.include.natal_bodies(), &filter.natal),
        });

        let snapshots = self.collect_snapshots(&points, &evaluator).await;
        let skipped = snapshots.iter().filter(|s| !s.is_ok()).count();
        if skipped > 0 {
            warn!("{} of {} snapshots skipped for {}/{}", skipped, snapshots.len(), scope, tier);
        }

        let aspects = rank_aspects(
            group_aspects(&snapshots, bundle.weights.relevance, &bundle.weights.aggregation),
            bundle.filters.max_aspects,
        );

        let ok_domains: Vec<_> = snapshots
            .iter()
            .filter(|s| s.is_ok())
            .map(|s| &s.domains)
            .collect();
        let domain_intensities =
            combine_intensities(&ok_domains, |values| bundle.weights.aggregation.apply(values));

        let prevalent = prevalent_bodies(&snapshots, chart, bundle.filters.max_prevalent_bodies);

        let subperiods = match scope {
            Scope::Monthly => Some(monthly_subperiods(anchor, &snapshots, &bundle, chart)),
            _ => None,
        };

        Ok(PeriodSummary {
            scope,
            tier,
            input_date,
            anchor_date: anchor,
            snapshots: snapshots.iter().map(SnapshotMeta::from).collect(),
            skipped_snapshots: skipped,
            aspects,
            domain_intensities,
            prevalent_bodies: prevalent,
            natal_profile: profile,
            subperiods,
        })
    }

    /// Evaluate every sample concurrently; the result is ordered by index
    async fn collect_snapshots(
        &self,
        points: &[SamplePoint],
        evaluator: &Arc<SnapshotEvaluator>,
    ) -> Vec<Snapshot> {
        let mut tasks = JoinSet::new();
        for (index, point) in points.iter().cloned().enumerate() {
            let provider = Arc::clone(&self.provider);
            let evaluator = Arc::clone(evaluator);
            let timeout = self.options.position_timeout;
            tasks.spawn(async move {
                let at = point.at.with_timezone(&Utc);
                let lookup = tokio::time::timeout(
                    timeout,
                    provider.get_positions(at, &evaluator.transit_bodies),
                )
                .await;
                let snapshot = match lookup {
                    Ok(Ok(positions)) if positions.is_empty() => {
                        warn!("Skipping snapshot {} ({}): no positions returned", index, point.at);
                        Snapshot::skipped(index, &point, "no positions returned")
                    }
                    Ok(Ok(positions)) => evaluator.evaluate(index, &point, positions),
                    Ok(Err(err)) => {
                        warn!("Skipping snapshot {} ({}): {}", index, point.at, err);
                        Snapshot::skipped(index, &point, err.to_string())
                    }
                    Err(_) => {
                        let err = PositionError::Timeout {
                            datetime: at,
                            timeout_ms: timeout.as_millis(),
                        };
                        warn!("Skipping snapshot {} ({}): {}", index, point.at, err);
                        Snapshot::skipped(index, &point, err.to_string())
                    }
                };
                debug!(
                    "Snapshot {} [{}] {:?} with {} scored aspects",
                    index,
                    snapshot.label,
                    snapshot.status,
                    snapshot.aspects.len()
                );
                snapshot
            });
        }

        let mut slots: Vec<Option<Snapshot>> = vec![None; points.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(snapshot) => {
                    let index = snapshot.index;
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(snapshot);
                    }
                }
                Err(err) => warn!("Snapshot task failed: {}", err),
            }
        }

        slots
            .into_iter()
            .zip(points)
            .enumerate()
            .map(|(index, (slot, point))| {
                slot.unwrap_or_else(|| Snapshot::skipped(index, point, "snapshot task failed"))
            })
            .collect()
    }
}
