use crate::aspects::AspectMatcher;
use crate::bodies::BodySet;
use crate::domains::{domain_intensities, DomainIntensities};
use crate::ephemeris::BodyPositions;
use crate::natal::{NatalChart, NatalProfile};
use crate::sampling::SamplePoint;
use crate::scoring::{OrbContext, ScoredAspect, ScoringEngine};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Ok,
    /// Positions could not be obtained; contributes nothing
    Skipped,
}

/// One sampled moment with its scored aspects
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub index: usize,
    pub at: DateTime<FixedOffset>,
    pub label: String,
    pub positions: Option<BodyPositions>,
    /// Only aspects with a positive score
    pub aspects: Vec<ScoredAspect>,
    pub domains: DomainIntensities,
    pub status: SnapshotStatus,
    pub error: Option<String>,
}

impl Snapshot {
    pub fn skipped(index: usize, point: &SamplePoint, error: impl Into<String>) -> Self {
        Self {
            index,
            at: point.at,
            label: point.label.clone(),
            positions: None,
            aspects: Vec::new(),
            domains: DomainIntensities::new(),
            status: SnapshotStatus::Skipped,
            error: Some(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == SnapshotStatus::Ok
    }
}

/// Read-only state shared by every snapshot task of a run
#[derive(Debug, Clone)]
pub struct SnapshotEvaluator {
    pub matcher: AspectMatcher,
    pub engine: ScoringEngine,
    pub chart: NatalChart,
    pub profile: NatalProfile,
    pub transit_bodies: BodySet,
    pub natal_bodies: BodySet,
}

impl SnapshotEvaluator {
    /// Match, score and measure one set of transit positions
    pub fn evaluate(&self, index: usize, point: &SamplePoint, positions: BodyPositions) -> Snapshot {
        let positions = positions.restricted_to(&self.transit_bodies);
        let matches = self.matcher.transit_aspects(
            &positions,
            self.chart.positions(),
            &self.transit_bodies,
            &self.natal_bodies,
        );

        let aspects: Vec<ScoredAspect> = matches
            .iter()
            .filter_map(|instance| {
                let transit_lon = positions.get(instance.transit)?;
                let house_class = self.chart.house_class_of(transit_lon);
                let scored = self.engine.score_with_natal(
                    instance,
                    transit_lon,
                    OrbContext::Transit,
                    house_class,
                    &self.profile,
                );
                (scored.score > 0.0).then_some(scored)
            })
            .collect();

        let domains = domain_intensities(&matches, &self.matcher);

        Snapshot {
            index,
            at: point.at,
            label: point.label.clone(),
            positions: Some(positions),
            aspects,
            domains,
            status: SnapshotStatus::Ok,
            error: None,
        }
    }
}
