use crate::aspects::AspectType;
use crate::bodies::Body;
use crate::domains::DomainIntensities;
use crate::natal::NatalProfile;
use crate::period::{Scope, Tier};
use crate::pipeline::snapshot::{Snapshot, SnapshotStatus};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

/// One appearance of an aspect in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occurrence {
    pub at: DateTime<FixedOffset>,
    pub orb: f64,
    pub score: f64,
}

/// Scored aspects sharing (transit, natal, type) across a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedAspect {
    pub transit: Body,
    pub natal: Body,
    pub aspect_type: AspectType,
    pub relevance_score: f64,
    pub occurrence_count: usize,
    pub min_orb: f64,
    pub mean_orb: f64,
    pub first_occurrence: DateTime<FixedOffset>,
    pub occurrences: Vec<Occurrence>,
}

/// Transit body ranked by its total score over a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrevalentBody {
    pub body: Body,
    pub score: f64,
    pub max_natal_factor: f64,
    pub first_significant: DateTime<FixedOffset>,
    /// Natal house of the transit longitude at `first_significant`
    pub natal_house: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotMeta {
    pub index: usize,
    pub label: String,
    pub at: DateTime<FixedOffset>,
    pub status: SnapshotStatus,
    pub aspect_count: usize,
    pub domain_intensities: DomainIntensities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Snapshot> for SnapshotMeta {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            index: snapshot.index,
            label: snapshot.label.clone(),
            at: snapshot.at,
            status: snapshot.status,
            aspect_count: snapshot.aspects.len(),
            domain_intensities: snapshot.domains.clone(),
            error: snapshot.error.clone(),
        }
    }
}

/// Slice of a monthly period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubPeriod {
    pub key: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub snapshot_count: usize,
    pub domain_intensities: DomainIntensities,
    pub aspects: Vec<AggregatedAspect>,
    pub prevalent_bodies: Vec<PrevalentBody>,
}

/// Everything a period run returns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub scope: Scope,
    pub tier: Tier,
    pub input_date: NaiveDate,
    pub anchor_date: NaiveDate,
    pub snapshots: Vec<SnapshotMeta>,
    pub skipped_snapshots: usize,
    pub aspects: Vec<AggregatedAspect>,
    pub domain_intensities: DomainIntensities,
    pub prevalent_bodies: Vec<PrevalentBody>,
    pub natal_profile: NatalProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subperiods: Option<Vec<SubPeriod>>,
}

impl PeriodSummary {
    /// Keep at most `limit` ranked aspects, also inside sub-periods
    pub fn truncate_aspects(&mut self, limit: usize) {
        self.aspects.truncate(limit);
        if let Some(subperiods) = self.subperiods.as_mut() {
            for sub in subperiods {
                sub.aspects.truncate(limit);
            }
        }
    }
}
