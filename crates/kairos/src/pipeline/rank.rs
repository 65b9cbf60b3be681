use crate::aggregate::Aggregation;
use crate::aspects::AspectType;
use crate::bodies::Body;
use crate::config::RelevanceMode;
use crate::natal::NatalChart;
use crate::pipeline::snapshot::Snapshot;
use crate::pipeline::summary::{AggregatedAspect, Occurrence, PrevalentBody};
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;
use std::collections::BTreeMap;

const PEAK_WEIGHT: f64 = 0.7;
const MEAN_WEIGHT: f64 = 0.3;
const REPEAT_BONUS: f64 = 0.15;
const MAX_REPEATS: usize = 3;

/// Relevance of one grouped aspect from its ordered occurrences
pub fn relevance(occurrences: &[Occurrence], mode: RelevanceMode, aggregation: &Aggregation) -> f64 {
    if occurrences.is_empty() {
        return 0.0;
    }
    let scores: Vec<f64> = occurrences.iter().map(|o| o.score).collect();
    match mode {
        RelevanceMode::Aggregate => aggregation.apply(&scores),
        RelevanceMode::PeakBlend => {
            let peak = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            let min_orb = occurrences
                .iter()
                .map(|o| o.orb)
                .fold(f64::INFINITY, f64::min);
            let repeats = (occurrences.len() - 1).min(MAX_REPEATS) as f64;
            (PEAK_WEIGHT * peak + MEAN_WEIGHT * mean)
                * (1.0 / (1.0 + min_orb))
                * (1.0 + REPEAT_BONUS * repeats)
        }
    }
}

/// Group the scored aspects of successful snapshots by (transit, natal, type).
///
/// Snapshots must be ordered by time; occurrences keep that order.
pub fn group_aspects<'a, I>(
    snapshots: I,
    mode: RelevanceMode,
    aggregation: &Aggregation,
) -> Vec<AggregatedAspect>
where
    I: IntoIterator<Item = &'a Snapshot>,
{
    let mut groups: BTreeMap<(Body, Body, AspectType), Vec<Occurrence>> = BTreeMap::new();
    for snapshot in snapshots.into_iter().filter(|s| s.is_ok()) {
        for aspect in &snapshot.aspects {
            groups.entry(aspect.key()).or_default().push(Occurrence {
                at: snapshot.at,
                orb: aspect.orb,
                score: aspect.score,
            });
        }
    }

    groups
        .into_iter()
        .filter_map(|((transit, natal, aspect_type), occurrences)| {
            let first = occurrences.first()?.at;
            let count = occurrences.len();
            let min_orb = occurrences.iter().map(|o| o.orb).fold(f64::INFINITY, f64::min);
            let mean_orb = occurrences.iter().map(|o| o.orb).sum::<f64>() / count as f64;
            Some(AggregatedAspect {
                transit,
                natal,
                aspect_type,
                relevance_score: relevance(&occurrences, mode, aggregation),
                occurrence_count: count,
                min_orb,
                mean_orb,
                first_occurrence: first,
                occurrences,
            })
        })
        .collect()
}

/// Relevance desc, then aspect priority, tighter orb, transit body, natal body
pub fn compare_aspects(a: &AggregatedAspect, b: &AggregatedAspect) -> Ordering {
    b.relevance_score
        .total_cmp(&a.relevance_score)
        .then(a.aspect_type.cmp(&b.aspect_type))
        .then(a.min_orb.total_cmp(&b.min_orb))
        .then(a.transit.cmp(&b.transit))
        .then(a.natal.cmp(&b.natal))
}

pub fn rank_aspects(mut aspects: Vec<AggregatedAspect>, limit: usize) -> Vec<AggregatedAspect> {
    aspects.sort_by(compare_aspects);
    aspects.truncate(limit);
    aspects
}

struct BodyTally {
    score: f64,
    max_natal_factor: f64,
    first: DateTime<FixedOffset>,
    first_longitude: f64,
}

/// Transit bodies ranked by the sum of their aspect scores
pub fn prevalent_bodies<'a, I>(snapshots: I, chart: &NatalChart, limit: usize) -> Vec<PrevalentBody>
where
    I: IntoIterator<Item = &'a Snapshot>,
{
    let mut tallies: BTreeMap<Body, BodyTally> = BTreeMap::new();
    for snapshot in snapshots.into_iter().filter(|s| s.is_ok()) {
        for aspect in snapshot.aspects.iter().filter(|a| a.score > 0.0) {
            let tally = tallies.entry(aspect.transit).or_insert(BodyTally {
                score: 0.0,
                max_natal_factor: aspect.natal_factor,
                first: snapshot.at,
                first_longitude: aspect.transit_longitude,
            });
            tally.score += aspect.score;
            tally.max_natal_factor = tally.max_natal_factor.max(aspect.natal_factor);
        }
    }

    let mut bodies: Vec<PrevalentBody> = tallies
        .into_iter()
        .map(|(body, tally)| PrevalentBody {
            body,
            score: tally.score,
            max_natal_factor: tally.max_natal_factor,
            first_significant: tally.first,
            natal_house: chart.house_of(tally.first_longitude),
        })
        .collect();
    bodies.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.body.cmp(&b.body)));
    bodies.truncate(limit);
    bodies
}
