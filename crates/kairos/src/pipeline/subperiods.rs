use crate::aggregate::{aggregate, AggregationMethod, SnapshotWeighting};
use crate::config::ConfigBundle;
use crate::domains::combine_intensities;
use crate::natal::NatalChart;
use crate::pipeline::rank::{group_aspects, prevalent_bodies, rank_aspects};
use crate::pipeline::snapshot::Snapshot;
use crate::pipeline::summary::SubPeriod;
use crate::sampling::days_in_month;
use chrono::{Datelike, Months, NaiveDate};

/// Date ranges a monthly period is split into: days 1-10, 11-20, 21 to the
/// end of the month, and the first week of the next month.
pub fn monthly_buckets(anchor: NaiveDate) -> Vec<(&'static str, NaiveDate, NaiveDate)> {
    let first = anchor.with_day(1).unwrap_or(anchor);
    let last_day = days_in_month(first);
    let mut out = Vec::with_capacity(4);

    for (key, start, end) in [
        ("days_1_10", 1, 10),
        ("days_11_20", 11, 20),
        ("days_21_end", 21, last_day),
    ] {
        if let (Some(s), Some(e)) = (first.with_day(start), first.with_day(end)) {
            out.push((key, s, e));
        }
    }

    if let Some(next) = first.checked_add_months(Months::new(1)) {
        if let Some(end) = next.with_day(7) {
            out.push(("next_month_1_7", next, end));
        }
    }
    out
}

/// Per-bucket summaries of the successful snapshots of a monthly run
pub fn monthly_subperiods(
    anchor: NaiveDate,
    snapshots: &[Snapshot],
    bundle: &ConfigBundle,
    chart: &NatalChart,
) -> Vec<SubPeriod> {
    monthly_buckets(anchor)
        .into_iter()
        .map(|(key, start, end)| {
            let members: Vec<&Snapshot> = snapshots
                .iter()
                .filter(|s| s.is_ok())
                .filter(|s| {
                    let day = s.at.date_naive();
                    day >= start && day <= end
                })
                .collect();

            let domains: Vec<_> = members.iter().map(|s| &s.domains).collect();
            let domain_intensities = combine_intensities(&domains, |values| {
                aggregate(values, AggregationMethod::Mean, SnapshotWeighting::Uniform, 0.0)
            });

            let aspects = rank_aspects(
                group_aspects(
                    members.iter().copied(),
                    bundle.weights.relevance,
                    &bundle.weights.aggregation,
                ),
                bundle.filters.max_aspects,
            );
            let prevalent = prevalent_bodies(
                members.iter().copied(),
                chart,
                bundle.filters.max_prevalent_bodies,
            );

            SubPeriod {
                key: key.to_string(),
                start,
                end,
                snapshot_count: members.len(),
                domain_intensities,
                aspects,
                prevalent_bodies: prevalent,
            }
        })
        .collect()
}
