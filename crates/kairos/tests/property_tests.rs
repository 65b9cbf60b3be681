use chrono::{FixedOffset, NaiveDate, NaiveTime, Weekday};
use kairos::aggregate::{snapshot_weights, SnapshotWeighting};
use kairos::aspects::{angular_separation, AspectMatcher};
use kairos::bodies::{Body, BodySet};
use kairos::ephemeris::BodyPositions;
use kairos::natal::{NatalChart, NatalProfile, NatalSettings};
use kairos::period::{Scope, Tier};
use kairos::sampling::{schedule, SamplingProfile, Strategy as SampleStrategy};
use kairos::scoring::{Falloff, FalloffMode};
use proptest::prelude::*;

fn falloff_mode() -> impl Strategy<Value = FalloffMode> {
    prop_oneof![
        Just(FalloffMode::Linear),
        Just(FalloffMode::Gaussian),
        Just(FalloffMode::Cosine),
    ]
}

fn time_of_day() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Every strategy paired with a scope it supports
fn sampled_profile() -> impl Strategy<Value = (Scope, SamplingProfile)> {
    let fixed_times = (
        proptest::collection::vec(time_of_day(), 1..5),
        prop::sample::select(vec![Scope::Daily, Scope::Weekly, Scope::Monthly]),
        proptest::option::of(1u32..60),
    )
        .prop_map(|(times, scope, horizon)| (scope, SampleStrategy::FixedTimes { times }, horizon));
    // A full week always holds every weekday
    let weekdays_times = (
        proptest::collection::vec(
            (
                prop::sample::select(vec![
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                    Weekday::Sat,
                    Weekday::Sun,
                ]),
                time_of_day(),
            ),
            1..4,
        ),
        prop::sample::select(vec![Scope::Weekly, Scope::Monthly]),
        7u32..60,
    )
        .prop_map(|(items, scope, horizon)| {
            (scope, SampleStrategy::WeekdaysTimes { items }, Some(horizon))
        });
    let days_of_month = (proptest::collection::vec(1u32..=31, 1..6), time_of_day())
        .prop_map(|(days, time)| (Scope::Monthly, SampleStrategy::DaysOfMonth { days, time }, None));
    let monthly_on_day = (1u32..=31, time_of_day())
        .prop_map(|(day, time)| (Scope::Yearly, SampleStrategy::MonthlyOnDay { day, time }, None));
    let every_n_days = (
        1u32..=SamplingProfile::MAX_HORIZON_DAYS,
        time_of_day(),
        proptest::option::of(1u32..200),
        prop::sample::select(vec![Scope::Monthly, Scope::Yearly]),
        proptest::option::of(1u32..=SamplingProfile::MAX_HORIZON_DAYS),
    )
        .prop_map(|(n, time, max_events, scope, horizon)| {
            (scope, SampleStrategy::EveryNDays { n, time, max_events }, horizon)
        });

    (
        prop_oneof![fixed_times, weekdays_times, days_of_month, monthly_on_day, every_n_days],
        -12i32..=14,
    )
        .prop_map(|((scope, strategy, horizon), offset_hours)| {
            let mut profile = SamplingProfile::new(strategy);
            profile.horizon_days = horizon;
            profile.timezone = FixedOffset::east_opt(offset_hours * 3600).unwrap();
            (scope, profile)
        })
}

proptest! {
    #[test]
    fn schedules_are_non_empty_and_strictly_ascending((scope, profile) in sampled_profile(), anchor in any_date()) {
        let points = schedule(scope, Tier::Free, anchor, &profile).unwrap();
        prop_assert!(!points.is_empty());
        prop_assert!(points.windows(2).all(|w| w[0].at < w[1].at));
        prop_assert!(points.iter().all(|p| !p.label.is_empty()));
    }

    #[test]
    fn falloff_stays_in_unit_range(mode in falloff_mode(), delta in 0.0f64..20.0, orb in 0.1f64..12.0) {
        let v = Falloff::new(mode).value(delta, orb);
        prop_assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn falloff_never_grows_with_distance(mode in falloff_mode(), a in 0.0f64..10.0, b in 0.0f64..10.0, orb in 0.5f64..10.0) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let f = Falloff::new(mode);
        prop_assert!(f.value(near, orb) + 1e-12 >= f.value(far, orb));
    }

    #[test]
    fn separation_is_symmetric_and_bounded(a in 0.0f64..360.0, b in 0.0f64..360.0) {
        let ab = angular_separation(a, b);
        prop_assert!((ab - angular_separation(b, a)).abs() < 1e-9);
        prop_assert!((0.0..=180.0).contains(&ab));
    }

    #[test]
    fn matching_is_symmetric(a in 0.0f64..360.0, b in 0.0f64..360.0) {
        let matcher = AspectMatcher::new();
        let ab = matcher.find(a, b).map(|m| m.aspect_type);
        let ba = matcher.find(b, a).map(|m| m.aspect_type);
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn recency_weights_sum_to_one(n in 1usize..60, lambda in 0.0f64..3.0) {
        let weights = snapshot_weights(n, SnapshotWeighting::RecencyDecay, lambda);
        prop_assert_eq!(weights.len(), n);
        prop_assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn every_n_days_is_strictly_ascending(n in 1u32..15, max in 1u32..40, horizon in 1u32..400, day in 1u32..28) {
        let mut profile = SamplingProfile::new(SampleStrategy::EveryNDays {
            n,
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            max_events: Some(max),
        });
        profile.horizon_days = Some(horizon);
        let anchor = NaiveDate::from_ymd_opt(2026, 1, day).unwrap();

        let points = schedule(Scope::Yearly, Tier::Premium, anchor, &profile).unwrap();
        prop_assert!(!points.is_empty());
        prop_assert!(points.len() <= max as usize);
        prop_assert!(points.windows(2).all(|w| w[0].at < w[1].at));
    }

    #[test]
    fn natal_factors_stay_bounded(lons in proptest::collection::vec(0.0f64..360.0, 11)) {
        let mut positions = BodyPositions::new();
        let bodies = Body::PLANETS.iter().copied().chain([Body::Ascendant]);
        for (body, lon) in bodies.zip(lons) {
            positions.try_insert(body, lon).unwrap();
        }
        let chart = NatalChart::with_equal_houses(positions).unwrap();
        let settings = NatalSettings::default();
        let profile = NatalProfile::derive(&chart, &AspectMatcher::new(), &settings);

        let expected: BodySet = chart.positions().bodies();
        prop_assert_eq!(profile.factors().keys().copied().collect::<BodySet>(), expected);
        for factor in profile.factors().values() {
            prop_assert!(*factor >= 1.0 && *factor <= settings.max_factor);
        }
    }
}
