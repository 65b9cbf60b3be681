use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike, Weekday};
use kairos::config::{ConfigError, ConfigKind, ConfigResolver, MemoryConfigSource};
use kairos::period::{Scope, Tier};
use kairos::sampling::{resolve_anchor, schedule, SamplingProfile, Strategy, YearlyAnchor};
use std::sync::Arc;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_weekly_free_samples_wednesday_and_saturday() {
    let resolver = ConfigResolver::embedded();
    let profile = resolver.sampling(Scope::Weekly, Tier::Free).unwrap();

    // Friday input, anchored back on the Wednesday of that week
    let anchor = resolve_anchor(Scope::Weekly, d(2026, 3, 13), &profile);
    assert_eq!(anchor, d(2026, 3, 11));

    let points = schedule(Scope::Weekly, Tier::Free, anchor, &profile).unwrap();
    let days: Vec<Weekday> = points.iter().map(|p| p.at.weekday()).collect();
    assert_eq!(days, vec![Weekday::Wed, Weekday::Sat]);
    assert!(points.iter().all(|p| p.at.hour() == 12));
    assert_eq!(points[0].label, "wednesday 12:00");
}

#[test]
fn test_every_n_days_respects_max_events() {
    let mut profile = SamplingProfile::new(Strategy::EveryNDays {
        n: 3,
        time: t(9, 0),
        max_events: Some(4),
    });
    profile.horizon_days = Some(31);

    let points = schedule(Scope::Monthly, Tier::Premium, d(2026, 5, 1), &profile).unwrap();
    assert_eq!(points.len(), 4);
    for pair in points.windows(2) {
        assert_eq!(pair[1].at - pair[0].at, Duration::days(3));
    }
    assert_eq!(points[0].label, "slot_1");
}

#[test]
fn test_days_of_month_clips_to_february() {
    let profile = SamplingProfile::new(Strategy::DaysOfMonth {
        days: vec![1, 15, 30, 31],
        time: t(12, 0),
    });
    let points = schedule(Scope::Monthly, Tier::Free, d(2026, 2, 1), &profile).unwrap();
    let days: Vec<u32> = points.iter().map(|p| p.at.day()).collect();
    assert_eq!(days, vec![1, 15, 28]);

    let leap = schedule(Scope::Monthly, Tier::Free, d(2028, 2, 1), &profile).unwrap();
    let days: Vec<u32> = leap.iter().map(|p| p.at.day()).collect();
    assert_eq!(days, vec![1, 15, 29]);
}

#[test]
fn test_configured_late_days_clip_to_month_end() {
    let source = MemoryConfigSource::from_embedded()
        .unwrap()
        .with_str(
            ConfigKind::Sampling,
            "[defaults]\nstrategy = \"days_of_month\"\ndays = [30, 31]\n",
        )
        .unwrap();
    let resolver = ConfigResolver::new(Arc::new(source));
    let profile = resolver.sampling(Scope::Monthly, Tier::Free).unwrap();

    let anchor = resolve_anchor(Scope::Monthly, d(2026, 2, 17), &profile);
    let points = schedule(Scope::Monthly, Tier::Free, anchor, &profile).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].at.date_naive(), d(2026, 2, 28));
}

#[test]
fn test_weekdays_missing_the_window_is_an_error() {
    let source = MemoryConfigSource::from_embedded()
        .unwrap()
        .with_str(
            ConfigKind::Sampling,
            "[defaults]\nstrategy = \"weekdays_times\"\nhorizon_days = 2\nitems = [{ weekday = \"saturday\", time = \"12:00\" }]\n",
        )
        .unwrap();
    let resolver = ConfigResolver::new(Arc::new(source));
    let profile = resolver.sampling(Scope::Weekly, Tier::Free).unwrap();

    let anchor = resolve_anchor(Scope::Weekly, d(2026, 3, 11), &profile);
    let err = schedule(Scope::Weekly, Tier::Free, anchor, &profile).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::EmptySchedule { scope: Scope::Weekly, horizon_days: 2, .. }
    ));
}

#[test]
fn test_monthly_on_day_clamps_to_month_end() {
    let profile = SamplingProfile::new(Strategy::MonthlyOnDay {
        day: 31,
        time: t(12, 0),
    });
    let points = schedule(Scope::Yearly, Tier::Free, d(2026, 1, 1), &profile).unwrap();
    assert_eq!(points.len(), 12);
    assert_eq!(points[1].at.date_naive(), d(2026, 2, 28));
    assert_eq!(points[3].at.date_naive(), d(2026, 4, 30));
    assert_eq!(points[11].at.date_naive(), d(2026, 12, 31));
}

#[test]
fn test_samples_carry_profile_offset() {
    let mut profile = SamplingProfile::new(Strategy::FixedTimes {
        times: vec![t(8, 0)],
    });
    profile.timezone = FixedOffset::east_opt(2 * 3600).unwrap();

    let points = schedule(Scope::Daily, Tier::Free, d(2026, 7, 4), &profile).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].at.offset().local_minus_utc(), 7200);
    assert_eq!(points[0].at.naive_utc().hour(), 6);
}

#[test]
fn test_yearly_anchor_modes() {
    let mut profile = SamplingProfile::new(Strategy::MonthlyOnDay {
        day: 15,
        time: t(12, 0),
    });
    assert_eq!(
        resolve_anchor(Scope::Yearly, d(2031, 6, 9), &profile),
        d(YearlyAnchor::DEFAULT_YEAR, 1, 1)
    );

    profile.yearly_anchor = YearlyAnchor::InputYear;
    assert_eq!(resolve_anchor(Scope::Yearly, d(2031, 6, 9), &profile), d(2031, 1, 1));
}

#[test]
fn test_every_embedded_profile_schedules_in_order() {
    let resolver = ConfigResolver::embedded();
    for scope in Scope::ALL {
        for tier in Tier::ALL {
            let profile = resolver.sampling(scope, tier).unwrap();
            let anchor = resolve_anchor(scope, d(2026, 3, 11), &profile);
            let points = schedule(scope, tier, anchor, &profile).unwrap();
            assert!(!points.is_empty(), "{}/{} has no samples", scope, tier);
            assert!(
                points.windows(2).all(|w| w[0].at < w[1].at),
                "{}/{} is not strictly ascending",
                scope,
                tier
            );
        }
    }
}
