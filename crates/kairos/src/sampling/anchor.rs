use crate::period::Scope;
use crate::sampling::profile::{SamplingProfile, YearlyAnchor};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use log::warn;

/// First day of the calendar week containing `date`
pub fn week_start_date(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = (date.weekday().num_days_from_monday() as i64
        - week_start.num_days_from_monday() as i64)
        .rem_euclid(7);
    date.checked_sub_days(Days::new(back as u64)).unwrap_or(date)
}

/// Date a period is anchored on.
///
/// Weekly periods anchor on the Wednesday of the calendar week, monthly
/// periods on the first of the month. Yearly periods anchor on 1 January of a
/// fixed year unless the profile asks for the input year.
pub fn resolve_anchor(scope: Scope, date: NaiveDate, profile: &SamplingProfile) -> NaiveDate {
    match scope {
        Scope::Daily => date,
        Scope::Weekly => {
            let start = week_start_date(date, profile.week_start);
            let offset = (Weekday::Wed.num_days_from_monday() as i64
                - profile.week_start.num_days_from_monday() as i64)
                .rem_euclid(7);
            start.checked_add_days(Days::new(offset as u64)).unwrap_or(start)
        }
        Scope::Monthly => date.with_day(1).unwrap_or(date),
        Scope::Yearly => match profile.yearly_anchor {
            YearlyAnchor::Fixed { year } => {
                if year != date.year() {
                    warn!(
                        "Yearly period anchored on {}-01-01, ignoring input date {}",
                        year, date
                    );
                }
                NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(date)
            }
            YearlyAnchor::InputYear => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::profile::Strategy;

    fn profile() -> SamplingProfile {
        SamplingProfile::new(Strategy::FixedTimes { times: vec![] })
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weekly_anchor_is_wednesday() {
        let p = profile();
        // 2026-03-09 is a Monday, 2026-03-15 a Sunday
        assert_eq!(resolve_anchor(Scope::Weekly, d(2026, 3, 9), &p), d(2026, 3, 11));
        assert_eq!(resolve_anchor(Scope::Weekly, d(2026, 3, 11), &p), d(2026, 3, 11));
        assert_eq!(resolve_anchor(Scope::Weekly, d(2026, 3, 15), &p), d(2026, 3, 11));
    }

    #[test]
    fn test_weekly_anchor_sunday_start() {
        let mut p = profile();
        p.week_start = Weekday::Sun;
        // Week of Sunday 2026-03-15 runs through Saturday 2026-03-21
        assert_eq!(resolve_anchor(Scope::Weekly, d(2026, 3, 15), &p), d(2026, 3, 18));
        assert_eq!(resolve_anchor(Scope::Weekly, d(2026, 3, 14), &p), d(2026, 3, 11));
    }

    #[test]
    fn test_monthly_and_daily_anchor() {
        let p = profile();
        assert_eq!(resolve_anchor(Scope::Monthly, d(2026, 2, 17), &p), d(2026, 2, 1));
        assert_eq!(resolve_anchor(Scope::Daily, d(2026, 2, 17), &p), d(2026, 2, 17));
    }

    #[test]
    fn test_yearly_anchor_fixed_and_input_year() {
        let mut p = profile();
        assert_eq!(resolve_anchor(Scope::Yearly, d(2031, 7, 4), &p), d(2026, 1, 1));
        p.yearly_anchor = YearlyAnchor::InputYear;
        assert_eq!(resolve_anchor(Scope::Yearly, d(2031, 7, 4), &p), d(2031, 1, 1));
    }
}
