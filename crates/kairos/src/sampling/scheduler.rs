use crate::config::ConfigError;
use crate::period::{Scope, Tier};
use crate::sampling::profile::{SamplingProfile, Strategy};
use chrono::{
    DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveTime, TimeZone, Weekday,
};
use log::debug;
use serde::Serialize;

/// One moment to sample, in the profile's timezone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamplePoint {
    pub at: DateTime<FixedOffset>,
    pub label: String,
}

const DEFAULT_MAX_EVENTS_MONTHLY: u32 = 10;
const DEFAULT_MAX_EVENTS_YEARLY: u32 = 120;

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        None => 31,
    }
}

/// Sample points for one period, strictly ascending, duplicate-free and
/// non-empty.
///
/// `anchor` is the already resolved anchor date (see
/// [`resolve_anchor`](crate::sampling::resolve_anchor)). A profile whose
/// window holds no sample, such as `weekdays_times` over a horizon that
/// misses every listed weekday, fails with [`ConfigError::EmptySchedule`].
pub fn schedule(
    scope: Scope,
    tier: Tier,
    anchor: NaiveDate,
    profile: &SamplingProfile,
) -> Result<Vec<SamplePoint>, ConfigError> {
    let kind = profile.strategy.kind();
    if !kind.supports(scope) {
        return Err(ConfigError::UnsupportedStrategy {
            strategy: kind,
            scope,
        });
    }

    let horizon = profile.horizon(scope);
    let window_end = anchor
        .checked_add_days(Days::new(u64::from(horizon) - 1))
        .unwrap_or(NaiveDate::MAX);
    let window = || {
        anchor
            .iter_days()
            .take_while(move |d| *d <= window_end)
    };

    let mut local: Vec<(NaiveDate, NaiveTime)> = Vec::new();
    match &profile.strategy {
        Strategy::FixedTimes { times } => {
            if scope == Scope::Daily {
                local.extend(times.iter().map(|t| (anchor, *t)));
            } else {
                for date in window() {
                    local.extend(times.iter().map(|t| (date, *t)));
                }
            }
        }
        Strategy::WeekdaysTimes { items } => {
            for date in window() {
                for (weekday, time) in items {
                    if date.weekday() == *weekday {
                        local.push((date, *time));
                    }
                }
            }
        }
        Strategy::DaysOfMonth { days, time } => {
            let month_len = days_in_month(anchor);
            for day in days {
                if let Some(date) = anchor.with_day((*day).clamp(1, month_len)) {
                    local.push((date, *time));
                }
            }
        }
        Strategy::MonthlyOnDay { day, time } => {
            let first = anchor.with_day(1).unwrap_or(anchor);
            for i in 0..12 {
                let Some(month_start) = first.checked_add_months(Months::new(i)) else {
                    break;
                };
                let clamped = (*day).clamp(1, days_in_month(month_start));
                if let Some(date) = month_start.with_day(clamped) {
                    local.push((date, *time));
                }
            }
        }
        Strategy::EveryNDays {
            n,
            time,
            max_events,
        } => {
            let max_events = max_events.unwrap_or(match scope {
                Scope::Yearly => DEFAULT_MAX_EVENTS_YEARLY,
                _ => DEFAULT_MAX_EVENTS_MONTHLY,
            });
            let stride = Days::new(u64::from((*n).max(1)));
            let mut date = anchor;
            let mut count = 0;
            while date <= window_end && count < max_events {
                local.push((date, *time));
                count += 1;
                match date.checked_add_days(stride) {
                    Some(next) => date = next,
                    None => break,
                }
            }
        }
    }

    let mut stamps: Vec<DateTime<FixedOffset>> = local
        .into_iter()
        .filter_map(|(date, time)| {
            profile
                .timezone
                .from_local_datetime(&date.and_time(time))
                .single()
        })
        .collect();
    stamps.sort();
    stamps.dedup();
    if stamps.is_empty() {
        return Err(ConfigError::EmptySchedule {
            strategy: kind,
            scope,
            anchor,
            horizon_days: horizon,
        });
    }

    let points: Vec<SamplePoint> = stamps
        .into_iter()
        .enumerate()
        .map(|(i, at)| SamplePoint {
            label: label_for(scope, i, &at),
            at,
        })
        .collect();

    debug!(
        "Scheduled {} samples for {}/{} from {} ({})",
        points.len(),
        scope,
        tier,
        anchor,
        kind
    );
    Ok(points)
}

fn label_for(scope: Scope, index: usize, at: &DateTime<FixedOffset>) -> String {
    match scope {
        Scope::Daily => at.format("%H:%M").to_string(),
        Scope::Weekly => format!("{} {}", weekday_name(at.weekday()), at.format("%H:%M")),
        Scope::Monthly | Scope::Yearly => format!("slot_{}", index + 1),
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
