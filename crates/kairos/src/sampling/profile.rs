use crate::period::Scope;
use chrono::{FixedOffset, NaiveTime, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling strategy names, independent of their parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    FixedTimes,
    WeekdaysTimes,
    DaysOfMonth,
    MonthlyOnDay,
    EveryNDays,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::FixedTimes,
        StrategyKind::WeekdaysTimes,
        StrategyKind::DaysOfMonth,
        StrategyKind::MonthlyOnDay,
        StrategyKind::EveryNDays,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::FixedTimes => "fixed_times",
            StrategyKind::WeekdaysTimes => "weekdays_times",
            StrategyKind::DaysOfMonth => "days_of_month",
            StrategyKind::MonthlyOnDay => "monthly_on_day",
            StrategyKind::EveryNDays => "every_n_days",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// Whether this strategy can sample the given scope
    pub fn supports(&self, scope: Scope) -> bool {
        matches!(
            (self, scope),
            (StrategyKind::FixedTimes, Scope::Daily | Scope::Weekly | Scope::Monthly)
                | (StrategyKind::WeekdaysTimes, Scope::Weekly | Scope::Monthly)
                | (StrategyKind::DaysOfMonth, Scope::Monthly)
                | (StrategyKind::MonthlyOnDay, Scope::Yearly)
                | (StrategyKind::EveryNDays, Scope::Monthly | Scope::Yearly)
        )
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    FixedTimes {
        times: Vec<NaiveTime>,
    },
    WeekdaysTimes {
        items: Vec<(Weekday, NaiveTime)>,
    },
    DaysOfMonth {
        days: Vec<u32>,
        time: NaiveTime,
    },
    MonthlyOnDay {
        day: u32,
        time: NaiveTime,
    },
    EveryNDays {
        n: u32,
        time: NaiveTime,
        /// Falls back to 10 (monthly) or 120 (yearly)
        max_events: Option<u32>,
    },
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::FixedTimes { .. } => StrategyKind::FixedTimes,
            Strategy::WeekdaysTimes { .. } => StrategyKind::WeekdaysTimes,
            Strategy::DaysOfMonth { .. } => StrategyKind::DaysOfMonth,
            Strategy::MonthlyOnDay { .. } => StrategyKind::MonthlyOnDay,
            Strategy::EveryNDays { .. } => StrategyKind::EveryNDays,
        }
    }
}

/// How the yearly scope picks its anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearlyAnchor {
    /// 1 January of a fixed year, whatever the input date
    Fixed { year: i32 },
    /// 1 January of the input date's year
    InputYear,
}

impl YearlyAnchor {
    pub const DEFAULT_YEAR: i32 = 2026;
}

impl Default for YearlyAnchor {
    fn default() -> Self {
        YearlyAnchor::Fixed {
            year: Self::DEFAULT_YEAR,
        }
    }
}

/// Validated sampling config for one (scope, tier)
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingProfile {
    pub strategy: Strategy,
    pub timezone: FixedOffset,
    pub week_start: Weekday,
    /// Time of day for strategies without their own time
    pub anchor_time: NaiveTime,
    pub horizon_days: Option<u32>,
    pub yearly_anchor: YearlyAnchor,
}

impl SamplingProfile {
    /// Upper bound on `horizon_days` and the `every_n_days` stride
    pub const MAX_HORIZON_DAYS: u32 = 3660;

    /// UTC, weeks starting Monday, noon anchor, default horizon
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            timezone: Utc.fix(),
            week_start: Weekday::Mon,
            anchor_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN),
            horizon_days: None,
            yearly_anchor: YearlyAnchor::default(),
        }
    }

    /// Configured horizon or the scope default, within `1..=MAX_HORIZON_DAYS`
    pub fn horizon(&self, scope: Scope) -> u32 {
        self.horizon_days
            .unwrap_or_else(|| scope.default_horizon_days())
            .clamp(1, Self::MAX_HORIZON_DAYS)
    }
}
