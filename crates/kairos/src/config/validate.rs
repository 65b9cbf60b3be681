//! Turning effective config trees into typed config.
//!
//! One validator per [`ConfigKind`]. Every failure names the offending key
//! with its dotted path.

use crate::aggregate::{AggregationMethod, SnapshotWeighting};
use crate::aspects::AspectType;
use crate::bodies::{Body, BodyGroup, BodySet};
use crate::config::types::{
    BodyInclusion, FilterConfig, OrbConfig, PresentationConfig, RelevanceMode, Theme,
    WeightConfig,
};
use crate::config::{ConfigError, ConfigKind};
use crate::natal::{HouseClass, NatalSettings};
use crate::period::Scope;
use crate::sampling::{SamplingProfile, Strategy, StrategyKind, YearlyAnchor};
use crate::scoring::FalloffMode;
use chrono::{FixedOffset, NaiveTime, Weekday};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use toml::{Table, Value};

lazy_static::lazy_static! {
    static ref HHMM: Regex = Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("valid regex");
    static ref UTC_OFFSET: Regex = Regex::new(r"^([+-])(\d{2}):([0-5]\d)$").expect("valid regex");
}

/// Parse a strict 24-hour `HH:MM` time
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let caps = HHMM.captures(value.trim())?;
    let hours = caps[1].parse().ok()?;
    let minutes = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// `UTC`, `Z` or a `+HH:MM` / `-HH:MM` offset
pub fn parse_timezone(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("utc") || value == "Z" {
        return FixedOffset::east_opt(0);
    }
    let caps = UTC_OFFSET.captures(value)?;
    let hours: i32 = caps[2].parse().ok()?;
    let minutes: i32 = caps[3].parse().ok()?;
    if hours > 14 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    if &caps[1] == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}

fn allowed<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A table being validated, with its dotted path for error messages
pub(crate) struct Section<'a> {
    kind: ConfigKind,
    table: &'a Table,
    path: String,
}

impl<'a> Section<'a> {
    pub(crate) fn root(kind: ConfigKind, table: &'a Table) -> Self {
        Self {
            kind,
            table,
            path: String::new(),
        }
    }

    fn key(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn missing(&self, name: &str) -> ConfigError {
        ConfigError::MissingKey {
            kind: self.kind,
            key: self.key(name),
        }
    }

    fn invalid_type(&self, name: &str, expected: &'static str, found: &Value) -> ConfigError {
        ConfigError::InvalidType {
            kind: self.kind,
            key: self.key(name),
            expected,
            found: found.type_str().to_string(),
        }
    }

    fn out_of_range(&self, name: &str, value: impl ToString, expected: &str) -> ConfigError {
        ConfigError::OutOfRange {
            kind: self.kind,
            key: self.key(name),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    fn unknown(&self, name: &str, value: &str, allowed: String) -> ConfigError {
        ConfigError::UnknownValue {
            kind: self.kind,
            key: self.key(name),
            value: value.to_string(),
            allowed,
        }
    }

    fn child(&self, name: &str, table: &'a Table) -> Section<'a> {
        Section {
            kind: self.kind,
            table,
            path: self.key(name),
        }
    }

    fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.table.iter()
    }

    fn opt_value(&self, name: &str) -> Option<&'a Value> {
        self.table.get(name)
    }

    fn number(&self, name: &str, value: &Value) -> Result<f64, ConfigError> {
        let number = match value {
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            other => return Err(self.invalid_type(name, "a number", other)),
        };
        if !number.is_finite() {
            return Err(self.out_of_range(name, number, "a finite number"));
        }
        Ok(number)
    }

    fn opt_f64(&self, name: &str) -> Result<Option<f64>, ConfigError> {
        self.opt_value(name)
            .map(|v| self.number(name, v))
            .transpose()
    }

    fn opt_u32(&self, name: &str) -> Result<Option<u32>, ConfigError> {
        match self.opt_value(name) {
            None => Ok(None),
            Some(Value::Integer(i)) => u32::try_from(*i)
                .map(Some)
                .map_err(|_| self.out_of_range(name, i, "a non-negative integer")),
            Some(other) => Err(self.invalid_type(name, "an integer", other)),
        }
    }

    fn req_u32(&self, name: &str) -> Result<u32, ConfigError> {
        self.opt_u32(name)?.ok_or_else(|| self.missing(name))
    }

    /// Optional integer that must be > 0
    fn opt_positive_u32(&self, name: &str) -> Result<Option<u32>, ConfigError> {
        match self.opt_u32(name)? {
            Some(0) => Err(self.out_of_range(name, 0, "> 0")),
            other => Ok(other),
        }
    }

    fn opt_str(&self, name: &str) -> Result<Option<&'a str>, ConfigError> {
        match self.opt_value(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.invalid_type(name, "a string", other)),
        }
    }

    fn req_str(&self, name: &str) -> Result<&'a str, ConfigError> {
        self.opt_str(name)?.ok_or_else(|| self.missing(name))
    }

    fn opt_bool(&self, name: &str) -> Result<Option<bool>, ConfigError> {
        match self.opt_value(name) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(*b)),
            Some(other) => Err(self.invalid_type(name, "a boolean", other)),
        }
    }

    fn opt_table(&self, name: &str) -> Result<Option<Section<'a>>, ConfigError> {
        match self.opt_value(name) {
            None => Ok(None),
            Some(Value::Table(t)) => Ok(Some(self.child(name, t))),
            Some(other) => Err(self.invalid_type(name, "a table", other)),
        }
    }

    fn req_table(&self, name: &str) -> Result<Section<'a>, ConfigError> {
        self.opt_table(name)?.ok_or_else(|| self.missing(name))
    }

    fn opt_array(&self, name: &str) -> Result<Option<&'a Vec<Value>>, ConfigError> {
        match self.opt_value(name) {
            None => Ok(None),
            Some(Value::Array(a)) => Ok(Some(a)),
            Some(other) => Err(self.invalid_type(name, "an array", other)),
        }
    }

    fn req_array(&self, name: &str) -> Result<&'a Vec<Value>, ConfigError> {
        self.opt_array(name)?.ok_or_else(|| self.missing(name))
    }

    fn non_empty_array(&self, name: &str) -> Result<&'a Vec<Value>, ConfigError> {
        let array = self.req_array(name)?;
        if array.is_empty() {
            return Err(self.out_of_range(name, "[]", "at least one entry"));
        }
        Ok(array)
    }

    fn string_item<'v>(&self, name: &str, value: &'v Value) -> Result<&'v str, ConfigError> {
        value
            .as_str()
            .ok_or_else(|| self.invalid_type(name, "an array of strings", value))
    }

    fn time(&self, name: &str, value: &str) -> Result<NaiveTime, ConfigError> {
        parse_hhmm(value).ok_or_else(|| ConfigError::MalformedTime {
            kind: self.kind,
            key: self.key(name),
            value: value.to_string(),
        })
    }

    fn opt_time(&self, name: &str) -> Result<Option<NaiveTime>, ConfigError> {
        self.opt_str(name)?.map(|s| self.time(name, s)).transpose()
    }

    fn weekday(&self, name: &str, value: &str) -> Result<Weekday, ConfigError> {
        value.trim().parse::<Weekday>().map_err(|_| {
            self.unknown(
                name,
                value,
                "monday, tuesday, wednesday, thursday, friday, saturday, sunday".to_string(),
            )
        })
    }

    fn aspect_type(&self, name: &str, value: &str) -> Result<AspectType, ConfigError> {
        AspectType::parse(value)
            .ok_or_else(|| self.unknown(name, value, allowed(AspectType::ALL.iter().map(|t| t.as_str()))))
    }

    fn body(&self, name: &str, value: &str) -> Result<Body, ConfigError> {
        value
            .parse::<Body>()
            .map_err(|_| self.unknown(name, value, allowed(Body::ALL.iter().map(|b| b.as_str()))))
    }

    /// Table of aspect name -> number, every value checked by `check`
    fn aspect_map(
        &self,
        check: fn(f64) -> bool,
        expected: &str,
    ) -> Result<BTreeMap<AspectType, f64>, ConfigError> {
        let mut out = BTreeMap::new();
        for (key, value) in self.entries() {
            let aspect_type = self.aspect_type(key, key)?;
            let number = self.number(key, value)?;
            if !check(number) {
                return Err(self.out_of_range(key, number, expected));
            }
            out.insert(aspect_type, number);
        }
        Ok(out)
    }

    fn group_map(
        &self,
        check: fn(f64) -> bool,
        expected: &str,
    ) -> Result<BTreeMap<BodyGroup, f64>, ConfigError> {
        let mut out = BTreeMap::new();
        for (key, value) in self.entries() {
            let group = BodyGroup::parse(key).ok_or_else(|| {
                self.unknown(key, key, allowed(BodyGroup::ALL.iter().map(|g| g.as_str())))
            })?;
            let number = self.number(key, value)?;
            if !check(number) {
                return Err(self.out_of_range(key, number, expected));
            }
            out.insert(group, number);
        }
        Ok(out)
    }

    fn require_non_empty(&self) -> Result<(), ConfigError> {
        if self.table.is_empty() {
            return Err(ConfigError::OutOfRange {
                kind: self.kind,
                key: self.path.clone(),
                value: "{}".to_string(),
                expected: "at least one entry".to_string(),
            });
        }
        Ok(())
    }
}

fn non_negative(v: f64) -> bool {
    v >= 0.0
}

fn positive(v: f64) -> bool {
    v > 0.0
}

fn check_f64(
    section: &Section<'_>,
    name: &str,
    value: Option<f64>,
    default: f64,
    check: fn(f64) -> bool,
    expected: &str,
) -> Result<f64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) if check(v) => Ok(v),
        Some(v) => Err(section.out_of_range(name, v, expected)),
    }
}

/// Validate the `sampling` tree for one scope
pub fn validate_sampling(tree: &Table, scope: Scope) -> Result<SamplingProfile, ConfigError> {
    let root = Section::root(ConfigKind::Sampling, tree);

    let timezone = match root.opt_str("timezone")? {
        None => FixedOffset::east_opt(0).ok_or_else(|| ConfigError::MalformedTimezone {
            kind: ConfigKind::Sampling,
            value: "UTC".to_string(),
        })?,
        Some(tz) => parse_timezone(tz).ok_or_else(|| ConfigError::MalformedTimezone {
            kind: ConfigKind::Sampling,
            value: tz.to_string(),
        })?,
    };

    let week_start = match root.opt_str("week_start")? {
        None => Weekday::Mon,
        Some(s) => root.weekday("week_start", s)?,
    };

    let anchor_time = match root.opt_time("anchor_time")? {
        Some(t) => t,
        None => NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN),
    };

    let horizon_days = root.opt_positive_u32("horizon_days")?;
    if let Some(days) = horizon_days {
        if days > SamplingProfile::MAX_HORIZON_DAYS {
            return Err(root.out_of_range(
                "horizon_days",
                days,
                &format!("1..={}", SamplingProfile::MAX_HORIZON_DAYS),
            ));
        }
    }

    let yearly_anchor = match root.opt_str("yearly_anchor")? {
        None | Some("fixed") => {
            let year = match root.opt_value("yearly_anchor_year") {
                None => YearlyAnchor::DEFAULT_YEAR,
                Some(Value::Integer(y)) if (1..=9999).contains(y) => *y as i32,
                Some(Value::Integer(y)) => {
                    return Err(root.out_of_range("yearly_anchor_year", y, "1..=9999"))
                }
                Some(other) => return Err(root.invalid_type("yearly_anchor_year", "an integer", other)),
            };
            YearlyAnchor::Fixed { year }
        }
        Some("input_year") => YearlyAnchor::InputYear,
        Some(other) => {
            return Err(root.unknown("yearly_anchor", other, "fixed, input_year".to_string()))
        }
    };

    let strategy_name = root.req_str("strategy")?;
    let kind = StrategyKind::parse(strategy_name).ok_or_else(|| {
        root.unknown(
            "strategy",
            strategy_name,
            allowed(StrategyKind::ALL.iter().map(|k| k.as_str())),
        )
    })?;

    // Reject before looking at parameters so the error names the real problem
    if !kind.supports(scope) {
        return Err(ConfigError::UnsupportedStrategy {
            strategy: kind,
            scope,
        });
    }

    let time = root.opt_time("time")?.unwrap_or(anchor_time);

    let strategy = match kind {
        StrategyKind::FixedTimes => {
            let times = root
                .non_empty_array("times")?
                .iter()
                .map(|v| root.time("times", root.string_item("times", v)?))
                .collect::<Result<Vec<_>, _>>()?;
            Strategy::FixedTimes { times }
        }
        StrategyKind::WeekdaysTimes => {
            let mut items = Vec::new();
            for (i, item) in root.non_empty_array("items")?.iter().enumerate() {
                let name = format!("items[{}]", i);
                let table = item
                    .as_table()
                    .ok_or_else(|| root.invalid_type(&name, "a table", item))?;
                let entry = root.child(&name, table);
                let weekday = entry.weekday("weekday", entry.req_str("weekday")?)?;
                let time = entry.time("time", entry.req_str("time")?)?;
                items.push((weekday, time));
            }
            Strategy::WeekdaysTimes { items }
        }
        StrategyKind::DaysOfMonth => {
            let mut days = Vec::new();
            for value in root.non_empty_array("days")? {
                let day = match value {
                    Value::Integer(d) if (1..=31).contains(d) => *d as u32,
                    Value::Integer(d) => return Err(root.out_of_range("days", d, "1..=31")),
                    other => return Err(root.invalid_type("days", "an array of integers", other)),
                };
                days.push(day);
            }
            Strategy::DaysOfMonth { days, time }
        }
        StrategyKind::MonthlyOnDay => {
            let day = root.req_u32("day")?;
            if !(1..=31).contains(&day) {
                return Err(root.out_of_range("day", day, "1..=31"));
            }
            Strategy::MonthlyOnDay { day, time }
        }
        StrategyKind::EveryNDays => {
            let n = root.req_u32("n")?;
            if n == 0 || n > SamplingProfile::MAX_HORIZON_DAYS {
                return Err(root.out_of_range(
                    "n",
                    n,
                    &format!("1..={}", SamplingProfile::MAX_HORIZON_DAYS),
                ));
            }
            let max_events = root.opt_positive_u32("max_events")?;
            Strategy::EveryNDays {
                n,
                time,
                max_events,
            }
        }
    };

    Ok(SamplingProfile {
        strategy,
        timezone,
        week_start,
        anchor_time,
        horizon_days,
        yearly_anchor,
    })
}

pub fn validate_weights(tree: &Table) -> Result<WeightConfig, ConfigError> {
    let root = Section::root(ConfigKind::Weights, tree);
    let defaults = WeightConfig::default();

    let aspects_section = root.req_table("aspects")?;
    aspects_section.require_non_empty()?;
    let aspects = aspects_section.aspect_map(non_negative, ">= 0")?;

    let groups_section = root.req_table("groups")?;
    groups_section.require_non_empty()?;
    let groups = groups_section.group_map(non_negative, ">= 0")?;

    let mut transit = BTreeMap::new();
    if let Some(section) = root.opt_table("transit")? {
        for (key, value) in section.entries() {
            let body = section.body(key, key)?;
            let weight = section.number(key, value)?;
            if !non_negative(weight) {
                return Err(section.out_of_range(key, weight, ">= 0"));
            }
            transit.insert(body, weight);
        }
    }

    let mut houses = BTreeMap::new();
    if let Some(section) = root.opt_table("houses")? {
        for (key, value) in section.entries() {
            let class = HouseClass::parse(key).ok_or_else(|| {
                section.unknown(key, key, allowed(HouseClass::ALL.iter().map(|c| c.as_str())))
            })?;
            let weight = section.number(key, value)?;
            if weight < 0.0 {
                return Err(section.out_of_range(key, weight, ">= 0"));
            }
            houses.insert(class, weight);
        }
    }

    let mut falloff = defaults.falloff;
    if let Some(section) = root.opt_table("falloff")? {
        if let Some(mode) = section.opt_str("mode")? {
            falloff.mode = FalloffMode::parse(mode).ok_or_else(|| {
                section.unknown("mode", mode, allowed(FalloffMode::ALL.iter().map(|m| m.as_str())))
            })?;
        }
        falloff.power = check_f64(&section, "power", section.opt_f64("power")?, 1.0, positive, "> 0")?;
        falloff.sigma = match section.opt_f64("sigma")? {
            None => None,
            Some(s) if s > 0.0 => Some(s),
            Some(s) => return Err(section.out_of_range("sigma", s, "> 0")),
        };
    }

    let mut aggregation = defaults.aggregation;
    let mut relevance = defaults.relevance;
    if let Some(section) = root.opt_table("aggregation")? {
        if let Some(method) = section.opt_str("method")? {
            aggregation.method = AggregationMethod::parse(method).ok_or_else(|| {
                section.unknown(
                    "method",
                    method,
                    allowed(AggregationMethod::ALL.iter().map(|m| m.as_str())),
                )
            })?;
        }
        if let Some(weighting) = section.opt_str("snapshot_weighting")? {
            aggregation.weighting = SnapshotWeighting::parse(weighting).ok_or_else(|| {
                section.unknown(
                    "snapshot_weighting",
                    weighting,
                    allowed(SnapshotWeighting::ALL.iter().map(|w| w.as_str())),
                )
            })?;
        }
        aggregation.decay_lambda = check_f64(
            &section,
            "decay_lambda",
            section.opt_f64("decay_lambda")?,
            aggregation.decay_lambda,
            non_negative,
            ">= 0",
        )?;
        if let Some(mode) = section.opt_str("relevance")? {
            relevance = RelevanceMode::parse(mode).ok_or_else(|| {
                section.unknown(
                    "relevance",
                    mode,
                    allowed(RelevanceMode::ALL.iter().map(|m| m.as_str())),
                )
            })?;
        }
    }

    let mut natal = NatalSettings::default();
    if let Some(section) = root.opt_table("natal")? {
        natal.angular_bonus = check_f64(
            &section,
            "angular_bonus",
            section.opt_f64("angular_bonus")?,
            natal.angular_bonus,
            non_negative,
            ">= 0",
        )?;
        natal.ruler_bonus = check_f64(
            &section,
            "ruler_bonus",
            section.opt_f64("ruler_bonus")?,
            natal.ruler_bonus,
            non_negative,
            ">= 0",
        )?;
        natal.per_aspect_bonus = check_f64(
            &section,
            "per_aspect_bonus",
            section.opt_f64("per_aspect_bonus")?,
            natal.per_aspect_bonus,
            non_negative,
            ">= 0",
        )?;
        natal.tight_orb = check_f64(
            &section,
            "tight_orb",
            section.opt_f64("tight_orb")?,
            natal.tight_orb,
            non_negative,
            ">= 0",
        )?;
        natal.max_factor = check_f64(
            &section,
            "max_factor",
            section.opt_f64("max_factor")?,
            natal.max_factor,
            |v| v >= 1.0,
            ">= 1",
        )?;
    }

    Ok(WeightConfig {
        aspects,
        groups,
        transit,
        houses,
        falloff,
        aggregation,
        relevance,
        natal,
    })
}

fn body_list(section: &Section<'_>, name: &str) -> Result<Option<BodySet>, ConfigError> {
    match section.opt_array(name)? {
        None => Ok(None),
        Some(values) => {
            let mut set = BodySet::new();
            for value in values {
                set.insert(section.body(name, section.string_item(name, value)?)?);
            }
            Ok(Some(set))
        }
    }
}

pub fn validate_filters(tree: &Table) -> Result<FilterConfig, ConfigError> {
    let root = Section::root(ConfigKind::Filters, tree);
    let mut filters = FilterConfig::default();

    if let Some(values) = root.opt_array("allowed_aspects")? {
        let mut allowed_aspects = BTreeSet::new();
        for value in values {
            let name = root.string_item("allowed_aspects", value)?;
            allowed_aspects.insert(root.aspect_type("allowed_aspects", name)?);
        }
        filters.allowed_aspects = allowed_aspects;
    }

    if let Some(section) = root.opt_table("thresholds")? {
        filters.max_orb_ratio = check_f64(
            &section,
            "max_orb_ratio",
            section.opt_f64("max_orb_ratio")?,
            filters.max_orb_ratio,
            |v| (0.0..=1.0).contains(&v),
            "0..=1",
        )?;
        filters.min_strength = check_f64(
            &section,
            "min_strength",
            section.opt_f64("min_strength")?,
            filters.min_strength,
            non_negative,
            ">= 0",
        )?;
    }

    if let Some(section) = root.opt_table("include")? {
        filters.include = BodyInclusion {
            transit: body_list(&section, "transit")?,
            natal: body_list(&section, "natal")?,
            node: section.opt_bool("node")?.unwrap_or(false),
            lilith: section.opt_bool("lilith")?.unwrap_or(false),
        };
    }

    if let Some(section) = root.opt_table("options")? {
        if let Some(n) = section.opt_positive_u32("max_aspects")? {
            filters.max_aspects = n as usize;
        }
        if let Some(n) = section.opt_positive_u32("max_prevalent_bodies")? {
            filters.max_prevalent_bodies = n as usize;
        }
    }

    Ok(filters)
}

pub fn validate_orbs(tree: &Table) -> Result<OrbConfig, ConfigError> {
    let root = Section::root(ConfigKind::Orbs, tree);
    let mut orbs = OrbConfig::default();

    let base = root.req_table("base")?;
    base.require_non_empty()?;
    orbs.base = base.aspect_map(positive, "> 0")?;

    if let Some(section) = root.opt_table("multipliers")? {
        if let Some(by_group) = section.opt_table("by_group")? {
            orbs.by_group = by_group.group_map(positive, "> 0")?;
        }
        orbs.angles = check_f64(&section, "angles", section.opt_f64("angles")?, 1.0, positive, "> 0")?;
    }

    if let Some(section) = root.opt_table("context")? {
        orbs.transit_context =
            check_f64(&section, "transit", section.opt_f64("transit")?, 1.0, positive, "> 0")?;
        orbs.natal_context =
            check_f64(&section, "natal", section.opt_f64("natal")?, 1.0, positive, "> 0")?;
    }

    if let Some(section) = root.opt_table("limits")? {
        orbs.min_orb_deg = check_f64(
            &section,
            "min_orb_deg",
            section.opt_f64("min_orb_deg")?,
            orbs.min_orb_deg,
            non_negative,
            ">= 0",
        )?;
    }

    if let Some(section) = root.opt_table("match")? {
        orbs.match_overrides = section.aspect_map(positive, "> 0")?;
    }

    Ok(orbs)
}

const PRESENTATION_KEYS: [&str; 3] = ["theme", "pretty_json", "max_listed_aspects"];

pub fn validate_presentation(tree: &Table) -> Result<PresentationConfig, ConfigError> {
    let root = Section::root(ConfigKind::Presentation, tree);

    let theme = match root.opt_str("theme")? {
        None => Theme::default(),
        Some(name) => Theme::parse(name)
            .ok_or_else(|| root.unknown("theme", name, "light, dark".to_string()))?,
    };
    let pretty_json = root.opt_bool("pretty_json")?.unwrap_or(false);
    let max_listed_aspects = root
        .opt_positive_u32("max_listed_aspects")?
        .map(|n| n as usize);

    let extra = tree
        .iter()
        .filter(|(key, _)| !PRESENTATION_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(PresentationConfig {
        theme,
        pretty_json,
        max_listed_aspects,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Table {
        text.parse::<Table>().unwrap()
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("07:05"), NaiveTime::from_hms_opt(7, 5, 0));
        assert_eq!(parse_hhmm("23:59"), NaiveTime::from_hms_opt(23, 59, 0));
        assert!(parse_hhmm("24:00").is_none());
        assert!(parse_hhmm("7:05").is_none());
        assert!(parse_hhmm("12:60").is_none());
        assert!(parse_hhmm("noon").is_none());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("UTC"), FixedOffset::east_opt(0));
        assert_eq!(parse_timezone("+02:00"), FixedOffset::east_opt(7200));
        assert_eq!(parse_timezone("-05:30"), FixedOffset::west_opt(19800));
        assert!(parse_timezone("Europe/Rome").is_none());
        assert!(parse_timezone("+15:00").is_none());
    }

    #[test]
    fn test_sampling_weekdays_times() {
        let tree = parse(
            r#"
            strategy = "weekdays_times"
            week_start = "sunday"
            timezone = "+01:00"
            items = [{ weekday = "wednesday", time = "12:00" }, { weekday = "SAT", time = "09:30" }]
            "#,
        );
        let profile = validate_sampling(&tree, Scope::Weekly).unwrap();
        assert_eq!(profile.week_start, Weekday::Sun);
        assert_eq!(profile.timezone, FixedOffset::east_opt(3600).unwrap());
        match profile.strategy {
            Strategy::WeekdaysTimes { items } => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].0, Weekday::Sat);
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn test_sampling_malformed_time() {
        let tree = parse("strategy = \"fixed_times\"\ntimes = [\"12:00\", \"25:00\"]\n");
        let err = validate_sampling(&tree, Scope::Daily).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedTime { ref value, .. } if value == "25:00"));
    }

    #[test]
    fn test_sampling_unsupported_for_scope() {
        let tree = parse("strategy = \"monthly_on_day\"\nday = 5\n");
        let err = validate_sampling(&tree, Scope::Daily).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnsupportedStrategy {
                strategy: StrategyKind::MonthlyOnDay,
                scope: Scope::Daily
            }
        );
    }

    #[test]
    fn test_sampling_unknown_strategy_and_missing_key() {
        let err = validate_sampling(&parse("strategy = \"hourly\"\n"), Scope::Daily).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownValue { .. }));

        let err = validate_sampling(&parse("strategy = \"every_n_days\"\n"), Scope::Monthly).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingKey {
                kind: ConfigKind::Sampling,
                key: "n".to_string()
            }
        );
    }

    #[test]
    fn test_weights_negative_weight() {
        let tree = parse("[aspects]\ntrine = -1\n[groups]\npersonal = 1\n");
        let err = validate_weights(&tree).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { ref key, .. } if key == "aspects.trine"));
    }

    #[test]
    fn test_weights_unknown_falloff_mode() {
        let tree = parse("[aspects]\ntrine = 1\n[groups]\npersonal = 1\n[falloff]\nmode = \"step\"\n");
        let err = validate_weights(&tree).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownValue { ref key, .. } if key == "falloff.mode"));
    }

    #[test]
    fn test_weights_empty_aspects() {
        let tree = parse("[aspects]\n[groups]\npersonal = 1\n");
        assert!(validate_weights(&tree).is_err());
    }

    #[test]
    fn test_orbs_reject_zero_base() {
        let tree = parse("[base]\nconjunction = 0\n");
        let err = validate_orbs(&tree).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { ref key, .. } if key == "base.conjunction"));
    }

    #[test]
    fn test_filters_ratio_range_and_bodies() {
        let err = validate_filters(&parse("[thresholds]\nmax_orb_ratio = 1.5\n")).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));

        let filters = validate_filters(&parse(
            "allowed_aspects = [\"trine\"]\n[include]\ntransit = [\"sun\", \"mc\"]\nnode = true\n",
        ))
        .unwrap();
        assert_eq!(filters.allowed_aspects.len(), 1);
        let transit = filters.include.transit_bodies();
        assert!(transit.contains(&Body::Midheaven));
        assert_eq!(transit.len(), 2);

        let err = validate_filters(&parse("[include]\ntransit = [\"ceres\"]\n")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownValue { .. }));
    }

    #[test]
    fn test_presentation_keeps_unknown_keys() {
        let config = validate_presentation(&parse(
            "theme = \"dark\"\npretty_json = true\nbanner = \"hello\"\n",
        ))
        .unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.pretty_json);
        assert_eq!(config.extra["banner"].as_str(), Some("hello"));
        assert!(!config.extra.contains_key("theme"));
    }
}
