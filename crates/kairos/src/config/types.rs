//! Typed views of the validated config trees.

use crate::aggregate::Aggregation;
use crate::aspects::AspectType;
use crate::bodies::{Body, BodyGroup, BodySet};
use crate::natal::{HouseClass, NatalSettings};
use crate::scoring::{Falloff, OrbContext};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How a grouped aspect's relevance score is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceMode {
    /// The aggregation engine over occurrence scores
    #[default]
    Aggregate,
    /// `0.7 * max + 0.3 * mean`, damped by the tightest orb and boosted by repetition
    PeakBlend,
}

impl RelevanceMode {
    pub const ALL: [RelevanceMode; 2] = [RelevanceMode::Aggregate, RelevanceMode::PeakBlend];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceMode::Aggregate => "aggregate",
            RelevanceMode::PeakBlend => "peak_blend",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for RelevanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aspect, group and house weights plus falloff and aggregation settings
#[derive(Debug, Clone, PartialEq)]
pub struct WeightConfig {
    pub aspects: BTreeMap<AspectType, f64>,
    pub groups: BTreeMap<BodyGroup, f64>,
    /// Per transit body; missing bodies weigh 1.0 and 0.0 keeps a body out of the run
    pub transit: BTreeMap<Body, f64>,
    pub houses: BTreeMap<HouseClass, f64>,
    pub falloff: Falloff,
    pub aggregation: Aggregation,
    pub relevance: RelevanceMode,
    pub natal: NatalSettings,
}

impl WeightConfig {
    /// Missing aspect types weigh nothing
    pub fn aspect_weight(&self, aspect_type: AspectType) -> f64 {
        self.aspects.get(&aspect_type).copied().unwrap_or(0.0)
    }

    pub fn group_weight(&self, group: BodyGroup) -> f64 {
        self.groups.get(&group).copied().unwrap_or(1.0)
    }

    pub fn transit_weight(&self, body: Body) -> f64 {
        self.transit.get(&body).copied().unwrap_or(1.0)
    }

    /// `bodies` without the ones whose transit weight is zero
    pub fn weighted_transit_bodies(&self, bodies: BodySet) -> BodySet {
        bodies
            .into_iter()
            .filter(|b| self.transit_weight(*b) > 0.0)
            .collect()
    }

    /// 1.0 when the house class is unknown (no cusps)
    pub fn house_weight(&self, house_class: Option<HouseClass>) -> f64 {
        house_class
            .and_then(|class| self.houses.get(&class).copied())
            .unwrap_or(1.0)
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            aspects: [
                (AspectType::Conjunction, 1.0),
                (AspectType::Sextile, 0.6),
                (AspectType::Square, 0.9),
                (AspectType::Trine, 0.8),
                (AspectType::Quincunx, 0.4),
                (AspectType::Opposition, 0.9),
            ]
            .into_iter()
            .collect(),
            groups: [
                (BodyGroup::Luminaries, 1.0),
                (BodyGroup::Personal, 0.9),
                (BodyGroup::Social, 0.8),
                (BodyGroup::Generational, 0.7),
                (BodyGroup::Angles, 1.0),
                (BodyGroup::Points, 0.5),
            ]
            .into_iter()
            .collect(),
            transit: BTreeMap::new(),
            houses: [
                (HouseClass::Angular, 1.0),
                (HouseClass::Succedent, 0.8),
                (HouseClass::Cadent, 0.6),
            ]
            .into_iter()
            .collect(),
            falloff: Falloff::default(),
            aggregation: Aggregation::default(),
            relevance: RelevanceMode::default(),
            natal: NatalSettings::default(),
        }
    }
}

/// Which bodies take part in matching
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyInclusion {
    /// Explicit transit list; `None` means the default planets
    pub transit: Option<BodySet>,
    /// Explicit natal list; `None` means planets plus angles
    pub natal: Option<BodySet>,
    pub node: bool,
    pub lilith: bool,
}

impl BodyInclusion {
    pub fn transit_bodies(&self) -> BodySet {
        self.transit
            .clone()
            .unwrap_or_else(|| Body::default_set(self.node, self.lilith, false))
    }

    pub fn natal_bodies(&self) -> BodySet {
        self.natal
            .clone()
            .unwrap_or_else(|| Body::default_set(self.node, self.lilith, true))
    }
}

/// Gates applied before and after scoring
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Empty means every aspect type is allowed
    pub allowed_aspects: BTreeSet<AspectType>,
    pub max_orb_ratio: f64,
    pub min_strength: f64,
    pub include: BodyInclusion,
    pub max_aspects: usize,
    pub max_prevalent_bodies: usize,
}

impl FilterConfig {
    pub fn allows(&self, aspect_type: AspectType) -> bool {
        self.allowed_aspects.is_empty() || self.allowed_aspects.contains(&aspect_type)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allowed_aspects: BTreeSet::new(),
            max_orb_ratio: 1.0,
            min_strength: 0.0,
            include: BodyInclusion::default(),
            max_aspects: 10,
            max_prevalent_bodies: 3,
        }
    }
}

/// Base orbs and their multipliers
#[derive(Debug, Clone, PartialEq)]
pub struct OrbConfig {
    pub base: BTreeMap<AspectType, f64>,
    pub by_group: BTreeMap<BodyGroup, f64>,
    pub angles: f64,
    pub transit_context: f64,
    pub natal_context: f64,
    pub min_orb_deg: f64,
    /// Matcher maximum orbs overriding the per-type defaults
    pub match_overrides: BTreeMap<AspectType, f64>,
}

impl OrbConfig {
    /// 0.0 disables the aspect type
    pub fn base_orb(&self, aspect_type: AspectType) -> f64 {
        self.base.get(&aspect_type).copied().unwrap_or(0.0)
    }

    pub fn group_multiplier(&self, group: BodyGroup) -> f64 {
        self.by_group.get(&group).copied().unwrap_or(1.0)
    }

    pub fn context_multiplier(&self, context: OrbContext) -> f64 {
        match context {
            OrbContext::Transit => self.transit_context,
            OrbContext::Natal => self.natal_context,
        }
    }
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            base: AspectType::ALL
                .iter()
                .map(|t| (*t, t.default_max_orb()))
                .collect(),
            by_group: BTreeMap::new(),
            angles: 1.0,
            transit_context: 1.0,
            natal_context: 1.0,
            min_orb_deg: 0.5,
            match_overrides: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Output settings; keys the engine does not know are kept in `extra`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresentationConfig {
    pub theme: Theme,
    pub pretty_json: bool,
    pub max_listed_aspects: Option<usize>,
    pub extra: toml::Table,
}
