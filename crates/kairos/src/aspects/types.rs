use crate::bodies::Body;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aspect type. Declaration order is also the tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Quincunx,
    Opposition,
}

impl AspectType {
    pub const ALL: [AspectType; 6] = [
        AspectType::Conjunction,
        AspectType::Sextile,
        AspectType::Square,
        AspectType::Trine,
        AspectType::Quincunx,
        AspectType::Opposition,
    ];

    /// Exact angle for this aspect
    pub fn exact_angle(&self) -> f64 {
        match self {
            AspectType::Conjunction => 0.0,
            AspectType::Sextile => 60.0,
            AspectType::Square => 90.0,
            AspectType::Trine => 120.0,
            AspectType::Quincunx => 150.0,
            AspectType::Opposition => 180.0,
        }
    }

    /// Default maximum orb accepted by the matcher
    pub fn default_max_orb(&self) -> f64 {
        match self {
            AspectType::Conjunction => 8.0,
            AspectType::Sextile => 4.0,
            AspectType::Square => 6.0,
            AspectType::Trine => 6.0,
            AspectType::Quincunx => 3.0,
            AspectType::Opposition => 8.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectType::Conjunction => "conjunction",
            AspectType::Sextile => "sextile",
            AspectType::Square => "square",
            AspectType::Trine => "trine",
            AspectType::Quincunx => "quincunx",
            AspectType::Opposition => "opposition",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        AspectType::ALL.iter().copied().find(|a| a.as_str() == s)
    }

    /// Harmonic tone of the aspect in [-1, 1].
    pub fn polarity(&self) -> f64 {
        match self {
            AspectType::Conjunction => 0.6,
            AspectType::Sextile => 0.7,
            AspectType::Square => -0.9,
            AspectType::Trine => 0.9,
            AspectType::Quincunx => -0.4,
            AspectType::Opposition => -0.8,
        }
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of matching two longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectMatch {
    pub aspect_type: AspectType,
    /// Deviation from the exact angle
    pub orb: f64,
    /// Minimal circular separation in [0, 180]
    pub delta: f64,
}

/// An aspect between a transit body and a natal body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectInstance {
    pub transit: Body,
    pub natal: Body,
    pub aspect_type: AspectType,
    pub orb: f64,
    pub delta: f64,
}

impl AspectInstance {
    /// Grouping key across snapshots
    pub fn key(&self) -> (Body, Body, AspectType) {
        (self.transit, self.natal, self.aspect_type)
    }
}

/// An aspect inside the natal chart (unordered pair).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NatalAspect {
    pub first: Body,
    pub second: Body,
    pub aspect_type: AspectType,
    pub orb: f64,
    pub delta: f64,
}

impl NatalAspect {
    pub fn involves(&self, body: Body) -> bool {
        self.first == body || self.second == body
    }
}
