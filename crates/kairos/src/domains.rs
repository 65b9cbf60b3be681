//! Life-domain intensities derived from one snapshot's aspects.
//!
//! Each transit body feeds a fixed set of domains. An aspect pushes those
//! domains up or down by its polarity, scaled by how close it is to exact;
//! the raw sums go through a logistic so 0.5 means "nothing notable".

use crate::aspects::{AspectInstance, AspectMatcher, AspectType};
use crate::bodies::Body;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeDomain {
    Energy,
    Emotions,
    Relationships,
    Work,
    Luck,
}

impl LifeDomain {
    pub const ALL: [LifeDomain; 5] = [
        LifeDomain::Energy,
        LifeDomain::Emotions,
        LifeDomain::Relationships,
        LifeDomain::Work,
        LifeDomain::Luck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifeDomain::Energy => "energy",
            LifeDomain::Emotions => "emotions",
            LifeDomain::Relationships => "relationships",
            LifeDomain::Work => "work",
            LifeDomain::Luck => "luck",
        }
    }
}

impl fmt::Display for LifeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intensity per domain, each in (0, 1)
pub type DomainIntensities = BTreeMap<LifeDomain, f64>;

pub const NEUTRAL_INTENSITY: f64 = 0.5;
const RAW_LIMIT: f64 = 3.0;
const LOGISTIC_SLOPE: f64 = 0.8;

/// Domains a transit body speaks to, with their coefficients
pub fn body_domains(body: Body) -> &'static [(LifeDomain, f64)] {
    use LifeDomain::*;
    match body {
        Body::Sun => &[(Energy, 1.0), (Work, 0.6), (Luck, 0.3)],
        Body::Moon => &[(Emotions, 1.0), (Relationships, 0.4)],
        Body::Mercury => &[(Work, 0.7), (Energy, 0.3)],
        Body::Venus => &[(Relationships, 1.0), (Emotions, 0.6), (Luck, 0.4)],
        Body::Mars => &[(Energy, 1.0), (Work, 0.7)],
        Body::Jupiter => &[(Luck, 1.0), (Work, 0.4), (Relationships, 0.3)],
        Body::Saturn => &[(Work, 1.0), (Energy, -0.3)],
        Body::Uranus => &[(Energy, 0.7), (Work, 0.3)],
        Body::Neptune => &[(Emotions, 0.7), (Relationships, 0.3)],
        Body::Pluto => &[(Energy, 0.8), (Work, 0.4)],
        Body::Ascendant | Body::Midheaven | Body::Node | Body::Lilith => &[],
    }
}

/// Benefic bodies lean positive, malefic ones negative
pub fn body_polarity(body: Body) -> f64 {
    match body {
        Body::Jupiter | Body::Venus => 1.0,
        Body::Sun => 0.6,
        Body::Moon => 0.5,
        Body::Mercury => 0.2,
        Body::Mars => -0.3,
        Body::Saturn => -0.7,
        Body::Pluto => -0.6,
        _ => 0.0,
    }
}

/// Polarity of one transit: aspect polarity plus the transit body's, in [-1, 1]
pub fn polarity(aspect_type: AspectType, transit: Body) -> f64 {
    (aspect_type.polarity() + body_polarity(transit)).clamp(-1.0, 1.0)
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn neutral_intensities() -> DomainIntensities {
    LifeDomain::ALL
        .iter()
        .map(|d| (*d, NEUTRAL_INTENSITY))
        .collect()
}

/// Domain intensities for one snapshot's matched aspects
pub fn domain_intensities(aspects: &[AspectInstance], matcher: &AspectMatcher) -> DomainIntensities {
    let mut raw: BTreeMap<LifeDomain, f64> = LifeDomain::ALL.iter().map(|d| (*d, 0.0)).collect();

    for aspect in aspects {
        let max_orb = matcher.max_orb(aspect.aspect_type);
        let closeness = if max_orb > 0.0 {
            (1.0 - aspect.orb / max_orb).max(0.0)
        } else {
            0.0
        };
        let pol = polarity(aspect.aspect_type, aspect.transit);
        for (domain, coeff) in body_domains(aspect.transit) {
            if let Some(value) = raw.get_mut(domain) {
                *value += coeff * pol * closeness;
            }
        }
    }

    raw.into_iter()
        .map(|(domain, value)| {
            let clamped = value.clamp(-RAW_LIMIT, RAW_LIMIT);
            (domain, logistic(LOGISTIC_SLOPE * clamped))
        })
        .collect()
}

/// Combine per-snapshot intensities domain by domain; neutral when empty
pub fn combine_intensities<F>(series: &[&DomainIntensities], combine: F) -> DomainIntensities
where
    F: Fn(&[f64]) -> f64,
{
    if series.is_empty() {
        return neutral_intensities();
    }
    LifeDomain::ALL
        .iter()
        .map(|domain| {
            let values: Vec<f64> = series
                .iter()
                .map(|s| s.get(domain).copied().unwrap_or(NEUTRAL_INTENSITY))
                .collect();
            (*domain, combine(&values))
        })
        .collect()
}
