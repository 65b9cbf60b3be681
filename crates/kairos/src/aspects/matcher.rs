use crate::aspects::types::{AspectInstance, AspectMatch, AspectType, NatalAspect};
use crate::bodies::{normalize_degrees, BodySet};
use crate::ephemeris::types::BodyPositions;
use std::collections::BTreeMap;

/// Minimal circular separation between two longitudes, in [0, 180].
pub fn angular_separation(lon1: f64, lon2: f64) -> f64 {
    let raw_diff = (normalize_degrees(lon1) - normalize_degrees(lon2)).abs() % 360.0;
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

/// Matches longitude pairs against the six aspect types.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectMatcher {
    max_orbs: BTreeMap<AspectType, f64>,
}

impl AspectMatcher {
    /// Matcher using the default maximum orb of every aspect type
    pub fn new() -> Self {
        Self {
            max_orbs: AspectType::ALL
                .iter()
                .map(|t| (*t, t.default_max_orb()))
                .collect(),
        }
    }

    /// Matcher with some maximum orbs overridden; missing types keep their default.
    pub fn with_max_orbs(overrides: &BTreeMap<AspectType, f64>) -> Self {
        let mut matcher = Self::new();
        for (aspect_type, orb) in overrides {
            matcher.max_orbs.insert(*aspect_type, *orb);
        }
        matcher
    }

    pub fn max_orb(&self, aspect_type: AspectType) -> f64 {
        self.max_orbs
            .get(&aspect_type)
            .copied()
            .unwrap_or_else(|| aspect_type.default_max_orb())
    }

    /// Find the best matching aspect between two longitudes.
    ///
    /// Smallest orb wins; equal orbs keep the type that comes first in
    /// [`AspectType::ALL`].
    pub fn find(&self, lon1: f64, lon2: f64) -> Option<AspectMatch> {
        let delta = angular_separation(lon1, lon2);

        let mut best: Option<AspectMatch> = None;
        for aspect_type in AspectType::ALL {
            let orb = (delta - aspect_type.exact_angle()).abs();
            if orb > self.max_orb(aspect_type) {
                continue;
            }
            let better = match &best {
                None => true,
                Some(current) => orb < current.orb,
            };
            if better {
                best = Some(AspectMatch {
                    aspect_type,
                    orb,
                    delta,
                });
            }
        }
        best
    }

    /// Aspects between every allowed transit body and every allowed natal body.
    ///
    /// The same body on both sides is a valid pair (e.g. a solar return).
    pub fn transit_aspects(
        &self,
        transit: &BodyPositions,
        natal: &BodyPositions,
        transit_bodies: &BodySet,
        natal_bodies: &BodySet,
    ) -> Vec<AspectInstance> {
        let mut out = Vec::new();
        for (transit_body, transit_lon) in transit.iter() {
            if !transit_bodies.contains(&transit_body) {
                continue;
            }
            for (natal_body, natal_lon) in natal.iter() {
                if !natal_bodies.contains(&natal_body) {
                    continue;
                }
                if let Some(m) = self.find(transit_lon, natal_lon) {
                    out.push(AspectInstance {
                        transit: transit_body,
                        natal: natal_body,
                        aspect_type: m.aspect_type,
                        orb: m.orb,
                        delta: m.delta,
                    });
                }
            }
        }
        out
    }

    /// Aspects between all unordered pairs of a single chart
    pub fn natal_aspects(&self, positions: &BodyPositions) -> Vec<NatalAspect> {
        let bodies: Vec<_> = positions.iter().collect();
        let mut out = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (first, lon1) = bodies[i];
                let (second, lon2) = bodies[j];
                if let Some(m) = self.find(lon1, lon2) {
                    out.push(NatalAspect {
                        first,
                        second,
                        aspect_type: m.aspect_type,
                        orb: m.orb,
                        delta: m.delta,
                    });
                }
            }
        }
        out
    }
}

impl Default for AspectMatcher {
    fn default() -> Self {
        Self::new()
    }
}
