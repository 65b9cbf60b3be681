use crate::aspects::{AspectMatcher, NatalAspect};
use crate::bodies::Body;
use crate::natal::chart::{HouseClass, NatalChart};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bonuses that make a natal body more sensitive to transits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NatalSettings {
    /// Body sits in house 1, 4, 7 or 10
    pub angular_bonus: f64,
    /// Body rules the ascendant's sign
    pub ruler_bonus: f64,
    /// Per natal aspect within `tight_orb`
    pub per_aspect_bonus: f64,
    pub tight_orb: f64,
    pub max_factor: f64,
}

impl Default for NatalSettings {
    fn default() -> Self {
        Self {
            angular_bonus: 0.10,
            ruler_bonus: 0.20,
            per_aspect_bonus: 0.05,
            tight_orb: 3.0,
            max_factor: 1.5,
        }
    }
}

/// Amplification factor per natal body, each in `[1.0, max_factor]`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NatalProfile {
    factors: BTreeMap<Body, f64>,
}

impl NatalProfile {
    pub fn derive(chart: &NatalChart, matcher: &AspectMatcher, settings: &NatalSettings) -> Self {
        let natal_aspects = chart.natal_aspects(matcher);
        Self::from_parts(chart, &natal_aspects, settings)
    }

    /// Same as [`derive`](Self::derive) with precomputed natal aspects
    pub fn from_parts(
        chart: &NatalChart,
        natal_aspects: &[NatalAspect],
        settings: &NatalSettings,
    ) -> Self {
        let ruler = chart.ascendant_ruler();
        let max_factor = settings.max_factor.max(1.0);

        let factors = chart
            .positions()
            .iter()
            .map(|(body, _)| {
                let mut factor = 1.0;
                if chart.body_house(body).map(HouseClass::of_house) == Some(HouseClass::Angular) {
                    factor += settings.angular_bonus;
                }
                if ruler == Some(body) {
                    factor += settings.ruler_bonus;
                }
                let tight = natal_aspects
                    .iter()
                    .filter(|a| a.involves(body) && a.orb <= settings.tight_orb)
                    .count();
                factor += settings.per_aspect_bonus * tight as f64;
                (body, factor.clamp(1.0, max_factor))
            })
            .collect();

        Self { factors }
    }

    /// 1.0 for bodies outside the chart
    pub fn factor(&self, body: Body) -> f64 {
        self.factors.get(&body).copied().unwrap_or(1.0)
    }

    pub fn factors(&self) -> &BTreeMap<Body, f64> {
        &self.factors
    }
}
