use crate::aspects::{AspectInstance, AspectType};
use crate::bodies::{Body, BodyGroup};
use crate::config::{ConfigBundle, FilterConfig, OrbConfig, WeightConfig};
use crate::natal::{HouseClass, NatalProfile};
use crate::scoring::falloff::Falloff;
use serde::{Deserialize, Serialize};

/// Which orb multiplier applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbContext {
    #[default]
    Transit,
    Natal,
}

/// An aspect instance with everything that went into its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAspect {
    pub transit: Body,
    pub natal: Body,
    pub aspect_type: AspectType,
    pub orb: f64,
    pub delta: f64,
    pub effective_orb: f64,
    /// Strength before natal amplification
    pub intensity_base: f64,
    pub natal_factor: f64,
    pub score: f64,
    pub transit_longitude: f64,
    pub house_class: Option<HouseClass>,
}

impl ScoredAspect {
    pub fn key(&self) -> (Body, Body, AspectType) {
        (self.transit, self.natal, self.aspect_type)
    }
}

/// Weighs aspect instances using one config bundle
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringEngine {
    weights: WeightConfig,
    filters: FilterConfig,
    orbs: OrbConfig,
}

impl ScoringEngine {
    pub fn new(weights: WeightConfig, filters: FilterConfig, orbs: OrbConfig) -> Self {
        Self {
            weights,
            filters,
            orbs,
        }
    }

    pub fn from_bundle(bundle: &ConfigBundle) -> Self {
        Self::new(
            bundle.weights.clone(),
            bundle.filters.clone(),
            bundle.orbs.clone(),
        )
    }

    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    pub fn orbs(&self) -> &OrbConfig {
        &self.orbs
    }

    pub fn falloff(&self) -> Falloff {
        self.weights.falloff
    }

    /// Orb allowed for this pair, or 0.0 when the aspect type has no base orb.
    ///
    /// Base orb scaled by both bodies' group multipliers, the context
    /// multiplier and the angle boost, floored at `min_orb_deg`.
    pub fn effective_orb(
        &self,
        aspect_type: AspectType,
        body1: Body,
        body2: Body,
        context: OrbContext,
    ) -> f64 {
        let base = self.orbs.base_orb(aspect_type);
        if base <= 0.0 {
            return 0.0;
        }
        let (g1, g2) = (body1.group(), body2.group());
        let angle_boost = if g1 == BodyGroup::Angles || g2 == BodyGroup::Angles {
            self.orbs.angles
        } else {
            1.0
        };
        let orb = base
            * self.orbs.group_multiplier(g1)
            * self.orbs.group_multiplier(g2)
            * self.orbs.context_multiplier(context)
            * angle_boost;
        orb.max(self.orbs.min_orb_deg)
    }

    /// Strength of one aspect, 0.0 when any gate rejects it
    pub fn score(
        &self,
        aspect_type: AspectType,
        body1: Body,
        body2: Body,
        delta: f64,
        context: OrbContext,
        house_class: Option<HouseClass>,
    ) -> f64 {
        self.strength(aspect_type, body1, body2, delta, context, house_class)
            .1
    }

    /// (effective orb, strength)
    fn strength(
        &self,
        aspect_type: AspectType,
        body1: Body,
        body2: Body,
        delta: f64,
        context: OrbContext,
        house_class: Option<HouseClass>,
    ) -> (f64, f64) {
        if !self.filters.allows(aspect_type) {
            return (0.0, 0.0);
        }
        let orb = self.effective_orb(aspect_type, body1, body2, context);
        if orb <= 0.0 {
            return (orb, 0.0);
        }
        let delta = delta.abs();
        if delta / orb > self.filters.max_orb_ratio {
            return (orb, 0.0);
        }
        let aspect_weight = self.weights.aspect_weight(aspect_type);
        if aspect_weight <= 0.0 {
            return (orb, 0.0);
        }

        let group_weight = (self.weights.group_weight(body1.group())
            + self.weights.group_weight(body2.group()))
            / 2.0;
        let house_weight = self.weights.house_weight(house_class);
        let body_weight = match context {
            OrbContext::Transit => self.weights.transit_weight(body1),
            OrbContext::Natal => 1.0,
        };
        let f = self.weights.falloff.value(delta, orb);

        let strength = aspect_weight * group_weight * house_weight * body_weight * f;
        if strength < self.filters.min_strength {
            return (orb, 0.0);
        }
        (orb, strength)
    }

    /// Score a transit instance and amplify it by the natal body's factor.
    ///
    /// The instance's orb is the distance from exact used by the falloff.
    pub fn score_with_natal(
        &self,
        instance: &AspectInstance,
        transit_longitude: f64,
        context: OrbContext,
        house_class: Option<HouseClass>,
        natal_profile: &NatalProfile,
    ) -> ScoredAspect {
        let (effective_orb, strength) = self.strength(
            instance.aspect_type,
            instance.transit,
            instance.natal,
            instance.orb,
            context,
            house_class,
        );
        let natal_factor = natal_profile.factor(instance.natal);
        ScoredAspect {
            transit: instance.transit,
            natal: instance.natal,
            aspect_type: instance.aspect_type,
            orb: instance.orb,
            delta: instance.delta,
            effective_orb,
            intensity_base: strength,
            natal_factor,
            score: strength * natal_factor,
            transit_longitude,
            house_class,
        }
    }
}
