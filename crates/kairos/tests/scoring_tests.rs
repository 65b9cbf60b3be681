use kairos::aspects::{AspectInstance, AspectMatcher, AspectType};
use kairos::bodies::Body;
use kairos::config::{FilterConfig, OrbConfig, WeightConfig};
use kairos::ephemeris::BodyPositions;
use kairos::natal::{HouseClass, NatalChart, NatalProfile, NatalSettings};
use kairos::scoring::{Falloff, FalloffMode, OrbContext, ScoringEngine};

fn engine_with(filters: FilterConfig) -> ScoringEngine {
    ScoringEngine::new(WeightConfig::default(), filters, OrbConfig::default())
}

#[test]
fn test_excluded_aspect_type_scores_zero() {
    let mut filters = FilterConfig::default();
    filters.allowed_aspects = [AspectType::Conjunction, AspectType::Trine].into_iter().collect();
    let engine = engine_with(filters);

    let score = engine.score(AspectType::Square, Body::Mars, Body::Sun, 0.0, OrbContext::Transit, None);
    assert_eq!(score, 0.0);
    let allowed = engine.score(AspectType::Trine, Body::Mars, Body::Sun, 0.0, OrbContext::Transit, None);
    assert!(allowed > 0.0);
}

#[test]
fn test_exact_conjunction_cosine_is_full_strength() {
    let falloff = Falloff::new(FalloffMode::Cosine);
    assert!((falloff.value(0.0, 8.0) - 1.0).abs() < 1e-12);

    // Luminaries, conjunction weight 1.0, no house: the score is the falloff
    let engine = engine_with(FilterConfig::default());
    let score = engine.score(AspectType::Conjunction, Body::Sun, Body::Moon, 0.0, OrbContext::Transit, None);
    assert!((score - 1.0).abs() < 1e-12);
}

#[test]
fn test_orb_ratio_gate() {
    let mut filters = FilterConfig::default();
    filters.max_orb_ratio = 0.25;
    let engine = engine_with(filters);

    // Sun/Moon conjunction orb is 8: 1.9 passes, 2.1 does not
    let inside = engine.score(AspectType::Conjunction, Body::Sun, Body::Moon, 1.9, OrbContext::Transit, None);
    let outside = engine.score(AspectType::Conjunction, Body::Sun, Body::Moon, 2.1, OrbContext::Transit, None);
    assert!(inside > 0.0);
    assert_eq!(outside, 0.0);
}

#[test]
fn test_min_strength_gate() {
    let mut filters = FilterConfig::default();
    filters.min_strength = 0.5;
    let engine = engine_with(filters);

    // Pluto/Neptune sextile: 0.6 * 0.7 is already below 0.5
    let score = engine.score(AspectType::Sextile, Body::Pluto, Body::Neptune, 0.0, OrbContext::Transit, None);
    assert_eq!(score, 0.0);
}

#[test]
fn test_house_class_scales_score() {
    let engine = engine_with(FilterConfig::default());
    let angular = engine.score(
        AspectType::Trine,
        Body::Venus,
        Body::Sun,
        1.0,
        OrbContext::Transit,
        Some(HouseClass::Angular),
    );
    let cadent = engine.score(
        AspectType::Trine,
        Body::Venus,
        Body::Sun,
        1.0,
        OrbContext::Transit,
        Some(HouseClass::Cadent),
    );
    assert!((cadent / angular - 0.6).abs() < 1e-12);
}

#[test]
fn test_natal_factor_amplifies_score() {
    let mut positions = BodyPositions::new();
    positions.try_insert(Body::Ascendant, 0.0).unwrap();
    positions.try_insert(Body::Mars, 2.0).unwrap();
    positions.try_insert(Body::Sun, 92.0).unwrap();
    let chart = NatalChart::with_equal_houses(positions).unwrap();

    let matcher = AspectMatcher::new();
    let profile = NatalProfile::derive(&chart, &matcher, &NatalSettings::default());
    // Mars: angular, rules Aries rising, square the Sun and conjunct the ascendant
    let mars = profile.factor(Body::Mars);
    assert!(mars > 1.0 && mars <= 1.5);

    let engine = engine_with(FilterConfig::default());
    let instance = AspectInstance {
        transit: Body::Saturn,
        natal: Body::Mars,
        aspect_type: AspectType::Opposition,
        orb: 0.5,
        delta: 179.5,
    };
    let scored = engine.score_with_natal(&instance, 182.5, OrbContext::Transit, None, &profile);
    assert!((scored.score - scored.intensity_base * mars).abs() < 1e-12);
    assert_eq!(scored.natal_factor, mars);
}
