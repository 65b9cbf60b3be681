use kairos::aspects::{angular_separation, AspectMatcher, AspectType};
use kairos::bodies::{Body, BodySet};
use kairos::ephemeris::BodyPositions;
use std::collections::BTreeMap;

fn positions(entries: &[(Body, f64)]) -> BodyPositions {
    let mut out = BodyPositions::new();
    for (body, lon) in entries {
        out.try_insert(*body, *lon).unwrap();
    }
    out
}

#[test]
fn test_find_conjunction_across_zero() {
    let matcher = AspectMatcher::new();

    // 359 and 2 are 3 degrees apart
    let found = matcher.find(359.0, 2.0).unwrap();
    assert_eq!(found.aspect_type, AspectType::Conjunction);
    assert!((found.orb - 3.0).abs() < 1e-9);
}

#[test]
fn test_find_is_symmetric() {
    let matcher = AspectMatcher::new();
    for (a, b) in [(10.0, 190.5), (45.0, 136.0), (300.0, 62.0), (0.0, 150.0)] {
        let ab = matcher.find(a, b).map(|m| (m.aspect_type, m.orb));
        let ba = matcher.find(b, a).map(|m| (m.aspect_type, m.orb));
        assert_eq!(ab, ba, "{} vs {}", a, b);
    }
}

#[test]
fn test_no_aspect_outside_orbs() {
    let matcher = AspectMatcher::new();
    // 20 degrees: outside conjunction and sextile orbs
    assert!(matcher.find(100.0, 120.0).is_none());
    assert_eq!(angular_separation(100.0, 120.0), 20.0);
}

#[test]
fn test_overrides_narrow_matching() {
    let mut overrides = BTreeMap::new();
    overrides.insert(AspectType::Trine, 1.0);
    let matcher = AspectMatcher::with_max_orbs(&overrides);

    assert!(matcher.find(0.0, 122.0).is_none());
    assert_eq!(
        matcher.find(0.0, 120.5).map(|m| m.aspect_type),
        Some(AspectType::Trine)
    );
}

#[test]
fn test_transit_aspects_respect_body_sets() {
    let matcher = AspectMatcher::new();
    let transit = positions(&[(Body::Sun, 100.5), (Body::Mars, 190.2)]);
    let natal = positions(&[(Body::Sun, 100.0), (Body::Mars, 10.0)]);

    let all: BodySet = [Body::Sun, Body::Mars].into_iter().collect();
    let found = matcher.transit_aspects(&transit, &natal, &all, &all);
    let keys: Vec<_> = found.iter().map(|a| a.key()).collect();
    assert!(keys.contains(&(Body::Sun, Body::Sun, AspectType::Conjunction)));
    assert!(keys.contains(&(Body::Mars, Body::Mars, AspectType::Opposition)));

    let only_sun: BodySet = [Body::Sun].into_iter().collect();
    let found = matcher.transit_aspects(&transit, &natal, &only_sun, &all);
    assert!(found.iter().all(|a| a.transit == Body::Sun));
}

#[test]
fn test_natal_aspects_skip_self_pairs() {
    let matcher = AspectMatcher::new();
    let natal = positions(&[(Body::Sun, 10.0), (Body::Moon, 100.0), (Body::Saturn, 190.0)]);
    let found = matcher.natal_aspects(&natal);

    assert!(found.iter().all(|a| a.first != a.second));
    assert!(found
        .iter()
        .any(|a| a.aspect_type == AspectType::Opposition && a.involves(Body::Saturn)));
}
