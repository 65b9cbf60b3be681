use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kairos::aspects::{AspectMatcher, AspectType};
use kairos::bodies::{Body, BodySet};
use kairos::config::ConfigResolver;
use kairos::ephemeris::BodyPositions;
use kairos::natal::{NatalChart, NatalProfile};
use kairos::period::{Scope, Tier};
use kairos::pipeline::SnapshotEvaluator;
use kairos::sampling::{resolve_anchor, schedule};
use kairos::scoring::{OrbContext, ScoringEngine};

fn spread_positions(bodies: &[Body], offset: f64) -> BodyPositions {
    let mut positions = BodyPositions::new();
    for (i, body) in bodies.iter().enumerate() {
        positions
            .try_insert(*body, (offset + i as f64 * 29.5) % 360.0)
            .unwrap();
    }
    positions
}

fn natal_chart() -> NatalChart {
    let bodies: Vec<Body> = Body::PLANETS
        .iter()
        .copied()
        .chain([Body::Ascendant, Body::Midheaven])
        .collect();
    NatalChart::with_equal_houses(spread_positions(&bodies, 3.0)).unwrap()
}

fn bench_find_aspect(c: &mut Criterion) {
    let matcher = AspectMatcher::new();
    c.bench_function("find_aspect", |b| {
        b.iter(|| matcher.find(black_box(100.0), black_box(221.5)))
    });
}

fn bench_score(c: &mut Criterion) {
    let resolver = ConfigResolver::embedded();
    let bundle = resolver.resolve_bundle(Scope::Monthly, Tier::Premium).unwrap();
    let engine = ScoringEngine::from_bundle(&bundle);

    c.bench_function("score_aspect", |b| {
        b.iter(|| {
            engine.score(
                black_box(AspectType::Square),
                black_box(Body::Saturn),
                black_box(Body::Sun),
                black_box(1.2),
                OrbContext::Transit,
                None,
            )
        })
    });
}

fn bench_evaluate_snapshot(c: &mut Criterion) {
    let resolver = ConfigResolver::embedded();
    let bundle = resolver.resolve_bundle(Scope::Weekly, Tier::Premium).unwrap();
    let chart = natal_chart();
    let matcher = AspectMatcher::with_max_orbs(&bundle.orbs.match_overrides);
    let profile = NatalProfile::derive(&chart, &matcher, &bundle.weights.natal);
    let transit_bodies: BodySet = bundle.filters.include.transit_bodies();

    let evaluator = SnapshotEvaluator {
        matcher,
        engine: ScoringEngine::from_bundle(&bundle),
        chart,
        profile,
        natal_bodies: bundle.filters.include.natal_bodies(),
        transit_bodies: transit_bodies.clone(),
    };

    let anchor = resolve_anchor(Scope::Weekly, chrono::NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(), &bundle.sampling);
    let points = schedule(Scope::Weekly, Tier::Premium, anchor, &bundle.sampling).unwrap();
    let bodies: Vec<Body> = transit_bodies.into_iter().collect();
    let transit = spread_positions(&bodies, 47.0);

    c.bench_function("evaluate_snapshot", |b| {
        b.iter(|| evaluator.evaluate(0, black_box(&points[0]), transit.clone()))
    });
}

criterion_group!(benches, bench_find_aspect, bench_score, bench_evaluate_snapshot);
criterion_main!(benches);
