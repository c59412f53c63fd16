//! Odds Engine Benchmarks — Per-Request Hot Path
//!
//! Benchmarks the pure engine functions and the registry lookups that
//! run on every `/predict` call.
//!
//! Run with: cargo bench --bench odds_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use match_odds::adapters::registry::StaticRegistry;
use match_odds::config::TeamConfig;
use match_odds::domain::odds::{
    apply_house_margin, compute_fair_odds, compute_margin_report, ProbabilityVector,
};
use match_odds::domain::prediction::validate_and_predict;
use match_odds::ports::registry::TeamRegistry;

fn registry() -> StaticRegistry {
    let teams: Vec<TeamConfig> = (0..200)
        .map(|n| TeamConfig {
            name: format!("Club {n:03}"),
            encoding: None,
            divisions: vec!["E0".to_string()],
        })
        .collect();
    StaticRegistry::from_config(&teams, &[]).expect("valid registry")
}

/// Benchmark fair odds, margin and report for one fixture.
fn bench_engine(c: &mut Criterion) {
    let p = ProbabilityVector::new(0.45, 0.27, 0.28);

    c.bench_function("fair_margin_report", |b| {
        b.iter(|| {
            let fair = compute_fair_odds(black_box(&p)).unwrap();
            let book = apply_house_margin(&fair, black_box(0.12)).unwrap();
            let _report = compute_margin_report(&book).unwrap();
        });
    });
}

/// Benchmark quoting (f64 → Decimal truncation).
fn bench_quote(c: &mut Criterion) {
    let fair = compute_fair_odds(&ProbabilityVector::new(0.45, 0.27, 0.28)).unwrap();
    let book = apply_house_margin(&fair, 0.12).unwrap();

    c.bench_function("quoted_odds", |b| {
        b.iter(|| {
            let _quoted = black_box(&book).quoted().unwrap();
        });
    });
}

/// Benchmark full validation + pricing against a 200-team registry.
fn bench_validate_and_predict(c: &mut Criterion) {
    let registry = registry();
    let p = ProbabilityVector::new(0.45, 0.27, 0.28);

    c.bench_function("validate_and_predict", |b| {
        b.iter(|| {
            let _result = validate_and_predict(
                &registry,
                &registry,
                black_box("Club 017"),
                black_box("Club 123"),
                black_box("E0"),
                p,
                0.12,
            )
            .unwrap();
        });
    });
}

/// Benchmark suggestion ranking for a misspelled name.
fn bench_suggest(c: &mut Criterion) {
    let registry = registry();

    c.bench_function("suggest_misspelled", |b| {
        b.iter(|| {
            let _names = registry.suggest(black_box("Clib 017"), 3);
        });
    });
}

criterion_group!(
    benches,
    bench_engine,
    bench_quote,
    bench_validate_and_predict,
    bench_suggest,
);
criterion_main!(benches);
