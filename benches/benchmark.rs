// Matching pipeline benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use morphmatch_core::{
    normalize, Archetype, ArchetypeRecord, BmiRange, Gender, MuscularityLevel, NoopObserver,
    SemanticProfile, Sex,
};
use morphmatch_similarity::Matcher;
use morphmatch_storage::InMemoryCatalog;
use rand::prelude::*;
use std::sync::Arc;

fn generate_random_archetype(id: usize) -> Archetype {
    let mut rng = rand::rng();
    let level = MuscularityLevel::ALL[rng.random_range(0..MuscularityLevel::ALL.len())];
    let min = rng.random_range(16.0..38.0);
    Archetype::new(
        format!("M-{id:05}"),
        Gender::Masculine,
        BmiRange::new(min, min + rng.random_range(1.0..6.0)).unwrap(),
        rng.random_range(-0.5..0.5),
        rng.random_range(-1.0..1.0),
    )
    .with_labels("Normal", level.label(), "Intermédiaire", "Mésomorphe")
}

fn generate_catalog(size: usize) -> Vec<ArchetypeRecord> {
    (0..size)
        .map(|i| ArchetypeRecord::from(&generate_random_archetype(i)))
        .collect()
}

fn profile(bmi: f64) -> SemanticProfile {
    SemanticProfile::new(Sex::Male, bmi)
        .with_muscularity("musclé")
        .with_obesity("Normal")
        .with_indices(0.1, 0.3)
}

fn benchmark_normalize(c: &mut Criterion) {
    let labels = [
        "musclé",
        "Très Athlétique",
        "légèrement atrophié",
        "moyennement musclée",
        "unrecognized label",
    ];

    c.bench_function("normalize", |b| {
        b.iter(|| {
            for label in labels {
                black_box(normalize(Some(black_box(label))));
            }
        })
    });
}

fn benchmark_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let matcher = Matcher::default();

    for size in [50, 500, 5000].iter() {
        let records = generate_catalog(*size);
        group.bench_with_input(BenchmarkId::new("strict", size), size, |b, _| {
            let profile = profile(23.0);
            b.iter(|| {
                black_box(matcher.rank(&profile, records.clone(), None, &NoopObserver));
            });
        });
        group.bench_with_input(BenchmarkId::new("relaxed", size), size, |b, _| {
            // no strict band reaches 60
            let profile = profile(60.0);
            b.iter(|| {
                black_box(matcher.rank(&profile, records.clone(), None, &NoopObserver));
            });
        });
    }

    group.finish();
}

fn benchmark_concurrent_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    let catalog = Arc::new(InMemoryCatalog::from_records(generate_catalog(1000)));
    let matcher = Arc::new(Matcher::default());

    group.bench_function("matches_4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let catalog = catalog.clone();
                    let matcher = matcher.clone();
                    std::thread::spawn(move || {
                        let profile = profile(20.0 + t as f64 * 2.0);
                        for _ in 0..10 {
                            black_box(
                                matcher
                                    .match_archetypes_observed(
                                        catalog.as_ref(),
                                        &profile,
                                        Some(5),
                                        &NoopObserver,
                                    )
                                    .unwrap(),
                            );
                        }
                    })
                })
                .collect();

            for handle in handles {
                black_box(handle.join().unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_normalize, benchmark_rank, benchmark_concurrent_matches);
criterion_main!(benches);
