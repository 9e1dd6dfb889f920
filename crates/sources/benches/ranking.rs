//! Benchmarks for the reference ranking engine
//!
//! Run with: cargo bench --package sources
//!
//! Uses a synthetic dataset so the numbers don't depend on local data files.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Dataset, EntityRecord, RelationshipRow};
use pipeline::{translate, PreferenceSet, RankingEngine};
use sources::{build_owner_profile, EmbeddingSimilarityEngine};

const REPOSITORIES: u64 = 20_000;
const OWNERS: u64 = 2_000;
const DIMENSION: usize = 64;

fn synthetic_dataset() -> Dataset {
    let base = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let records = (0..REPOSITORIES)
        .map(|id| EntityRecord {
            id,
            name: format!("repo-{}", id),
            owner_user: format!("owner-{}", id % OWNERS),
            description: None,
            date_pushed: base + chrono::Duration::days((id % 365) as i64),
            stars: (id % 1000) as u32,
            has_wiki: id % 2 == 0,
            has_discussions: id % 3 == 0,
        })
        .collect();

    let rows = (0..REPOSITORIES)
        .map(|id| RelationshipRow {
            owner_user: format!("owner-{}", id % OWNERS),
            entity_id: id,
            embedding: (0..DIMENSION)
                .map(|d| ((id as usize * 31 + d * 7) % 97) as f32 / 97.0)
                .collect(),
        })
        .collect();

    Dataset::from_parts(records, rows).expect("Failed to build synthetic dataset")
}

fn bench_rank(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    let engine = EmbeddingSimilarityEngine::new();
    let weights = translate(&PreferenceSet::default());

    c.bench_function("embedding_similarity_rank", |b| {
        b.iter(|| {
            let ranked = engine
                .rank(
                    black_box("owner-1"),
                    &dataset.catalog,
                    &dataset.relationships,
                    &weights,
                    black_box(10),
                )
                .unwrap();
            black_box(ranked)
        })
    });
}

fn bench_build_owner_profile(c: &mut Criterion) {
    let dataset = synthetic_dataset();

    c.bench_function("build_owner_profile", |b| {
        b.iter(|| {
            let profile = build_owner_profile(&dataset.relationships, black_box("owner-1")).unwrap();
            black_box(profile)
        })
    });
}

criterion_group!(benches, bench_rank, bench_build_owner_profile);
criterion_main!(benches);
