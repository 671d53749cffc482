//! Benchmarks for the similarity engines
//!
//! Run with: cargo bench --package recommender
//!
//! Uses a synthetic store so the bench runs without the dataset export.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{DatasetStore, InteractionRecord, Sentiment};
use recommender::{ContentRecommender, UserItemMatrix, UserNeighborRecommender};
use std::sync::Arc;

fn synthetic_store(n_users: usize, n_items: usize) -> Arc<DatasetStore> {
    let mut store = DatasetStore::new();
    for user in 0..n_users {
        // Each user plays a sliding window of games
        for offset in 0..10 {
            let item = ((user * 3 + offset * 7) % n_items) as u32;
            store.push_record(InteractionRecord {
                user_id: format!("user-{user}"),
                item_id: item,
                item_name: format!("Game {item}"),
                genres: vec![
                    format!("Genre{}", item % 12),
                    format!("Genre{}", (item / 12) % 12),
                ],
                playtime_minutes: ((user + offset) % 400) as f64 + 1.0,
                release_year: Some(2000 + (item % 20) as u16),
                review_year: Some(2012 + (item % 5) as u16),
                recommend: item % 3 != 0,
                sentiment: match item % 3 {
                    0 => Sentiment::Negative,
                    1 => Sentiment::Neutral,
                    _ => Sentiment::Positive,
                },
            });
        }
    }
    Arc::new(store)
}

fn bench_matrix_build(c: &mut Criterion) {
    let store = synthetic_store(500, 300);

    c.bench_function("user_item_matrix_build", |b| {
        b.iter(|| {
            let matrix = UserItemMatrix::from_store(black_box(&store));
            black_box(matrix)
        })
    });
}

fn bench_neighbor_recommend(c: &mut Criterion) {
    let store = synthetic_store(500, 300);
    let matrix = Arc::new(UserItemMatrix::from_store(&store));
    let recommender = UserNeighborRecommender::new(matrix);

    c.bench_function("neighbor_recommend", |b| {
        b.iter(|| {
            let recs = recommender.recommend(black_box("user-42")).unwrap();
            black_box(recs)
        })
    });
}

fn bench_content_recommend(c: &mut Criterion) {
    let store = synthetic_store(500, 300);
    let recommender = ContentRecommender::new(store);
    // Warm the lazily built model so the bench measures the lookup
    recommender.recommend(1, 5).unwrap();

    c.bench_function("content_recommend", |b| {
        b.iter(|| {
            let recs = recommender.recommend(black_box(42), black_box(5)).unwrap();
            black_box(recs)
        })
    });
}

criterion_group!(
    benches,
    bench_matrix_build,
    bench_neighbor_recommend,
    bench_content_recommend
);
criterion_main!(benches);
