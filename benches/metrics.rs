//! Benchmarks for metric computations

use criterion::{criterion_group, criterion_main, Criterion};
use meas::{
    distance::DistanceMetric,
    diversity::intra_list_distance,
    ranking::{user_row_to_scores, RankingConfig, UserRow},
    serendipity::{historical_similarity, serendipity},
};
use std::hint::black_box;

fn create_embeddings(count: usize, dimension: usize) -> Vec<Vec<f64>> {
    (0..count)
        .map(|i| {
            (0..dimension)
                .map(|d| ((i * 31 + d * 17) % 97) as f64 / 97.0)
                .collect()
        })
        .collect()
}

fn bench_diversity(c: &mut Criterion) {
    let mut group = c.benchmark_group("diversity");

    let list = create_embeddings(50, 64);

    group.bench_function("intra_list_distance_50_euclidean", |b| {
        b.iter(|| intra_list_distance(black_box(&list), DistanceMetric::Euclidean));
    });

    group.bench_function("intra_list_distance_50_cosine", |b| {
        b.iter(|| intra_list_distance(black_box(&list), DistanceMetric::Cosine));
    });

    let history = create_embeddings(200, 64);

    group.bench_function("historical_50x200", |b| {
        b.iter(|| {
            historical_similarity(
                black_box(&list),
                black_box(&history),
                DistanceMetric::Euclidean,
            )
        });
    });

    group.finish();
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    let n_items = 10_000;
    let item_embeddings = create_embeddings(n_items, 32);
    let item_biases: Vec<f64> = (0..n_items).map(|i| (i % 13) as f64 * 0.01).collect();
    let factors = vec![0.1; 32];
    let positives: Vec<usize> = (0..n_items).step_by(500).collect();
    let config = RankingConfig::default();

    group.bench_function("user_row_10k_items", |b| {
        let row = UserRow::embedded(&factors, &positives);
        b.iter(|| {
            user_row_to_scores(
                black_box(&row),
                n_items,
                &item_embeddings,
                &item_biases,
                &config,
            )
        });
    });

    group.bench_function("popularity_row_10k_items", |b| {
        let row = UserRow::popularity_only(&positives);
        b.iter(|| {
            user_row_to_scores(
                black_box(&row),
                n_items,
                &item_embeddings,
                &item_biases,
                &config,
            )
        });
    });

    group.finish();
}

fn bench_serendipity(c: &mut Criterion) {
    let mut group = c.benchmark_group("serendipity");

    let n_items = 1000;
    let benchmark_ranks: Vec<usize> = (1..=n_items).collect();
    let rank_arr: Vec<Vec<usize>> = (0..100)
        .map(|u| (0..n_items).map(|i| (i + u * 7) % n_items + 1).collect())
        .collect();
    let truth_arr: Vec<Vec<bool>> = (0..100)
        .map(|u| (0..n_items).map(|i| (i + u) % 50 == 0).collect())
        .collect();

    group.bench_function("100_users_1000_items", |b| {
        b.iter(|| serendipity(black_box(&rank_arr), &truth_arr, &benchmark_ranks, None));
    });

    group.finish();
}

criterion_group!(benches, bench_diversity, bench_ranking, bench_serendipity);

criterion_main!(benches);
