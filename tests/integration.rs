//! Integration tests for meas

use meas::{
    distance::DistanceMetric,
    diversity::{intra_list_distance, intra_list_similarity},
    ranking::{order_from_scores, ranks_from_order, score_users, RankingConfig, UserRow},
    serendipity::{historical_similarity, serendipity_with_config, AveragingScope},
    AggregatedScores, Error, SerendipityConfig,
};

/// Four users, six items with two latent factors
fn catalog() -> (Vec<Vec<f64>>, Vec<f64>, Vec<Vec<f64>>) {
    let item_embeddings = vec![
        vec![1.0, 0.0],
        vec![0.9, 0.1],
        vec![0.0, 1.0],
        vec![0.1, 0.9],
        vec![0.5, 0.5],
        vec![-1.0, -1.0],
    ];
    // Popularity baseline, item 5 has no bias yet
    let item_biases = vec![0.3, 0.2, 0.1, 0.0, 0.4, f64::NAN];
    let user_factors = vec![
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.7, 0.7],
        vec![-0.2, 1.0],
    ];
    (item_embeddings, item_biases, user_factors)
}

#[test]
fn test_evaluation_loop_over_users() {
    let (item_embeddings, item_biases, user_factors) = catalog();
    let positives: Vec<Vec<usize>> = vec![vec![0, 1], vec![2, 3], vec![4], vec![3]];

    let mut rows: Vec<UserRow<'_>> = user_factors
        .iter()
        .zip(&positives)
        .map(|(f, p)| UserRow::embedded(f, p))
        .collect();
    // Cold-start user scored by popularity alone
    rows.push(UserRow::popularity_only(&positives[2]));

    let config = RankingConfig::default().with_k(3);
    let (per_user, aggregated) =
        score_users(&rows, 6, &item_embeddings, &item_biases, &config).expect("scoring failed");

    assert_eq!(per_user.len(), 5);
    assert_eq!(aggregated.user_count, 5);
    for scores in &per_user {
        assert!((0.0..=1.0).contains(&scores.auc));
        assert!((0.0..=1.0).contains(&scores.apk));
        assert!(scores.mrr > 0.0 && scores.mrr <= 1.0);
    }

    // First user: items 0 and 1 score highest
    assert!((per_user[0].auc - 1.0).abs() < 1e-12);
    assert!((per_user[0].apk - 1.0).abs() < 1e-12);
    // Popularity-only user: item 4 has the largest bias
    assert!((per_user[4].mrr - 1.0).abs() < 1e-12);

    let recomputed = AggregatedScores::aggregate(&per_user);
    assert_eq!(recomputed, aggregated);
}

#[test]
fn test_ranks_feed_serendipity() {
    let (item_embeddings, item_biases, user_factors) = catalog();

    let benchmark_scores: Vec<f64> = item_biases
        .iter()
        .map(|b| if b.is_nan() { 0.0 } else { *b })
        .collect();
    let benchmark_ranks = ranks_from_order(&order_from_scores(&benchmark_scores)).unwrap();

    let rank_arr: Vec<Vec<usize>> = user_factors
        .iter()
        .map(|user| {
            let scores: Vec<f64> = item_embeddings
                .iter()
                .map(|item| user.iter().zip(item).map(|(a, b)| a * b).sum())
                .collect();
            ranks_from_order(&order_from_scores(&scores)).unwrap()
        })
        .collect();
    let truth_arr = vec![
        vec![true, true, false, false, false, false],
        vec![false, false, true, true, false, false],
        vec![false, false, false, false, true, false],
        vec![false, false, false, true, false, false],
    ];

    let all = serendipity_with_config(
        &rank_arr,
        &truth_arr,
        &benchmark_ranks,
        &SerendipityConfig::default(),
    )
    .unwrap();
    let relevant = serendipity_with_config(
        &rank_arr,
        &truth_arr,
        &benchmark_ranks,
        &SerendipityConfig::default().with_scope(AveragingScope::RelevantOnly),
    )
    .unwrap();

    // Same total, 24 cells vs 6 relevant cells
    assert!(all > 0.0);
    assert!((relevant - all * 4.0).abs() < 1e-12);
}

#[test]
fn test_diversity_of_recommended_lists() {
    let (item_embeddings, _, _) = catalog();

    let redundant = [&item_embeddings[0], &item_embeddings[1]];
    let varied = [&item_embeddings[0], &item_embeddings[2]];

    let redundant_ild = intra_list_distance(&redundant, DistanceMetric::Cosine).unwrap();
    let varied_ild = intra_list_distance(&varied, DistanceMetric::Cosine).unwrap();
    assert!(varied_ild > redundant_ild);

    let varied_ils = intra_list_similarity(&varied, DistanceMetric::Cosine).unwrap();
    assert!((varied_ils - (1.0 - varied_ild)).abs() < 1e-12);

    let history = &item_embeddings[..2];
    let novel = &item_embeddings[2..4];
    let familiar = &item_embeddings[..2];
    let novel_d = historical_similarity(novel, history, DistanceMetric::Euclidean).unwrap();
    let familiar_d = historical_similarity(familiar, history, DistanceMetric::Euclidean).unwrap();
    assert!(novel_d > familiar_d);
}

#[test]
fn test_errors_surface_to_caller() {
    let single = vec![vec![1.0, 2.0]];
    assert!(matches!(
        intra_list_distance(&single, DistanceMetric::Euclidean),
        Err(Error::InsufficientData { .. })
    ));

    let rows = [UserRow::popularity_only(&[9])];
    assert_eq!(
        score_users(
            &rows,
            3,
            &[] as &[Vec<f64>],
            &[0.1, 0.2, 0.3],
            &RankingConfig::default()
        ),
        Err(Error::IndexOutOfBounds { index: 9, len: 3 })
    );
}
