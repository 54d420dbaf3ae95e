//! Offline Evaluation Loop Example
//!
//! Run with: cargo run --example evaluation_loop

use meas::{
    diversity::intra_list_distance,
    ranking::{order_from_scores, predict_scores, ranks_from_order, score_users},
    serendipity::serendipity,
    DistanceMetric, RankingConfig, UserRow,
};

fn main() -> meas::Result<()> {
    println!("=== Recommender Evaluation ===\n");

    // Five items in a 2-d latent space, with popularity biases
    let item_embeddings = vec![
        vec![0.9, 0.1],
        vec![0.8, 0.3],
        vec![0.1, 0.9],
        vec![0.2, 0.7],
        vec![0.5, 0.5],
    ];
    let item_biases = [0.3, 0.1, 0.0, 0.2, 0.4];

    let factors_a = [1.0, 0.0];
    let factors_b = [0.0, 1.0];
    let rows = [
        UserRow::embedded(&factors_a, &[0, 1]),
        UserRow::embedded(&factors_b, &[2]),
        UserRow::popularity_only(&[4]),
    ];

    println!("Items: {}, users: {}", item_embeddings.len(), rows.len());
    println!();

    // Ranking quality
    let config = RankingConfig::default().with_k(3);
    let n_items = item_biases.len();
    let (per_user, aggregated) =
        score_users(&rows, n_items, &item_embeddings, &item_biases, &config)?;

    println!("=== Ranking (k = {}) ===\n", config.k);
    println!("| user | AUC   | APK   | MRR   |");
    println!("|------|-------|-------|-------|");
    for (user, scores) in per_user.iter().enumerate() {
        println!(
            "| {user:4} | {:.3} | {:.3} | {:.3} |",
            scores.auc, scores.apk, scores.mrr
        );
    }

    println!();
    println!("Mean AUC: {:.3}", aggregated.mean_auc);
    println!("MAP@{}: {:.3}", config.k, aggregated.map);
    println!("Mean MRR: {:.3}", aggregated.mean_mrr);
    println!();

    // Diversity of each user's top 3
    println!("=== Diversity of top 3 ===\n");
    let mut rank_arr = Vec::new();
    for (user, row) in rows.iter().enumerate() {
        let scores = predict_scores(
            row.factors,
            n_items,
            &item_embeddings,
            &item_biases,
            config.cold_items,
        )?;
        let order = order_from_scores(&scores);
        let top: Vec<&[f64]> = order
            .iter()
            .take(3)
            .map(|&i| item_embeddings[i].as_slice())
            .collect();
        let ild = intra_list_distance(&top, DistanceMetric::Cosine)?;
        println!("User {user}: top {:?}, cosine ILD {ild:.3}", &order[..3]);
        rank_arr.push(ranks_from_order(&order)?);
    }
    println!();

    // Serendipity against the popularity ranking
    let benchmark_ranks = ranks_from_order(&order_from_scores(&item_biases))?;
    let truth_arr: Vec<Vec<bool>> = rows
        .iter()
        .map(|row| {
            (0..n_items)
                .map(|i| row.positive_indices.contains(&i))
                .collect()
        })
        .collect();
    let s = serendipity(&rank_arr, &truth_arr, &benchmark_ranks, None)?;

    println!("=== Serendipity ===\n");
    println!("Benchmark ranks (popularity): {benchmark_ranks:?}");
    println!("Serendipity: {s:.4}");

    println!("\n=== Evaluation Complete ===");
    Ok(())
}
