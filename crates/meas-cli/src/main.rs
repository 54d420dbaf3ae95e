//! meas CLI
//!
//! Command-line driver for the meas evaluation metrics. Each command reads one
//! JSON document and prints the resulting statistics.
//!
//! ## Usage
//!
//! ```bash
//! # Diversity of a recommended list (optionally against a history)
//! meas diversity --input list.json --metric cosine
//!
//! # AUC / APK / MRR per user and their means
//! meas ranking --input users.json --k 10 --format json
//!
//! # Serendipity against a benchmark ranking
//! meas serendipity --input ranks.json --scope relevant-only
//! ```
//!
//! Set `RUST_LOG=debug` to see the library's diagnostics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use meas::{
    diversity::{intra_list_distance, intra_list_similarity},
    ranking::{score_users, AggregatedScores, ColdItemPolicy, RankingConfig, UserRow, UserScores},
    serendipity::{historical_similarity, serendipity_with_config, AveragingScope},
    DistanceMetric, SerendipityConfig,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Replacement for NaN predicted scores
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColdItems {
    /// Score 0
    #[default]
    Zero,
    /// Ranked last
    Bottom,
}

impl From<ColdItems> for ColdItemPolicy {
    fn from(value: ColdItems) -> Self {
        match value {
            ColdItems::Zero => Self::Zero,
            ColdItems::Bottom => Self::Bottom,
        }
    }
}

/// Serendipity averaging scope
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Scope {
    /// Mean over every user x item cell
    #[default]
    AllCells,
    /// Mean over relevant cells only
    RelevantOnly,
}

impl From<Scope> for AveragingScope {
    fn from(value: Scope) -> Self {
        match value {
            Scope::AllCells => Self::AllCells,
            Scope::RelevantOnly => Self::RelevantOnly,
        }
    }
}

#[derive(Parser)]
#[command(name = "meas")]
#[command(version)]
#[command(about = "Offline recommender evaluation metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Intra-list distance/similarity of a list, and distance to a history
    Diversity {
        /// JSON file with `items` and optional `historical`
        #[arg(short, long)]
        input: String,

        /// Distance metric (euclidean, sqeuclidean, manhattan, chebyshev, cosine, minkowski:<p>)
        #[arg(short, long, default_value = "euclidean")]
        metric: DistanceMetric,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// AUC, average precision at k and MRR for every user
    Ranking {
        /// JSON file with `item_embeddings`, `item_biases` and `users`
        #[arg(short, long)]
        input: String,

        /// Cutoff for average precision
        #[arg(short, long, default_value = "10")]
        k: usize,

        /// Treatment of NaN predicted scores
        #[arg(long, value_enum, default_value = "zero")]
        cold_items: ColdItems,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Serendipity of user rankings against a benchmark ranking
    Serendipity {
        /// JSON file with `ranks`, `truth` and `benchmark_ranks`
        #[arg(short, long)]
        input: String,

        /// Catalog size (defaults to the benchmark length)
        #[arg(short, long)]
        n_items: Option<usize>,

        /// Cells to average over
        #[arg(short, long, value_enum, default_value = "all-cells")]
        scope: Scope,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show supported metrics
    Info,
}

/// Input of the `diversity` command
#[derive(Deserialize)]
struct DiversityInput {
    items: Vec<Vec<f64>>,
    #[serde(default)]
    historical: Option<Vec<Vec<f64>>>,
}

/// Output of the `diversity` command
#[derive(Serialize)]
struct DiversityReport {
    metric: String,
    intra_list_distance: f64,
    /// Only reported for metrics bounded to `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    intra_list_similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    historical_distance: Option<f64>,
}

/// One user of the `ranking` command; `factors: null` means popularity only
#[derive(Deserialize)]
struct UserInput {
    #[serde(default)]
    factors: Option<Vec<f64>>,
    positive_indices: Vec<usize>,
}

/// Input of the `ranking` command
#[derive(Deserialize)]
struct RankingInput {
    #[serde(default)]
    item_embeddings: Vec<Vec<f64>>,
    item_biases: Vec<Option<f64>>,
    users: Vec<UserInput>,
}

/// Output of the `ranking` command
#[derive(Serialize)]
struct RankingReport {
    k: usize,
    users: Vec<UserScores>,
    aggregated: AggregatedScores,
}

/// Input of the `serendipity` command
#[derive(Deserialize)]
struct SerendipityInput {
    ranks: Vec<Vec<usize>>,
    truth: Vec<Vec<bool>>,
    benchmark_ranks: Vec<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Diversity {
            input,
            metric,
            format,
        } => run_diversity(&input, metric, format)?,
        Commands::Ranking {
            input,
            k,
            cold_items,
            format,
        } => run_ranking(&input, k, cold_items, format)?,
        Commands::Serendipity {
            input,
            n_items,
            scope,
            format,
        } => run_serendipity(&input, n_items, scope, format)?,
        Commands::Info => run_info(),
    }

    Ok(())
}

fn read_input<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T> {
    let path = Path::new(path);
    if !path.exists() {
        anyhow::bail!("Input not found: {}", path.display());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = serde_json::from_str(&json)
        .with_context(|| format!("Invalid input JSON in {}", path.display()))?;
    info!("loaded {}", path.display());
    Ok(parsed)
}

fn run_info() {
    println!("meas - recommender evaluation metrics");
    println!("=====================================");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Metrics:");
    println!("  - Diversity: intra-list distance, intra-list similarity, historical distance");
    println!("  - Ranking: ROC-AUC, average precision at k, mean reciprocal rank");
    println!("  - Serendipity: gain over a benchmark ranking");
    println!();
    println!(
        "Distance metrics: euclidean, sqeuclidean, manhattan, chebyshev, cosine, minkowski:<p>"
    );
}

fn run_diversity(input: &str, metric: DistanceMetric, format: OutputFormat) -> Result<()> {
    let data: DiversityInput = read_input(input)?;

    let report = DiversityReport {
        metric: metric.to_string(),
        intra_list_distance: intra_list_distance(&data.items, metric)
            .context("Failed to compute intra-list distance")?,
        intra_list_similarity: metric
            .is_unit_bounded()
            .then(|| intra_list_similarity(&data.items, metric))
            .transpose()
            .context("Failed to compute intra-list similarity")?,
        historical_distance: data
            .historical
            .as_deref()
            .map(|historical| historical_similarity(&data.items, historical, metric))
            .transpose()
            .context("Failed to compute historical distance")?,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Diversity ({} items, metric: {})", data.items.len(), report.metric);
            println!("{}", "-".repeat(50));
            println!("Intra-list distance:   {:.6}", report.intra_list_distance);
            if let Some(similarity) = report.intra_list_similarity {
                println!("Intra-list similarity: {similarity:.6}");
            }
            if let Some(distance) = report.historical_distance {
                println!("Historical distance:   {distance:.6}");
            }
        }
    }

    Ok(())
}

fn run_ranking(input: &str, k: usize, cold_items: ColdItems, format: OutputFormat) -> Result<()> {
    let data: RankingInput = read_input(input)?;

    // JSON has no NaN; missing biases arrive as null
    let item_biases: Vec<f64> = data
        .item_biases
        .iter()
        .map(|bias| bias.unwrap_or(f64::NAN))
        .collect();
    let n_items = item_biases.len();

    let rows: Vec<UserRow<'_>> = data
        .users
        .iter()
        .map(|user| match &user.factors {
            Some(factors) => UserRow::embedded(factors, &user.positive_indices),
            None => UserRow::popularity_only(&user.positive_indices),
        })
        .collect();

    let config = RankingConfig::default()
        .with_k(k)
        .with_cold_items(cold_items.into());
    let (users, aggregated) = score_users(
        &rows,
        n_items,
        &data.item_embeddings,
        &item_biases,
        &config,
    )
    .context("Failed to score users")?;

    let report = RankingReport {
        k,
        users,
        aggregated,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Ranking ({} users, {} items)", report.users.len(), n_items);
            println!("{}", "-".repeat(50));
            for (i, scores) in report.users.iter().enumerate() {
                println!(
                    "user {i}: auc={:.4} apk@{k}={:.4} mrr={:.4}",
                    scores.auc, scores.apk, scores.mrr
                );
            }
            println!("{}", "=".repeat(50));
            println!("Mean AUC: {:.4}", report.aggregated.mean_auc);
            println!("MAP@{k}:   {:.4}", report.aggregated.map);
            println!("Mean MRR: {:.4}", report.aggregated.mean_mrr);
        }
    }

    Ok(())
}

fn run_serendipity(
    input: &str,
    n_items: Option<usize>,
    scope: Scope,
    format: OutputFormat,
) -> Result<()> {
    let data: SerendipityInput = read_input(input)?;

    let config = SerendipityConfig {
        n_items,
        scope: scope.into(),
    };
    let score = serendipity_with_config(&data.ranks, &data.truth, &data.benchmark_ranks, &config)
        .context("Failed to compute serendipity")?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "serendipity": score,
                "users": data.ranks.len(),
                "config": config,
            }))?
        ),
        OutputFormat::Text => {
            println!("Serendipity ({} users): {score:.6}", data.ranks.len());
        }
    }

    Ok(())
}
