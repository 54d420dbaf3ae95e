//! meas: offline evaluation metrics for recommender systems
//!
//! Stateless metric functions over precomputed embeddings, scores and
//! rankings. An external evaluation loop calls them per user or per batch.
//!
//! # Quick Start
//!
//! ```rust
//! use meas::{
//!     distance::DistanceMetric,
//!     diversity::intra_list_distance,
//!     ranking::{user_row_to_scores, RankingConfig, UserRow},
//!     serendipity::serendipity,
//! };
//!
//! // Diversity of a recommended list
//! let items = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
//! let ild = intra_list_distance(&items, DistanceMetric::Euclidean).unwrap();
//! assert!(ild > 0.0);
//!
//! // Ranking quality for one user
//! let factors = [1.0, 0.5];
//! let embeddings = vec![vec![0.9, 0.1], vec![0.1, 0.2], vec![0.4, 0.4]];
//! let biases = [0.0, 0.1, 0.0];
//! let row = UserRow::embedded(&factors, &[0]);
//! let config = RankingConfig::default();
//! let scores = user_row_to_scores(&row, 3, &embeddings, &biases, &config).unwrap();
//! assert!((scores.mrr - 1.0).abs() < 1e-12);
//!
//! // Serendipity against a popularity benchmark
//! let ranks = vec![vec![3, 2, 1], vec![2, 3, 1]];
//! let truth = vec![vec![false, true, true], vec![true, true, false]];
//! let s = serendipity(&ranks, &truth, &[3, 2, 1], None).unwrap();
//! assert!((s - 1.0 / 12.0).abs() < 1e-12);
//! ```
//!
//! # Metric Groups
//!
//! - [`diversity`] - intra-list distance and similarity
//! - [`ranking`] - ROC-AUC, average precision at k, mean reciprocal rank
//! - [`serendipity`] - gains over a benchmark ranking, historical distance
//!
//! All of them sit on the pairwise distance primitives in [`distance`].
//!
//! # Logging
//!
//! Shapes and results are reported through the `log` facade at `debug` and
//! `trace` level. No logger is installed by this crate.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::derivable_impls)]

pub mod distance;
pub mod diversity;
pub mod error;
pub mod ranking;
pub mod serendipity;

pub use distance::DistanceMetric;
pub use diversity::{intra_list_distance, intra_list_similarity};
pub use error::{Error, Result};
pub use ranking::{
    apk_via_inds_orders, mrr_via_inds_orders, user_row_to_scores, AggregatedScores,
    ColdItemPolicy, RankingConfig, UserFactors, UserRow, UserScores,
};
pub use serendipity::{
    historical_similarity, prob, serendipity, AveragingScope, SerendipityConfig,
};
