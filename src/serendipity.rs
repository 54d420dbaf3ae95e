//! Serendipity and novelty against a benchmark
//!
//! Serendipity rewards a recommender for ranking relevant items higher than a
//! benchmark ranking (typically item popularity) would. Ranks are turned into
//! a recommendation probability proxy with [`prob`]; only gains over the
//! benchmark count.

use crate::distance::{pairwise_distances, DistanceMetric};
use crate::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Cells the serendipity mean is taken over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AveragingScope {
    /// Every user × item cell, relevant or not
    AllCells,
    /// Only cells marked relevant
    RelevantOnly,
}

impl Default for AveragingScope {
    fn default() -> Self {
        Self::AllCells
    }
}

/// Configuration for [`serendipity_with_config`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerendipityConfig {
    /// Catalog size for the probability proxy; defaults to the benchmark length
    #[serde(default)]
    pub n_items: Option<usize>,
    /// Averaging scope
    #[serde(default)]
    pub scope: AveragingScope,
}

impl SerendipityConfig {
    /// Set the catalog size
    #[must_use]
    pub const fn with_n_items(mut self, n_items: usize) -> Self {
        self.n_items = Some(n_items);
        self
    }

    /// Set the averaging scope
    #[must_use]
    pub const fn with_scope(mut self, scope: AveragingScope) -> Self {
        self.scope = scope;
        self
    }
}

/// Probability proxy of an item being recommended given its rank
///
/// `(n - rank) / (n - 1)`: rank 1 maps to 1.0, rank `n` to 0.0.
///
/// # Errors
///
/// [`Error::InvalidItemCount`] when `n <= 1`, [`Error::RankOutOfRange`]
/// when `rank` is not in `1..=n`.
pub fn prob(rank: usize, n: usize) -> Result<f64> {
    if n <= 1 {
        return Err(Error::InvalidItemCount(n));
    }
    if rank == 0 || rank > n {
        return Err(Error::RankOutOfRange { rank, n_items: n });
    }
    Ok((n as f64 - rank as f64) / (n as f64 - 1.0))
}

/// [`prob`] over a slice of ranks
pub fn probs(ranks: &[usize], n: usize) -> Result<Vec<f64>> {
    ranks.iter().map(|&rank| prob(rank, n)).collect()
}

/// Mean serendipity over all user × item cells
///
/// `rank_arr[u][i]` is the 1-based rank of item `i` for user `u`,
/// `truth_arr[u][i]` its relevance, `benchmark_ranks[i]` its benchmark rank.
/// `n_items` defaults to `benchmark_ranks.len()`.
pub fn serendipity<R, T>(
    rank_arr: &[R],
    truth_arr: &[T],
    benchmark_ranks: &[usize],
    n_items: Option<usize>,
) -> Result<f64>
where
    R: AsRef<[usize]>,
    T: AsRef<[bool]>,
{
    let config = SerendipityConfig {
        n_items,
        ..SerendipityConfig::default()
    };
    serendipity_with_config(rank_arr, truth_arr, benchmark_ranks, &config)
}

/// Serendipity with an explicit averaging scope
///
/// Each cell scores `max(prob(rank) - prob(benchmark_rank), 0)` if relevant
/// and 0 otherwise.
///
/// # Errors
///
/// [`Error::InsufficientData`] without users or cells, [`Error::DimensionMismatch`]
/// for rows that disagree with the benchmark, [`Error::InvalidItemCount`]
/// for a catalog of at most one item, [`Error::RankOutOfRange`] for any rank
/// (relevant or not) outside `1..=n_items`, [`Error::EmptyRelevantSet`] when
/// averaging over relevant cells and there are none.
pub fn serendipity_with_config<R, T>(
    rank_arr: &[R],
    truth_arr: &[T],
    benchmark_ranks: &[usize],
    config: &SerendipityConfig,
) -> Result<f64>
where
    R: AsRef<[usize]>,
    T: AsRef<[bool]>,
{
    if rank_arr.is_empty() {
        return Err(Error::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    if truth_arr.len() != rank_arr.len() {
        return Err(Error::DimensionMismatch {
            expected: rank_arr.len(),
            actual: truth_arr.len(),
        });
    }

    let n_items = config.n_items.unwrap_or(benchmark_ranks.len());
    if n_items <= 1 {
        return Err(Error::InvalidItemCount(n_items));
    }
    let benchmark_probs = probs(benchmark_ranks, n_items)?;

    let mut total = 0.0;
    let mut cells = 0usize;
    let mut relevant_cells = 0usize;
    for (ranks, truth) in rank_arr.iter().zip(truth_arr) {
        let (ranks, truth) = (ranks.as_ref(), truth.as_ref());
        for row_len in [ranks.len(), truth.len()] {
            if row_len != benchmark_ranks.len() {
                return Err(Error::DimensionMismatch {
                    expected: benchmark_ranks.len(),
                    actual: row_len,
                });
            }
        }

        for ((&rank, &relevant), benchmark) in ranks.iter().zip(truth).zip(&benchmark_probs) {
            let gain = (prob(rank, n_items)? - benchmark).max(0.0);
            cells += 1;
            if relevant {
                relevant_cells += 1;
                total += gain;
            }
        }
    }

    if cells == 0 {
        return Err(Error::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    let denominator = match config.scope {
        AveragingScope::AllCells => cells,
        AveragingScope::RelevantOnly => relevant_cells,
    };
    if denominator == 0 {
        return Err(Error::EmptyRelevantSet);
    }

    let mean = total / denominator as f64;
    debug!(
        "serendipity: {} users, {cells} cells, {relevant_cells} relevant, scope={:?}, mean={mean}",
        rank_arr.len(),
        config.scope
    );
    Ok(mean)
}

/// Mean distance between every current vector and every historical vector
///
/// Covers the full cross product, not matched pairs. Swapping the two sets
/// gives the same value only for symmetric metrics (all
/// [`DistanceMetric`] variants are).
pub fn historical_similarity<R, S>(
    x_current: &[R],
    x_historical: &[S],
    metric: DistanceMetric,
) -> Result<f64>
where
    R: AsRef<[f64]>,
    S: AsRef<[f64]>,
{
    let distances = pairwise_distances(x_current, x_historical, metric)?;
    let count = x_current.len() * x_historical.len();
    let mean = distances.iter().flatten().sum::<f64>() / count as f64;
    debug!(
        "historical_similarity: {}x{} pairs, metric={metric}, mean={mean}",
        x_current.len(),
        x_historical.len()
    );
    Ok(mean)
}
