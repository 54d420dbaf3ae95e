//! Ranking quality metrics for a single user
//!
//! All metrics share one descending-score `order` (item indices, best first)
//! and its inverse, the 1-based `ranks`:
//!
//! ```rust
//! use meas::ranking::{order_from_scores, ranks_from_order};
//!
//! let order = order_from_scores(&[0.1, 0.9, 0.5]);
//! assert_eq!(order, vec![1, 2, 0]);
//! assert_eq!(ranks_from_order(&order).unwrap(), vec![3, 1, 2]);
//! ```

use crate::distance::dot_product;
use crate::{Error, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How NaN predicted scores (cold or missing items) are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColdItemPolicy {
    /// Replace NaN with a neutral score of 0
    Zero,
    /// Replace NaN with negative infinity, ranking the item last
    Bottom,
}

impl Default for ColdItemPolicy {
    fn default() -> Self {
        Self::Zero
    }
}

impl ColdItemPolicy {
    fn fill(self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Bottom => f64::NEG_INFINITY,
        }
    }
}

/// Configuration for per-user ranking scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Cutoff for average precision
    pub k: usize,
    /// NaN score replacement
    #[serde(default)]
    pub cold_items: ColdItemPolicy,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            k: 10,
            cold_items: ColdItemPolicy::Zero,
        }
    }
}

impl RankingConfig {
    /// Set the average precision cutoff
    #[must_use]
    pub const fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the NaN score replacement
    #[must_use]
    pub const fn with_cold_items(mut self, cold_items: ColdItemPolicy) -> Self {
        self.cold_items = cold_items;
        self
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// User representation used to score items
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserFactors<'a> {
    /// Latent user vector, dotted with each item embedding
    Embedded(&'a [f64]),
    /// No user vector: items are scored by their bias alone
    PopularityOnly,
}

/// One user's scoring input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserRow<'a> {
    /// User representation
    pub factors: UserFactors<'a>,
    /// Indices of relevant items (duplicates are ignored)
    pub positive_indices: &'a [usize],
}

impl<'a> UserRow<'a> {
    /// Row for a user with a latent vector
    #[must_use]
    pub const fn embedded(factors: &'a [f64], positive_indices: &'a [usize]) -> Self {
        Self {
            factors: UserFactors::Embedded(factors),
            positive_indices,
        }
    }

    /// Row scored by item popularity only
    #[must_use]
    pub const fn popularity_only(positive_indices: &'a [usize]) -> Self {
        Self {
            factors: UserFactors::PopularityOnly,
            positive_indices,
        }
    }
}

/// Ranking scores for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserScores {
    /// Area under the ROC curve
    pub auc: f64,
    /// Average precision at k
    pub apk: f64,
    /// Mean reciprocal rank of the relevant items
    pub mrr: f64,
}

/// Mean scores over a batch of users
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedScores {
    /// Mean AUC
    pub mean_auc: f64,
    /// Mean average precision at k (MAP@k)
    pub map: f64,
    /// Mean MRR
    pub mean_mrr: f64,
    /// Number of users
    pub user_count: usize,
}

impl AggregatedScores {
    /// Aggregate per-user scores
    pub fn aggregate(scores: &[UserScores]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let n = scores.len() as f64;
        Self {
            mean_auc: scores.iter().map(|s| s.auc).sum::<f64>() / n,
            map: scores.iter().map(|s| s.apk).sum::<f64>() / n,
            mean_mrr: scores.iter().map(|s| s.mrr).sum::<f64>() / n,
            user_count: scores.len(),
        }
    }
}

/// Total order on scores in which `-0.0` and `0.0` are equal
fn cmp_scores(a: f64, b: f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// Item indices sorted by descending score
///
/// Equal scores keep ascending index order.
#[must_use]
pub fn order_from_scores(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| cmp_scores(scores[b], scores[a]));
    order
}

/// 1-based rank of every item given a descending order
///
/// `ranks[order[i]] == i + 1` for every position `i`.
pub fn ranks_from_order(order: &[usize]) -> Result<Vec<usize>> {
    let n = order.len();
    let mut ranks = vec![0usize; n];
    for (position, &item) in order.iter().enumerate() {
        if item >= n {
            return Err(Error::InvalidPermutation(format!(
                "item {item} out of range for {n} items"
            )));
        }
        if ranks[item] != 0 {
            return Err(Error::InvalidPermutation(format!(
                "item {item} appears more than once"
            )));
        }
        ranks[item] = position + 1;
    }
    Ok(ranks)
}

/// Membership mask of the positive set over `n_items`
fn relevance_mask(positive_indices: &[usize], n_items: usize) -> Result<(Vec<bool>, usize)> {
    let mut mask = vec![false; n_items];
    let mut count = 0;
    for &index in positive_indices {
        if index >= n_items {
            return Err(Error::IndexOutOfBounds {
                index,
                len: n_items,
            });
        }
        if !mask[index] {
            mask[index] = true;
            count += 1;
        }
    }
    if count == 0 {
        return Err(Error::EmptyRelevantSet);
    }
    Ok((mask, count))
}

/// Area under the ROC curve
///
/// Trapezoidal rule over distinct score thresholds; tied scores across
/// classes earn half credit.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] if lengths differ, [`Error::DegenerateLabels`]
/// if the labels hold only one class.
pub fn roc_auc(labels: &[bool], scores: &[f64]) -> Result<f64> {
    if labels.len() != scores.len() {
        return Err(Error::DimensionMismatch {
            expected: labels.len(),
            actual: scores.len(),
        });
    }

    let total_pos = labels.iter().filter(|&&l| l).count();
    let total_neg = labels.len() - total_pos;
    if total_pos == 0 || total_neg == 0 {
        return Err(Error::DegenerateLabels(format!(
            "need both classes, got {total_pos} positive and {total_neg} negative"
        )));
    }

    let order = order_from_scores(scores);
    let p = total_pos as f64;
    let n = total_neg as f64;

    let (mut tp, mut fp) = (0usize, 0usize);
    let (mut prev_fpr, mut prev_tpr) = (0.0, 0.0);
    let mut auc = 0.0;

    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && cmp_scores(scores[order[i]], threshold) == Ordering::Equal {
            if labels[order[i]] {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }

        let fpr = fp as f64 / n;
        let tpr = tp as f64 / p;
        auc += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
        prev_fpr = fpr;
        prev_tpr = tpr;
    }

    Ok(auc)
}

/// Average precision at cutoff `k`
///
/// `order` is the full descending order over all items; only its first `k`
/// entries are scored.
///
/// APK = Σ_{i < k, order[i] relevant} (hits so far / (i + 1)) / min(|relevant|, k)
///
/// # Errors
///
/// [`Error::EmptyRelevantSet`] without relevant items,
/// [`Error::InvalidConfig`] for `k == 0`.
pub fn apk_via_inds_orders(positive_indices: &[usize], order: &[usize], k: usize) -> Result<f64> {
    if k == 0 {
        return Err(Error::InvalidConfig("k must be at least 1".to_string()));
    }
    ranks_from_order(order)?;
    let (mask, n_relevant) = relevance_mask(positive_indices, order.len())?;

    let mut hits = 0usize;
    let mut score = 0.0;
    for (i, &item) in order.iter().take(k).enumerate() {
        if mask[item] {
            hits += 1;
            score += hits as f64 / (i + 1) as f64;
        }
    }

    Ok(score / n_relevant.min(k) as f64)
}

/// Mean of `1 / rank` over the relevant items
///
/// Ranks are the 1-based inverse of `order`.
///
/// # Errors
///
/// [`Error::EmptyRelevantSet`] without relevant items; at least one is
/// required.
pub fn mrr_via_inds_orders(positive_indices: &[usize], order: &[usize]) -> Result<f64> {
    let ranks = ranks_from_order(order)?;
    let (mask, n_relevant) = relevance_mask(positive_indices, order.len())?;

    let sum: f64 = mask
        .iter()
        .zip(ranks.iter())
        .filter(|&(&relevant, _)| relevant)
        .map(|(_, &rank)| 1.0 / rank as f64)
        .sum();

    Ok(sum / n_relevant as f64)
}

/// Predicted score of every item for one user
///
/// Item biases always contribute. [`UserFactors::PopularityOnly`] skips only
/// the embedding term, leaving the bias as a popularity baseline. NaN scores
/// are replaced per `cold_items`.
pub fn predict_scores<E: AsRef<[f64]>>(
    factors: UserFactors<'_>,
    n_items: usize,
    item_embeddings: &[E],
    item_biases: &[f64],
    cold_items: ColdItemPolicy,
) -> Result<Vec<f64>> {
    if item_biases.len() != n_items {
        return Err(Error::DimensionMismatch {
            expected: n_items,
            actual: item_biases.len(),
        });
    }

    let mut scores = match factors {
        UserFactors::Embedded(user) => {
            if item_embeddings.len() != n_items {
                return Err(Error::DimensionMismatch {
                    expected: n_items,
                    actual: item_embeddings.len(),
                });
            }
            let mut scores = Vec::with_capacity(n_items);
            for (embedding, bias) in item_embeddings.iter().zip(item_biases) {
                let embedding = embedding.as_ref();
                if embedding.len() != user.len() {
                    return Err(Error::DimensionMismatch {
                        expected: user.len(),
                        actual: embedding.len(),
                    });
                }
                scores.push(dot_product(user, embedding) + bias);
            }
            scores
        }
        UserFactors::PopularityOnly => item_biases.to_vec(),
    };

    let fill = cold_items.fill();
    for score in scores.iter_mut().filter(|s| s.is_nan()) {
        *score = fill;
    }
    Ok(scores)
}

/// AUC, APK and MRR for one user
///
/// Builds the relevance vector from `row.positive_indices`, scores every item
/// with [`predict_scores`] and evaluates all three metrics on one shared
/// order. Inputs are not modified.
///
/// # Errors
///
/// [`Error::EmptyRelevantSet`] for a user without relevant items,
/// [`Error::DegenerateLabels`] if every item is relevant, shape errors from
/// [`predict_scores`].
pub fn user_row_to_scores<E: AsRef<[f64]>>(
    row: &UserRow<'_>,
    n_items: usize,
    item_embeddings: &[E],
    item_biases: &[f64],
    config: &RankingConfig,
) -> Result<UserScores> {
    config.validate()?;
    let (labels, _) = relevance_mask(row.positive_indices, n_items)?;
    let scores = predict_scores(
        row.factors,
        n_items,
        item_embeddings,
        item_biases,
        config.cold_items,
    )?;

    let auc = roc_auc(&labels, &scores)?;
    let order = order_from_scores(&scores);
    let apk = apk_via_inds_orders(row.positive_indices, &order, config.k)?;
    let mrr = mrr_via_inds_orders(row.positive_indices, &order)?;

    let result = UserScores { auc, apk, mrr };
    trace!("user scores over {n_items} items: {result:?}");
    Ok(result)
}

/// [`user_row_to_scores`] for every row, then the batch means
///
/// Stops at the first failing row.
pub fn score_users<E: AsRef<[f64]>>(
    rows: &[UserRow<'_>],
    n_items: usize,
    item_embeddings: &[E],
    item_biases: &[f64],
    config: &RankingConfig,
) -> Result<(Vec<UserScores>, AggregatedScores)> {
    let scores = rows
        .iter()
        .map(|row| user_row_to_scores(row, n_items, item_embeddings, item_biases, config))
        .collect::<Result<Vec<_>>>()?;
    let aggregated = AggregatedScores::aggregate(&scores);
    debug!(
        "scored {} users: auc={:.4} map@{}={:.4} mrr={:.4}",
        aggregated.user_count, aggregated.mean_auc, config.k, aggregated.map, aggregated.mean_mrr
    );
    Ok((scores, aggregated))
}
