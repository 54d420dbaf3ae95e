//! Diversity metrics for a recommended list
//!
//! Intra-list distance is the mean distance over all distinct pairs of
//! recommended items' feature vectors (Ziegler et al., 2005, "Improving
//! Recommendation Lists Through Topic Diversification").

use crate::distance::{condensed_distances, DistanceMetric};
use crate::{Error, Result};
use log::{debug, warn};

/// Mean pairwise distance over all C(n, 2) distinct pairs of rows
///
/// # Errors
///
/// [`Error::InsufficientData`] with fewer than two rows,
/// [`Error::DimensionMismatch`] for ragged rows.
pub fn intra_list_distance<R: AsRef<[f64]>>(x: &[R], metric: DistanceMetric) -> Result<f64> {
    let distances = condensed_distances(x, metric)?;
    let mean = distances.iter().sum::<f64>() / distances.len() as f64;
    debug!(
        "intra_list_distance: {} records, {} pairs, metric={metric}, mean={mean}",
        x.len(),
        distances.len()
    );
    Ok(mean)
}

/// One minus [`intra_list_distance`]
///
/// Only meaningful when distances lie in [0, 1], e.g. cosine distance over
/// non-negative features. Picking such a metric is up to the caller.
pub fn intra_list_similarity<R: AsRef<[f64]>>(x: &[R], metric: DistanceMetric) -> Result<f64> {
    if !metric.is_unit_bounded() {
        warn!("intra_list_similarity with unbounded metric {metric}");
    }
    Ok(1.0 - intra_list_distance(x, metric)?)
}

/// Catalog coverage of recommended content
///
/// Not specified yet; always returns [`Error::NotImplemented`].
pub fn content_coverage() -> Result<f64> {
    Err(Error::NotImplemented("content_coverage"))
}

/// Diversity of item categories in a list
///
/// Not specified yet; always returns [`Error::NotImplemented`].
pub fn category_diversity() -> Result<f64> {
    Err(Error::NotImplemented("category_diversity"))
}
