//! Distance metrics and pairwise distance computation
//!
//! The diversity and serendipity metrics are all built on two primitives:
//!
//! - [`condensed_distances`] - distances of all distinct pairs within one set
//! - [`pairwise_distances`] - full cross-distance matrix between two sets
//!
//! The metric is chosen through [`DistanceMetric`] rather than free-form
//! parameters, so invalid choices are rejected before any work is done.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance metric between two feature vectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum DistanceMetric {
    /// L2 distance
    Euclidean,
    /// Squared L2 distance
    SqEuclidean,
    /// L1 (city block) distance
    Manhattan,
    /// L-infinity distance
    Chebyshev,
    /// Lp distance
    Minkowski {
        /// Order of the norm (must be >= 1)
        p: f64,
    },
    /// One minus cosine similarity, bounded in [0, 2]
    Cosine,
}

impl Default for DistanceMetric {
    fn default() -> Self {
        Self::Euclidean
    }
}

impl DistanceMetric {
    /// Check metric parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Minkowski { p } if !p.is_finite() || *p < 1.0 => Err(Error::InvalidConfig(
                format!("minkowski order must be finite and >= 1, got {p}"),
            )),
            _ => Ok(()),
        }
    }

    /// Distance between two vectors of equal length
    ///
    /// Length agreement is checked by the callers in this module; zipped
    /// iteration stops at the shorter slice.
    #[must_use]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let diffs = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs());
        match self {
            Self::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            Self::SqEuclidean => diffs.map(|d| d * d).sum(),
            Self::Manhattan => diffs.sum(),
            Self::Chebyshev => diffs.fold(0.0, f64::max),
            Self::Minkowski { p } => diffs.map(|d| d.powf(*p)).sum::<f64>().powf(1.0 / p),
            Self::Cosine => 1.0 - cosine_similarity(a, b),
        }
    }

    /// Whether the metric's values lie in [0, 1] for non-negative features
    ///
    /// Only such metrics give a meaningful intra-list similarity.
    #[must_use]
    pub const fn is_unit_bounded(&self) -> bool {
        matches!(self, Self::Cosine)
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euclidean => write!(f, "euclidean"),
            Self::SqEuclidean => write!(f, "sqeuclidean"),
            Self::Manhattan => write!(f, "manhattan"),
            Self::Chebyshev => write!(f, "chebyshev"),
            Self::Minkowski { p } => write!(f, "minkowski:{p}"),
            Self::Cosine => write!(f, "cosine"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let metric = match lower.as_str() {
            "euclidean" | "l2" => Self::Euclidean,
            "sqeuclidean" => Self::SqEuclidean,
            "manhattan" | "cityblock" | "l1" => Self::Manhattan,
            "chebyshev" => Self::Chebyshev,
            "cosine" => Self::Cosine,
            other => match other.strip_prefix("minkowski:") {
                Some(p) => {
                    let p = p.parse::<f64>().map_err(|_| {
                        Error::InvalidConfig(format!("invalid minkowski order: {p}"))
                    })?;
                    Self::Minkowski { p }
                }
                None => {
                    return Err(Error::InvalidConfig(format!("unknown distance metric: {s}")))
                }
            },
        };
        metric.validate()?;
        Ok(metric)
    }
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 when either vector has zero norm.
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot = dot_product(a, b);
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Dot product between two vectors
#[must_use]
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Shared row length of a matrix, or an error if rows disagree
fn row_dimension<R: AsRef<[f64]>>(x: &[R]) -> Result<usize> {
    let dim = x.first().map_or(0, |row| row.as_ref().len());
    match x.iter().map(|row| row.as_ref().len()).find(|&len| len != dim) {
        Some(actual) => Err(Error::DimensionMismatch {
            expected: dim,
            actual,
        }),
        None => Ok(dim),
    }
}

/// Distances between all distinct pairs of rows
///
/// Returns the C(n, 2) values for pairs `(i, j)` with `i < j`, ordered by
/// `i` then `j`.
pub fn condensed_distances<R: AsRef<[f64]>>(x: &[R], metric: DistanceMetric) -> Result<Vec<f64>> {
    metric.validate()?;
    if x.len() < 2 {
        return Err(Error::InsufficientData {
            required: 2,
            actual: x.len(),
        });
    }
    row_dimension(x)?;

    let n = x.len();
    let mut out = Vec::with_capacity(n * (n - 1) / 2);
    for (i, a) in x.iter().enumerate() {
        for b in &x[i + 1..] {
            out.push(metric.distance(a.as_ref(), b.as_ref()));
        }
    }
    Ok(out)
}

/// Full cross-distance matrix between two sets of rows
///
/// Entry `[i][j]` is the distance between `x[i]` and `y[j]`.
pub fn pairwise_distances<R, S>(x: &[R], y: &[S], metric: DistanceMetric) -> Result<Vec<Vec<f64>>>
where
    R: AsRef<[f64]>,
    S: AsRef<[f64]>,
{
    metric.validate()?;
    if x.is_empty() || y.is_empty() {
        return Err(Error::InsufficientData {
            required: 1,
            actual: x.len().min(y.len()),
        });
    }
    let dim_x = row_dimension(x)?;
    let dim_y = row_dimension(y)?;
    if dim_x != dim_y {
        return Err(Error::DimensionMismatch {
            expected: dim_x,
            actual: dim_y,
        });
    }

    let distances: Vec<Vec<f64>> = x
        .iter()
        .map(|a| {
            y.iter()
                .map(|b| metric.distance(a.as_ref(), b.as_ref()))
                .collect()
        })
        .collect();
    Ok(distances)
}
