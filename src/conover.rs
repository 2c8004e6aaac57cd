//! Conover-Iman pairwise comparisons following a rejected Kruskal-Wallis test.
//!
//! For each unordered pair of groups (i, j), with `n = n_i + n_j`, k groups,
//! omnibus statistic H and `R = Σ xᵢ²` over every raw observed value:
//!
//! ```text
//! s² = (R − n(n+1)²/4) / (n − 1)
//! se = s² · (n − 1 − H)/(n − k) · (1/n_i + 1/n_j)
//! t  = |M_i − M_j| / se,   df = n − k
//! ```
//!
//! The critical value is the one-sided Student-t quantile at 1 − α and the
//! p-value is `1 − F_t(t)`. α, H and k come from the omnibus result
//! unchanged. No multiplicity correction is applied.
//!
//! # Pair order
//!
//! Pairs are emitted in [`pair_indices`] order over the group registry:
//! `(0,1), (0,2), …, (0,k−1), (1,2), …, (k−2,k−1)`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::distributions::StudentT;
use crate::error::{Error, Result};
use crate::kruskal::{Decision, RejectedOmnibus};

/// Result of one pairwise comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub first: String,
    pub second: String,
    /// |M_first − M_second|.
    pub mean_rank_difference: f64,
    /// Denominator of the t statistic.
    pub standard_error: f64,
    pub t_statistic: f64,
    /// n_first + n_second − k.
    pub degrees_of_freedom: usize,
    pub critical_value: f64,
    pub p_value: f64,
    pub decision: Decision,
}

impl fmt::Display for PairwiseComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {}: t = {:.4}, df = {}, critical t = {:.4}, p = {:.4}: {}",
            self.first,
            self.second,
            self.t_statistic,
            self.degrees_of_freedom,
            self.critical_value,
            self.p_value,
            self.decision
        )
    }
}

/// Unordered index pairs `(i, j)`, `i < j < k`, in lexicographic order.
///
/// Yields `k(k−1)/2` pairs.
///
/// # Examples
/// ```
/// use u_ranktest::conover::pair_indices;
/// let pairs: Vec<_> = pair_indices(4).collect();
/// assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
/// ```
pub fn pair_indices(k: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..k).flat_map(move |i| (i + 1..k).map(move |j| (i, j)))
}

/// Runs Conover-Iman comparisons for every pair of groups.
///
/// # Errors
/// [`Error::NoResidualDegreesOfFreedom`] if some pair has `n_i + n_j ≤ k`;
/// no records are returned in that case.
///
/// # Examples
/// ```
/// use u_ranktest::data::Observations;
/// use u_ranktest::kruskal::kruskal_wallis;
/// use u_ranktest::conover::conover_iman;
///
/// let obs = Observations::new(
///     ["a", "a", "a", "a", "b", "b", "c", "c", "c", "c"],
///     [1.0, 2.0, 1.0, 2.0, 0.0, 0.0, 3.0, 3.0, 3.0, 4.0],
/// )
/// .unwrap();
/// let outcome = kruskal_wallis(&obs, 0.05).unwrap();
/// let rejected = outcome.rejected().unwrap();
/// let pairs = conover_iman(rejected).unwrap();
/// assert_eq!(pairs.len(), 3);
/// assert_eq!((pairs[2].first.as_str(), pairs[2].second.as_str()), ("b", "c"));
/// assert!(pairs[2].decision.is_reject());
/// ```
pub fn conover_iman(omnibus: &RejectedOmnibus) -> Result<Vec<PairwiseComparison>> {
    let summary = omnibus.summary();
    let k = summary.n_groups;
    let h = summary.h_statistic;
    let alpha = summary.alpha;
    let sum_sq = omnibus.sum_of_squared_values();

    let mut comparisons = Vec::with_capacity(k * k.saturating_sub(1) / 2);
    for (i, j) in pair_indices(k) {
        let a = &summary.groups[i];
        let b = &summary.groups[j];
        let n = a.count + b.count;

        let residual = n as i64 - k as i64;
        if residual <= 0 {
            return Err(Error::NoResidualDegreesOfFreedom {
                first: a.label.clone(),
                second: b.label.clone(),
                df: residual,
            });
        }
        let df = residual as usize;

        let n = n as f64;
        let diff = (a.mean_rank - b.mean_rank).abs();
        let s2 = (sum_sq - n * (n + 1.0).powi(2) / 4.0) / (n - 1.0);
        let se = s2 * ((n - 1.0 - h) / df as f64) * (1.0 / a.count as f64 + 1.0 / b.count as f64);
        if !(se.is_finite() && se > 0.0) {
            warn!(
                first = %a.label,
                second = %b.label,
                se,
                "non-positive standard error; t statistic sign or magnitude is not meaningful"
            );
        }
        let t = diff / se;

        let dist = StudentT::new(df as f64)?;
        let critical_value = dist
            .upper_critical(alpha)
            .ok_or(Error::InvalidAlpha(alpha))?;
        let p_value = dist.sf(t);
        let decision = Decision::from_statistic(t, critical_value);

        debug!(first = %a.label, second = %b.label, t, df, p = p_value, "pair compared");

        comparisons.push(PairwiseComparison {
            first: a.label.clone(),
            second: b.label.clone(),
            mean_rank_difference: diff,
            standard_error: se,
            t_statistic: t,
            degrees_of_freedom: df,
            critical_value,
            p_value,
            decision,
        });
    }

    info!(
        pairs = comparisons.len(),
        rejected = comparisons.iter().filter(|c| c.decision.is_reject()).count(),
        "conover-iman comparisons evaluated"
    );
    Ok(comparisons)
}
