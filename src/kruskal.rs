//! Kruskal-Wallis one-way analysis of variance on ranks.
//!
//! # Statistic
//!
//! With N observations in k groups, midranks R, group counts n_g and mean
//! ranks M_g:
//!
//! ```text
//! E = (N + 1) / 2
//! V = (N² − 1) / 12
//! H = (N − 1)/12 · Σ_g n_g (M_g − E)² / V
//! ```
//!
//! H is compared against the chi-squared distribution with k − 1 degrees
//! of freedom. Ties enter only through midranking; the textbook divisor
//! `1 − Σ(t³ − t)/(N³ − N)` is reported as [`KruskalWallisSummary::tie_correction`]
//! but not applied.
//!
//! # Outcome
//!
//! The test returns a [`KruskalWallisOutcome`]. Only its `Rejected`
//! variant carries a [`RejectedOmnibus`], the input the Conover-Iman
//! post-hoc test requires, so a post-hoc run on a non-significant result
//! cannot be expressed through [`crate::conover::conover_iman`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{validate_alpha, TestConfig};
use crate::conover::{self, PairwiseComparison};
use crate::data::Observations;
use crate::distributions::ChiSquared;
use crate::error::{Error, Result};
use crate::groups::{group_stats, GroupIndexSets, GroupStats};
use crate::rank::Ranking;
use crate::stats;

/// Binary outcome of a hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Statistic reached the critical value: reject H₀.
    Reject,
    /// Statistic below the critical value: H₀ stands.
    FailToReject,
}

impl Decision {
    /// `Reject` iff `statistic >= critical`. NaN statistics never reject.
    pub fn from_statistic(statistic: f64, critical: f64) -> Self {
        if statistic >= critical {
            Decision::Reject
        } else {
            Decision::FailToReject
        }
    }

    pub fn is_reject(self) -> bool {
        self == Decision::Reject
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Reject => write!(f, "null hypothesis rejected"),
            Decision::FailToReject => write!(f, "null hypothesis not rejected"),
        }
    }
}

/// Every quantity the omnibus test computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KruskalWallisSummary {
    /// Significance level the test ran at.
    pub alpha: f64,
    /// N.
    pub n_observations: usize,
    /// k.
    pub n_groups: usize,
    /// k − 1.
    pub degrees_of_freedom: usize,
    pub h_statistic: f64,
    /// χ² quantile at 1 − α.
    pub critical_value: f64,
    /// 1 − χ²-CDF(H).
    pub p_value: f64,
    pub decision: Decision,
    /// Informational; not applied to H.
    pub tie_correction: f64,
    /// Per-group counts and mean ranks, registry order.
    pub groups: Vec<GroupStats>,
}

impl KruskalWallisSummary {
    /// Count and mean rank of the group labelled `label`.
    pub fn group(&self, label: &str) -> Option<&GroupStats> {
        self.groups.iter().find(|g| g.label == label)
    }
}

impl fmt::Display for KruskalWallisSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Kruskal-Wallis: H = {:.4}, df = {}, critical chi-square = {:.4} (alpha = {}), p = {:.4}: {}",
            self.h_statistic,
            self.degrees_of_freedom,
            self.critical_value,
            self.alpha,
            self.p_value,
            self.decision
        )
    }
}

/// A Kruskal-Wallis result that rejected H₀.
///
/// Only constructible by [`kruskal_wallis`]; holding one proves the
/// omnibus test ran and rejected. Carries Σ value² over all observations,
/// which the post-hoc variance term needs and which is not recoverable
/// from the summary alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedOmnibus {
    summary: KruskalWallisSummary,
    sum_of_squared_values: f64,
}

impl RejectedOmnibus {
    pub fn summary(&self) -> &KruskalWallisSummary {
        &self.summary
    }

    /// Σ xᵢ² over the raw observed values (not ranks).
    pub fn sum_of_squared_values(&self) -> f64 {
        self.sum_of_squared_values
    }

    /// Runs the Conover-Iman post-hoc comparisons on this result.
    pub fn conover_iman(&self) -> Result<Vec<PairwiseComparison>> {
        conover::conover_iman(self)
    }
}

/// Tagged result of the omnibus test.
#[derive(Debug, Clone, PartialEq)]
pub enum KruskalWallisOutcome {
    Rejected(RejectedOmnibus),
    NotRejected(KruskalWallisSummary),
}

impl KruskalWallisOutcome {
    pub fn summary(&self) -> &KruskalWallisSummary {
        match self {
            KruskalWallisOutcome::Rejected(rejected) => rejected.summary(),
            KruskalWallisOutcome::NotRejected(summary) => summary,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, KruskalWallisOutcome::Rejected(_))
    }

    /// The rejected result, if H₀ was rejected.
    pub fn rejected(&self) -> Option<&RejectedOmnibus> {
        match self {
            KruskalWallisOutcome::Rejected(rejected) => Some(rejected),
            KruskalWallisOutcome::NotRejected(_) => None,
        }
    }

    /// Runs the post-hoc test if H₀ was rejected.
    ///
    /// # Errors
    /// [`Error::NotRejected`] when the omnibus test did not reject.
    pub fn conover_iman(&self) -> Result<Vec<PairwiseComparison>> {
        match self {
            KruskalWallisOutcome::Rejected(rejected) => conover::conover_iman(rejected),
            KruskalWallisOutcome::NotRejected(_) => Err(Error::NotRejected),
        }
    }
}

/// Runs the Kruskal-Wallis test at significance level `alpha`.
///
/// # Errors
/// - [`Error::InvalidAlpha`] unless `0 < alpha < 1`.
/// - [`Error::TooFewGroups`] if fewer than two distinct labels occur.
///
/// # Examples
/// ```
/// use u_ranktest::data::Observations;
/// use u_ranktest::kruskal::kruskal_wallis;
///
/// let obs = Observations::new(
///     ["a", "a", "a", "a", "b", "b", "b", "b", "c", "c", "c", "c"],
///     [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0],
/// )
/// .unwrap();
/// let outcome = kruskal_wallis(&obs, 0.05).unwrap();
/// assert!(outcome.is_rejected());
/// assert!((outcome.summary().h_statistic - 128.0 / 13.0).abs() < 1e-12);
/// ```
pub fn kruskal_wallis(observations: &Observations, alpha: f64) -> Result<KruskalWallisOutcome> {
    validate_alpha(alpha)?;

    let registry = observations.registry();
    let k = registry.len();
    if k < 2 {
        return Err(Error::TooFewGroups { found: k });
    }

    let ranking = Ranking::new(observations.values());
    let sets = GroupIndexSets::new(observations.labels(), registry);
    let groups = group_stats(registry, &sets, ranking.ranks());

    let n = observations.len() as f64;
    let expected_rank = (n + 1.0) / 2.0;
    let variance = (n * n - 1.0) / 12.0;
    let between = stats::compensated_sum(groups.iter().map(|g| {
        let deviation = g.mean_rank - expected_rank;
        g.count as f64 * deviation * deviation / variance
    }));
    let h_statistic = (n - 1.0) / 12.0 * between;

    let degrees_of_freedom = k - 1;
    let chi2 = ChiSquared::new(degrees_of_freedom as f64)?;
    let critical_value = chi2
        .upper_critical(alpha)
        .ok_or(Error::InvalidAlpha(alpha))?;
    let p_value = chi2.sf(h_statistic);
    let decision = Decision::from_statistic(h_statistic, critical_value);

    for g in &groups {
        debug!(group = %g.label, count = g.count, mean_rank = g.mean_rank, "group aggregated");
    }

    let summary = KruskalWallisSummary {
        alpha,
        n_observations: observations.len(),
        n_groups: k,
        degrees_of_freedom,
        h_statistic,
        critical_value,
        p_value,
        decision,
        tie_correction: ranking.tie_correction(),
        groups,
    };
    info!(
        alpha,
        h = h_statistic,
        df = degrees_of_freedom,
        critical = critical_value,
        p = p_value,
        outcome = %decision,
        "kruskal-wallis test evaluated"
    );

    Ok(match decision {
        Decision::Reject => {
            let sum_of_squared_values = stats::sum_of_squares(observations.values());
            debug!(sum_of_squared_values, "retained for post-hoc comparisons");
            KruskalWallisOutcome::Rejected(RejectedOmnibus {
                summary,
                sum_of_squared_values,
            })
        }
        Decision::FailToReject => KruskalWallisOutcome::NotRejected(summary),
    })
}

/// Holder for one ordinal data set, loaded once and then tested.
///
/// # Examples
/// ```
/// use u_ranktest::kruskal::OrdinalTest;
/// use u_ranktest::Error;
///
/// let mut test = OrdinalTest::new();
/// assert_eq!(test.kruskal_wallis(0.05).unwrap_err(), Error::NoData);
///
/// test.add_data(["x", "y", "x", "y"], [5.0, 5.0, 5.0, 5.0]).unwrap();
/// let outcome = test.kruskal_wallis(0.05).unwrap();
/// assert_eq!(outcome.summary().h_statistic, 0.0);
/// assert_eq!(outcome.conover_iman().unwrap_err(), Error::NotRejected);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrdinalTest {
    observations: Option<Observations>,
}

impl OrdinalTest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holder pre-loaded with a validated observation set.
    pub fn with_observations(observations: Observations) -> Self {
        Self {
            observations: Some(observations),
        }
    }

    /// Stores the observation set.
    ///
    /// On error any previously stored set is kept unchanged.
    pub fn add_data<L, S, V>(&mut self, labels: L, values: V) -> Result<()>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = f64>,
    {
        let observations = Observations::new(labels, values)?;
        debug!(
            n = observations.len(),
            groups = observations.registry().len(),
            "observations loaded"
        );
        self.observations = Some(observations);
        Ok(())
    }

    pub fn observations(&self) -> Option<&Observations> {
        self.observations.as_ref()
    }

    /// Midranks of the stored values.
    pub fn ranks(&self) -> Result<Vec<f64>> {
        let observations = self.require_data()?;
        Ok(crate::rank::midranks(observations.values()))
    }

    /// Index sets of the stored observations, registry order.
    pub fn group_indices(&self) -> Result<GroupIndexSets> {
        let observations = self.require_data()?;
        Ok(GroupIndexSets::new(
            observations.labels(),
            observations.registry(),
        ))
    }

    /// Runs the Kruskal-Wallis test on the stored observations.
    ///
    /// # Errors
    /// [`Error::NoData`] before [`add_data`](Self::add_data) succeeds, plus
    /// the errors of [`kruskal_wallis`].
    pub fn kruskal_wallis(&self, alpha: f64) -> Result<KruskalWallisOutcome> {
        kruskal_wallis(self.require_data()?, alpha)
    }

    /// Runs the Kruskal-Wallis test with α taken from `config`.
    pub fn kruskal_wallis_with(&self, config: &TestConfig) -> Result<KruskalWallisOutcome> {
        self.kruskal_wallis(config.alpha)
    }

    fn require_data(&self) -> Result<&Observations> {
        self.observations.as_ref().ok_or(Error::NoData)
    }
}
