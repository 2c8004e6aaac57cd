//! Reference distributions for rank-based tests.
//!
//! | Distribution | Parameter | Used by |
//! |---|---|---|
//! | [`ChiSquared`] | k > 0 | Kruskal-Wallis H |
//! | [`StudentT`] | ν > 0 | Conover-Iman t |
//!
//! Parameters are validated once at construction; evaluation methods are
//! then infallible and return plain `f64` values.

use thiserror::Error;

use crate::special;

/// Error type for invalid distribution parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),
}

// ============================================================================
// Chi-Squared Distribution
// ============================================================================

/// Chi-squared distribution with `k` degrees of freedom.
///
/// # Mathematical Definition
/// - PDF: x^(k/2−1) e^(−x/2) / (2^(k/2) Γ(k/2)) for x > 0
/// - CDF: P(k/2, x/2), the regularized lower incomplete gamma
///
/// # Examples
/// ```
/// use u_ranktest::distributions::ChiSquared;
/// let chi2 = ChiSquared::new(2.0).unwrap();
/// let critical = chi2.quantile(0.95).unwrap();
/// assert!((critical - 5.991).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquared {
    k: f64,
}

impl ChiSquared {
    /// Creates a chi-squared distribution with `k` degrees of freedom.
    ///
    /// # Errors
    /// Returns `Err` if `k ≤ 0` or `k` is not finite.
    pub fn new(k: f64) -> Result<Self, DistributionError> {
        if !k.is_finite() || k <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "ChiSquared requires finite k > 0, got k={k}"
            )));
        }
        Ok(Self { k })
    }

    pub fn degrees_of_freedom(&self) -> f64 {
        self.k
    }

    pub fn pdf(&self, x: f64) -> f64 {
        special::chi_squared_pdf(x, self.k)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        special::chi_squared_cdf(x, self.k)
    }

    /// Survival function, `1 − cdf(x)`.
    pub fn sf(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// Inverse CDF.
    ///
    /// Returns `None` if `p` is outside `(0, 1)`.
    pub fn quantile(&self, p: f64) -> Option<f64> {
        if p.is_nan() || p <= 0.0 || p >= 1.0 {
            return None;
        }
        Some(special::chi_squared_quantile(p, self.k))
    }

    /// Critical value cutting off an upper tail of probability `alpha`.
    ///
    /// Returns `None` unless `0 < alpha < 1`. When `1 − alpha` rounds to
    /// 1 the critical value is `+∞`, so no finite statistic reaches it.
    pub fn upper_critical(&self, alpha: f64) -> Option<f64> {
        upper_tail_critical(alpha, |p| self.quantile(p))
    }
}

// ============================================================================
// Student's t-Distribution
// ============================================================================

/// Student's t-distribution with `ν` degrees of freedom.
///
/// # Mathematical Definition
/// - PDF: Γ((ν+1)/2) / (√(νπ) Γ(ν/2)) · (1 + t²/ν)^(−(ν+1)/2)
/// - CDF: via the regularized incomplete beta I_x(ν/2, 1/2), x = ν/(ν+t²)
///
/// # Examples
/// ```
/// use u_ranktest::distributions::StudentT;
/// let t = StudentT::new(4.0).unwrap();
/// assert!((t.quantile(0.95).unwrap() - 2.132).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StudentT {
    df: f64,
}

impl StudentT {
    /// Creates a Student's t-distribution with `df` degrees of freedom.
    ///
    /// # Errors
    /// Returns `Err` if `df ≤ 0` or `df` is not finite.
    pub fn new(df: f64) -> Result<Self, DistributionError> {
        if !df.is_finite() || df <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "StudentT requires finite df > 0, got df={df}"
            )));
        }
        Ok(Self { df })
    }

    pub fn degrees_of_freedom(&self) -> f64 {
        self.df
    }

    pub fn pdf(&self, t: f64) -> f64 {
        special::t_distribution_pdf(t, self.df)
    }

    pub fn cdf(&self, t: f64) -> f64 {
        special::t_distribution_cdf(t, self.df)
    }

    pub fn sf(&self, t: f64) -> f64 {
        1.0 - self.cdf(t)
    }

    /// Inverse CDF.
    ///
    /// Returns `None` if `p` is outside `(0, 1)`.
    pub fn quantile(&self, p: f64) -> Option<f64> {
        if p.is_nan() || p <= 0.0 || p >= 1.0 {
            return None;
        }
        Some(special::t_distribution_quantile(p, self.df))
    }

    /// One-sided critical value at level `alpha`; see
    /// [`ChiSquared::upper_critical`].
    pub fn upper_critical(&self, alpha: f64) -> Option<f64> {
        upper_tail_critical(alpha, |p| self.quantile(p))
    }
}

fn upper_tail_critical(alpha: f64, quantile: impl Fn(f64) -> Option<f64>) -> Option<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return None;
    }
    let p = 1.0 - alpha;
    if p >= 1.0 {
        return Some(f64::INFINITY);
    }
    quantile(p)
}
