//! Special functions behind the reference distributions.
//!
//! The omnibus test needs the chi-squared CDF and its inverse; the
//! pairwise follow-up needs the Student-t CDF and its inverse. Both reduce
//! to regularized incomplete gamma/beta functions evaluated here.

/// Initial guess for quantile refinement: inverse standard normal CDF.
///
/// # Algorithm
/// Abramowitz & Stegun formula 26.2.23, rational approximation with
/// absolute error < 4.5 × 10⁻⁴. Only used to seed Newton iterations, so
/// the modest accuracy is sufficient.
///
/// # Returns
/// - `f64::NAN` if `p` is NaN or outside `[0, 1]`.
/// - `±∞` at the endpoints.
///
/// # Examples
/// ```
/// use u_ranktest::special::inverse_normal_cdf;
/// assert!(inverse_normal_cdf(0.5).abs() < 1e-4);
/// assert!((inverse_normal_cdf(0.95) - 1.645).abs() < 0.01);
/// ```
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let (tail, sign) = if p > 0.5 { (1.0 - p, 1.0) } else { (p, -1.0) };
    let w = (-2.0 * tail.ln()).sqrt();

    const C: [f64; 3] = [2.515517, 0.802853, 0.010328];
    const D: [f64; 3] = [1.432788, 0.189269, 0.001308];

    let num = C[0] + w * (C[1] + w * C[2]);
    let den = 1.0 + w * (D[0] + w * (D[1] + w * D[2]));
    sign * (w - num / den)
}

/// Lanczos approximation of ln Γ(x) (g = 7, n = 9).
///
/// Reference: Lanczos (1964), *SIAM Journal on Numerical Analysis* 1(1).
/// Relative error < 2 × 10⁻¹⁰ for x > 0.
///
/// # Examples
/// ```
/// use u_ranktest::special::ln_gamma;
/// // Γ(4) = 3! = 6
/// assert!((ln_gamma(4.0) - 6.0_f64.ln()).abs() < 1e-10);
/// ```
pub fn ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const LANCZOS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;
    use std::f64::consts::PI;

    if x < 0.5 {
        // Reflection: Γ(x)Γ(1−x) = π / sin(πx)
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let z = x - 1.0;
    let series = LANCZOS[1..]
        .iter()
        .enumerate()
        .fold(LANCZOS[0], |acc, (i, &c)| acc + c / (z + i as f64 + 1.0));

    let t = z + G + 0.5;
    0.5 * (2.0 * PI).ln() + (z + 0.5) * t.ln() - t + series.ln()
}

/// ln B(a, b) = ln Γ(a) + ln Γ(b) − ln Γ(a + b).
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Regularized incomplete beta function I_x(a, b).
///
/// # Algorithm
/// Continued fraction evaluated with the modified Lentz method. When
/// `x > (a+1)/(a+b+2)` the symmetry `I_x(a,b) = 1 − I_{1−x}(b,a)` is used
/// so the fraction always converges quickly.
///
/// Reference: Press et al. (2007), *Numerical Recipes*, 3rd ed., §6.4.
///
/// # Examples
/// ```
/// use u_ranktest::special::regularized_incomplete_beta;
/// assert_eq!(regularized_incomplete_beta(0.0, 2.0, 3.0), 0.0);
/// assert_eq!(regularized_incomplete_beta(1.0, 2.0, 3.0), 1.0);
/// assert!((regularized_incomplete_beta(0.25, 1.0, 1.0) - 0.25).abs() < 1e-10);
/// ```
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - regularized_incomplete_beta(1.0 - x, b, a);
    }

    let ln_front = a * x.ln() + b * (1.0 - x).ln() - ln_beta(a, b);
    ln_front.exp() * beta_continued_fraction(x, a, b) / a
}

fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 1e-14;
    const TINY: f64 = 1e-30;

    let mut c = 1.0;
    let mut d = 1.0 / (1.0 - (a + b) * x / (a + 1.0)).max(TINY);
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let two_m = 2.0 * m;

        let even = m * (b - m) * x / ((a + two_m - 1.0) * (a + two_m));
        d = 1.0 / (1.0 + even * d).max(TINY);
        c = (1.0 + even / c).max(TINY);
        h *= d * c;

        let odd = -(a + m) * (a + b + m) * x / ((a + two_m) * (a + two_m + 1.0));
        d = 1.0 / (1.0 + odd * d).max(TINY);
        c = (1.0 + odd / c).max(TINY);
        let step = d * c;
        h *= step;

        if (step - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Regularized lower incomplete gamma function P(a, x) = γ(a, x) / Γ(a).
///
/// Series expansion below `x = a + 1`, continued fraction for the upper
/// function above it.
///
/// # Examples
/// ```
/// use u_ranktest::special::regularized_lower_gamma;
/// // P(1, x) = 1 − e^(−x)
/// let p = regularized_lower_gamma(1.0, 3.0);
/// assert!((p - (1.0 - (-3.0_f64).exp())).abs() < 1e-10);
/// ```
pub fn regularized_lower_gamma(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x < a + 1.0 {
        lower_gamma_series(a, x)
    } else {
        1.0 - upper_gamma_continued_fraction(a, x)
    }
}

fn lower_gamma_series(a: f64, x: f64) -> f64 {
    let mut denom = a;
    let mut term = 1.0 / a;
    let mut sum = term;
    for _ in 0..200 {
        denom += 1.0;
        term *= x / denom;
        sum += term;
        if term.abs() < sum.abs() * 1e-14 {
            break;
        }
    }
    sum * (a * x.ln() - x - ln_gamma(a)).exp()
}

/// Q(a, x) = 1 − P(a, x) via the Lentz continued fraction.
fn upper_gamma_continued_fraction(a: f64, x: f64) -> f64 {
    const TINY: f64 = 1e-30;

    let mut b = x + 1.0 - a;
    let mut c = 1.0 / TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=200 {
        let i = i as f64;
        let an = -i * (i - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < TINY {
            d = TINY;
        }
        c = b + an / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let step = d * c;
        h *= step;
        if (step - 1.0).abs() < 1e-14 {
            break;
        }
    }
    h * (a * x.ln() - x - ln_gamma(a)).exp()
}

// ============================================================================
// Student's t-Distribution
// ============================================================================

/// CDF of Student's t-distribution, P(T ≤ t | df).
///
/// With `x = df / (df + t²)`, the CDF is `1 − I_x(df/2, 1/2)/2` for
/// `t ≥ 0` and `I_x(df/2, 1/2)/2` otherwise.
///
/// # Returns
/// `f64::NAN` if `df ≤ 0` or either input is NaN.
///
/// # Examples
/// ```
/// use u_ranktest::special::t_distribution_cdf;
/// assert!((t_distribution_cdf(0.0, 4.0) - 0.5).abs() < 1e-12);
/// // two-sided 5% point for df = 10
/// assert!((t_distribution_cdf(2.228, 10.0) - 0.975).abs() < 1e-3);
/// ```
pub fn t_distribution_cdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t == 0.0 {
        return 0.5;
    }
    let x = df / (df + t * t);
    let half_tail = regularized_incomplete_beta(x, df / 2.0, 0.5) / 2.0;
    if t > 0.0 {
        1.0 - half_tail
    } else {
        half_tail
    }
}

/// PDF of Student's t-distribution.
///
/// ```text
/// f(t; ν) = Γ((ν+1)/2) / (√(νπ) Γ(ν/2)) · (1 + t²/ν)^(−(ν+1)/2)
/// ```
pub fn t_distribution_pdf(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    let half = df / 2.0;
    (ln_gamma(half + 0.5)
        - ln_gamma(half)
        - 0.5 * (df * std::f64::consts::PI).ln()
        - (half + 0.5) * (t * t / df).ln_1p())
    .exp()
}

/// Inverse CDF of Student's t-distribution.
///
/// Newton-Raphson from the normal quantile. For `p > 0.5` the CDF is
/// concave on `t > 0`, so iterates approach the root monotonically even
/// for heavy-tailed `df = 1`.
///
/// # Returns
/// `f64::NAN` if `p ∉ (0, 1)` or `df ≤ 0`.
///
/// # Examples
/// ```
/// use u_ranktest::special::t_distribution_quantile;
/// assert!(t_distribution_quantile(0.5, 7.0).abs() < 1e-12);
/// // one-sided 5% critical value, df = 4
/// assert!((t_distribution_quantile(0.95, 4.0) - 2.1318).abs() < 1e-3);
/// ```
pub fn t_distribution_quantile(p: f64, df: f64) -> f64 {
    if p.is_nan() || df.is_nan() || df <= 0.0 || p <= 0.0 || p >= 1.0 {
        return f64::NAN;
    }
    if (p - 0.5).abs() < 1e-15 {
        return 0.0;
    }

    let mut t = inverse_normal_cdf(p);
    for _ in 0..100 {
        let density = t_distribution_pdf(t, df);
        if density < 1e-300 {
            break;
        }
        let step = (t_distribution_cdf(t, df) - p) / density;
        t -= step;
        if step.abs() < 1e-12 * t.abs().max(1.0) {
            break;
        }
    }
    t
}

// ============================================================================
// Chi-Squared Distribution
// ============================================================================

/// CDF of the chi-squared distribution, `P(k/2, x/2)`.
///
/// # Returns
/// - `f64::NAN` if `k ≤ 0` or either input is NaN.
/// - `0.0` for `x ≤ 0`.
///
/// # Examples
/// ```
/// use u_ranktest::special::chi_squared_cdf;
/// assert_eq!(chi_squared_cdf(0.0, 3.0), 0.0);
/// assert!((chi_squared_cdf(5.991, 2.0) - 0.95).abs() < 1e-3);
/// ```
pub fn chi_squared_cdf(x: f64, k: f64) -> f64 {
    if x.is_nan() || k.is_nan() || k <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    regularized_lower_gamma(k / 2.0, x / 2.0)
}

/// PDF of the chi-squared distribution.
///
/// ```text
/// f(x; k) = x^(k/2 − 1) e^(−x/2) / (2^(k/2) Γ(k/2)),  x > 0
/// ```
pub fn chi_squared_pdf(x: f64, k: f64) -> f64 {
    if x.is_nan() || k.is_nan() || k <= 0.0 {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    let half = k / 2.0;
    ((half - 1.0) * x.ln() - x / 2.0 - half * std::f64::consts::LN_2 - ln_gamma(half)).exp()
}

/// Inverse CDF of the chi-squared distribution.
///
/// # Algorithm
/// Doubles an upper bracket until it covers `p`, then bisects. The CDF is
/// strictly increasing on `(0, ∞)`, so bisection always converges.
///
/// # Returns
/// `f64::NAN` if `p ∉ (0, 1)` or `k ≤ 0`.
///
/// # Examples
/// ```
/// use u_ranktest::special::chi_squared_quantile;
/// assert!((chi_squared_quantile(0.95, 1.0) - 3.8415).abs() < 1e-3);
/// assert!((chi_squared_quantile(0.95, 2.0) - 5.9915).abs() < 1e-3);
/// ```
pub fn chi_squared_quantile(p: f64, k: f64) -> f64 {
    if p.is_nan() || k.is_nan() || k <= 0.0 || p <= 0.0 || p >= 1.0 {
        return f64::NAN;
    }

    let mut hi = k.max(1.0) * 2.0;
    while chi_squared_cdf(hi, k) < p {
        hi *= 2.0;
        if hi > 1e15 {
            return hi;
        }
    }
    let mut lo = 0.0_f64;

    for _ in 0..300 {
        let mid = 0.5 * (lo + hi);
        if hi - lo < 1e-13 * mid.max(1e-300) {
            break;
        }
        if chi_squared_cdf(mid, k) < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- inverse_normal_cdf ---

    #[test]
    fn test_inverse_normal_known_values() {
        assert!((inverse_normal_cdf(0.975) - 1.96).abs() < 0.01);
        assert!((inverse_normal_cdf(0.05) + 1.645).abs() < 0.01);
    }

    #[test]
    fn test_inverse_normal_extremes() {
        assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(inverse_normal_cdf(1.0), f64::INFINITY);
        assert!(inverse_normal_cdf(-0.5).is_nan());
        assert!(inverse_normal_cdf(f64::NAN).is_nan());
    }

    // --- ln_gamma ---

    #[test]
    fn test_ln_gamma_factorials() {
        let mut factorial = 1.0_f64;
        for n in 1..10 {
            // Γ(n) = (n−1)!
            assert!(
                (ln_gamma(n as f64) - factorial.ln()).abs() < 1e-9,
                "ln Γ({n}) mismatch"
            );
            factorial *= n as f64;
        }
    }

    #[test]
    fn test_ln_gamma_half() {
        let expected = std::f64::consts::PI.sqrt().ln();
        assert!((ln_gamma(0.5) - expected).abs() < 1e-10);
    }

    #[test]
    fn test_ln_beta_symmetric() {
        assert!((ln_beta(2.5, 4.0) - ln_beta(4.0, 2.5)).abs() < 1e-12);
        // B(1, 3) = 1/3
        assert!((ln_beta(1.0, 3.0) + 3.0_f64.ln()).abs() < 1e-10);
    }

    // --- incomplete beta / gamma ---

    #[test]
    fn test_inc_beta_closed_form() {
        // I_x(a, 1) = x^a
        for &x in &[0.2, 0.5, 0.8] {
            let got = regularized_incomplete_beta(x, 3.0, 1.0);
            assert!((got - x.powi(3)).abs() < 1e-10, "I_{x}(3,1) = {got}");
        }
    }

    #[test]
    fn test_inc_beta_midpoint_symmetry() {
        assert!((regularized_incomplete_beta(0.5, 4.0, 4.0) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_lower_gamma_exponential() {
        for &x in &[0.1, 1.0, 2.5, 8.0] {
            let got = regularized_lower_gamma(1.0, x);
            assert!((got - (1.0 - (-x).exp())).abs() < 1e-10, "P(1,{x}) = {got}");
        }
    }

    #[test]
    fn test_lower_gamma_non_positive_x() {
        assert_eq!(regularized_lower_gamma(1.5, 0.0), 0.0);
        assert_eq!(regularized_lower_gamma(1.5, -2.0), 0.0);
    }

    // --- Student t ---

    #[test]
    fn test_t_cdf_symmetry() {
        for &df in &[1.0, 3.0, 12.0] {
            for &t in &[0.3, 1.0, 4.4] {
                let sum = t_distribution_cdf(t, df) + t_distribution_cdf(-t, df);
                assert!((sum - 1.0).abs() < 1e-10, "df={df}, t={t}: {sum}");
            }
        }
    }

    #[test]
    fn test_t_cdf_cauchy() {
        // df = 1 is the standard Cauchy: F(t) = 1/2 + atan(t)/π
        for &t in &[-3.0, -0.5, 0.7, 2.0] {
            let expected = 0.5 + f64::atan(t) / std::f64::consts::PI;
            assert!((t_distribution_cdf(t, 1.0) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_t_cdf_infinite_statistic() {
        assert_eq!(t_distribution_cdf(f64::INFINITY, 5.0), 1.0);
        assert_eq!(t_distribution_cdf(f64::NEG_INFINITY, 5.0), 0.0);
    }

    #[test]
    fn test_t_cdf_invalid() {
        assert!(t_distribution_cdf(1.0, 0.0).is_nan());
        assert!(t_distribution_cdf(f64::NAN, 3.0).is_nan());
    }

    #[test]
    fn test_t_pdf_cauchy_peak() {
        let peak = t_distribution_pdf(0.0, 1.0);
        assert!((peak - 1.0 / std::f64::consts::PI).abs() < 1e-10);
    }

    #[test]
    fn test_t_quantile_table_values() {
        // One-sided 95% critical values
        let table = [(1.0, 6.3138), (3.0, 2.3534), (4.0, 2.1318), (5.0, 2.0150), (30.0, 1.6973)];
        for &(df, expected) in &table {
            let q = t_distribution_quantile(0.95, df);
            assert!((q - expected).abs() < 1e-3, "t_0.95({df}) = {q}, expected {expected}");
        }
    }

    #[test]
    fn test_t_quantile_roundtrip() {
        for &df in &[1.0, 2.0, 6.0, 25.0] {
            for &p in &[0.9, 0.95, 0.99, 0.999] {
                let q = t_distribution_quantile(p, df);
                let back = t_distribution_cdf(q, df);
                assert!((back - p).abs() < 1e-8, "df={df}, p={p}: back={back}");
            }
        }
    }

    #[test]
    fn test_t_quantile_invalid() {
        assert!(t_distribution_quantile(0.0, 4.0).is_nan());
        assert!(t_distribution_quantile(1.0, 4.0).is_nan());
        assert!(t_distribution_quantile(0.95, -2.0).is_nan());
    }

    // --- chi-squared ---

    #[test]
    fn test_chi2_cdf_two_df_closed_form() {
        for &x in &[0.5, 2.0, 7.0] {
            let expected = 1.0 - (-x / 2.0_f64).exp();
            assert!((chi_squared_cdf(x, 2.0) - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn test_chi2_cdf_invalid() {
        assert!(chi_squared_cdf(1.0, 0.0).is_nan());
        assert!(chi_squared_cdf(f64::NAN, 2.0).is_nan());
        assert_eq!(chi_squared_cdf(-3.0, 2.0), 0.0);
    }

    #[test]
    fn test_chi2_pdf_two_df() {
        // k = 2: f(x) = e^(−x/2) / 2
        for &x in &[0.5, 1.0, 4.0] {
            let expected = (-x / 2.0_f64).exp() / 2.0;
            assert!((chi_squared_pdf(x, 2.0) - expected).abs() < 1e-10);
        }
        assert_eq!(chi_squared_pdf(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_chi2_quantile_table_values() {
        let table = [(1.0, 3.841_458_820_694_124), (2.0, 5.991_464_547_107_979), (3.0, 7.814_727_903_251_178)];
        for &(k, expected) in &table {
            let q = chi_squared_quantile(0.95, k);
            assert!((q - expected).abs() < 1e-7, "χ²_0.95({k}) = {q}, expected {expected}");
        }
    }

    #[test]
    fn test_chi2_quantile_invalid() {
        assert!(chi_squared_quantile(0.0, 2.0).is_nan());
        assert!(chi_squared_quantile(1.0, 2.0).is_nan());
        assert!(chi_squared_quantile(0.5, 0.0).is_nan());
    }
}
