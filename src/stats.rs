//! Compensated accumulation for rank and value sums.
//!
//! Rank sums over large N and the raw sum of squared values feed
//! subtractions in the test statistics, so they are accumulated with
//! Neumaier summation rather than a naive fold.

/// Neumaier compensated summation over an iterator of values.
///
/// An improved Kahan variant that also captures low-order bits when the
/// addend is larger in magnitude than the running sum.
///
/// Reference: Neumaier (1974), *Zeitschrift für Angewandte Mathematik und
/// Mechanik* 54(1), pp. 39–51.
///
/// # Examples
/// ```
/// use u_ranktest::stats::compensated_sum;
/// let total = compensated_sum([1e16, 1.0, -1e16]);
/// assert_eq!(total, 1.0);
/// ```
pub fn compensated_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            compensation += (sum - t) + x;
        } else {
            compensation += (x - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}

/// Σ xᵢ² with compensated summation.
pub fn sum_of_squares(data: &[f64]) -> f64 {
    compensated_sum(data.iter().map(|&x| x * x))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn integer_sums_are_exact(data in proptest::collection::vec(-1000_i32..1000, 0..200)) {
            let floats: Vec<f64> = data.iter().map(|&x| f64::from(x)).collect();
            let expected: i64 = data.iter().map(|&x| i64::from(x)).sum();
            prop_assert_eq!(compensated_sum(floats.iter().copied()), expected as f64);
        }

    }
}
