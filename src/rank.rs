//! Midrank assignment with tie handling.
//!
//! # Algorithm
//!
//! Values are paired with their original positions and sorted. The sorted
//! sequence is scanned for maximal runs of equal values; a run occupying
//! sorted positions `[i, j)` receives the average of the 1-based ranks
//! `i+1 ..= j`, i.e. `(i + j + 1) / 2`, at every original position in the
//! run. The rank sum is therefore `N(N+1)/2` regardless of ties.
//!
//! Sorting dominates at O(N log N).

use serde::{Deserialize, Serialize};

/// Ranks of an observation sequence together with its tie structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    ranks: Vec<f64>,
    tie_sizes: Vec<usize>,
}

impl Ranking {
    /// Ranks `values` with the midrank convention.
    ///
    /// # Examples
    /// ```
    /// use u_ranktest::rank::Ranking;
    /// let r = Ranking::new(&[10.0, 30.0, 20.0, 30.0]);
    /// assert_eq!(r.ranks(), &[1.0, 3.5, 2.0, 3.5]);
    /// assert_eq!(r.tie_sizes(), &[2]);
    /// ```
    pub fn new(values: &[f64]) -> Self {
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut ranks = vec![0.0; values.len()];
        let mut tie_sizes = Vec::new();

        let mut start = 0;
        while start < order.len() {
            let current = values[order[start]];
            let end = order[start..]
                .iter()
                .position(|&idx| values[idx] != current)
                .map_or(order.len(), |offset| start + offset);

            // mean of the 1-based ranks start+1 ..= end
            let midrank = (start + end + 1) as f64 / 2.0;
            for &idx in &order[start..end] {
                ranks[idx] = midrank;
            }
            if end - start > 1 {
                tie_sizes.push(end - start);
            }
            start = end;
        }

        Self { ranks, tie_sizes }
    }

    /// Rank of each observation, aligned with the input positions.
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    /// Consumes the ranking, returning the rank vector.
    pub fn into_ranks(self) -> Vec<f64> {
        self.ranks
    }

    /// Lengths of every run of tied values (runs of length 1 omitted),
    /// in ascending value order.
    pub fn tie_sizes(&self) -> &[usize] {
        &self.tie_sizes
    }

    /// Textbook tie-correction factor `1 − Σ(t³ − t) / (N³ − N)`.
    ///
    /// Equals 1 when there are no ties and 0 when every value is equal.
    /// Returns 1 for N < 2, where no correction is defined.
    pub fn tie_correction(&self) -> f64 {
        let n = self.ranks.len() as f64;
        if self.ranks.len() < 2 {
            return 1.0;
        }
        let tied: f64 = self
            .tie_sizes
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum();
        1.0 - tied / (n * n * n - n)
    }
}

/// Midranks of `values`, aligned by position.
///
/// Convenience wrapper over [`Ranking::new`] when the tie structure is not
/// needed.
///
/// # Examples
/// ```
/// use u_ranktest::rank::midranks;
/// assert_eq!(midranks(&[5.0, 5.0, 5.0, 5.0]), vec![2.5; 4]);
/// assert_eq!(midranks(&[3.0, 1.0, 2.0]), vec![3.0, 1.0, 2.0]);
/// ```
pub fn midranks(values: &[f64]) -> Vec<f64> {
    Ranking::new(values).into_ranks()
}
