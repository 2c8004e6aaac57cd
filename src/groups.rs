//! Group aggregation: index sets, counts, and mean ranks.
//!
//! Groups are addressed by their registry position so that every derived
//! vector lines up with [`GroupRegistry::labels`].

use serde::{Deserialize, Serialize};

use crate::data::GroupRegistry;
use crate::stats;

/// Positions of the observations belonging to each group.
///
/// Forms a partition of `0..N`: sets are pairwise disjoint, every position
/// appears in exactly one set, and positions within a set are ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupIndexSets {
    sets: Vec<Vec<usize>>,
}

impl GroupIndexSets {
    /// Partitions observation positions by label.
    ///
    /// Labels absent from `registry` are skipped; registries built from the
    /// same labels (as [`crate::data::Observations`] does) cover them all.
    ///
    /// # Examples
    /// ```
    /// use u_ranktest::data::GroupRegistry;
    /// use u_ranktest::groups::GroupIndexSets;
    /// let labels: Vec<String> = ["a", "b", "a"].iter().map(|s| s.to_string()).collect();
    /// let reg = GroupRegistry::from_labels(&labels);
    /// let sets = GroupIndexSets::new(&labels, &reg);
    /// assert_eq!(sets.get(0), &[0, 2]);
    /// assert_eq!(sets.get(1), &[1]);
    /// ```
    pub fn new(labels: &[String], registry: &GroupRegistry) -> Self {
        let mut sets = vec![Vec::new(); registry.len()];
        for (position, label) in labels.iter().enumerate() {
            if let Some(group) = registry.position(label) {
                sets[group].push(position);
            }
        }
        Self { sets }
    }

    /// Index set of the group at registry position `group`.
    ///
    /// # Panics
    /// Panics if `group` is out of range.
    pub fn get(&self, group: usize) -> &[usize] {
        &self.sets[group]
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.sets.iter().map(Vec::as_slice)
    }

    /// Observation count per group, n_g.
    pub fn counts(&self) -> Vec<usize> {
        self.sets.iter().map(Vec::len).collect()
    }

    /// Mean rank per group: the average of `ranks` over each index set.
    ///
    /// Every set built from a registry of observed labels is non-empty, so
    /// the division is always defined; an empty set yields NaN.
    pub fn mean_ranks(&self, ranks: &[f64]) -> Vec<f64> {
        self.sets
            .iter()
            .map(|set| {
                let total = stats::compensated_sum(set.iter().map(|&i| ranks[i]));
                total / set.len() as f64
            })
            .collect()
    }
}

/// Per-group summary carried in test results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub label: String,
    pub count: usize,
    pub mean_rank: f64,
}

/// Combines registry labels with counts and mean ranks.
pub fn group_stats(registry: &GroupRegistry, sets: &GroupIndexSets, ranks: &[f64]) -> Vec<GroupStats> {
    registry
        .labels()
        .iter()
        .zip(sets.counts())
        .zip(sets.mean_ranks(ranks))
        .map(|((label, count), mean_rank)| GroupStats {
            label: label.clone(),
            count,
            mean_rank,
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn index_sets_partition_positions(codes in proptest::collection::vec(0_u8..6, 1..150)) {
            let labels: Vec<String> = codes.iter().map(|c| format!("g{c}")).collect();
            let reg = GroupRegistry::from_labels(&labels);
            let sets = GroupIndexSets::new(&labels, &reg);

            let mut seen = vec![0_usize; labels.len()];
            for set in sets.iter() {
                prop_assert!(!set.is_empty());
                for &i in set {
                    seen[i] += 1;
                }
            }
            prop_assert!(seen.iter().all(|&c| c == 1), "every position in exactly one set");
            prop_assert_eq!(sets.counts().iter().sum::<usize>(), labels.len());

            for (group, set) in sets.iter().enumerate() {
                let label = &reg.labels()[group];
                prop_assert!(set.iter().all(|&i| &labels[i] == label));
            }
        }

        #[test]
        fn weighted_mean_ranks_recover_center(
            pairs in proptest::collection::vec((0_u8..4, 0_i32..10), 1..120)
        ) {
            let labels: Vec<String> = pairs.iter().map(|(g, _)| format!("g{g}")).collect();
            let values: Vec<f64> = pairs.iter().map(|&(_, v)| f64::from(v)).collect();
            let reg = GroupRegistry::from_labels(&labels);
            let sets = GroupIndexSets::new(&labels, &reg);
            let ranks = crate::rank::midranks(&values);

            let n = labels.len() as f64;
            let weighted: f64 = sets
                .counts()
                .iter()
                .zip(sets.mean_ranks(&ranks))
                .map(|(&c, m)| c as f64 * m)
                .sum();
            prop_assert!((weighted / n - (n + 1.0) / 2.0).abs() < 1e-9);
        }
    }
}
