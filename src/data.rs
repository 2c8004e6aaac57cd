//! Observation sets and the group registry.
//!
//! An observation set is a pair of equal-length parallel sequences: the
//! group label of each observation and its ordinal value. Position is
//! significant, since ranks are assigned positionally and mapped back to
//! groups by index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Validated, immutable observation set.
///
/// # Invariants
/// - `labels.len() == values.len() > 0`
/// - every value is finite, so values are totally ordered
///
/// # Examples
/// ```
/// use u_ranktest::data::Observations;
/// let obs = Observations::new(["a", "a", "b"], [3.0, 1.0, 2.0]).unwrap();
/// assert_eq!(obs.len(), 3);
/// assert_eq!(obs.registry().labels(), &["a".to_string(), "b".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObservations")]
pub struct Observations {
    labels: Vec<String>,
    values: Vec<f64>,
    #[serde(skip)]
    registry: GroupRegistry,
}

#[derive(Deserialize)]
struct RawObservations {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl TryFrom<RawObservations> for Observations {
    type Error = Error;

    fn try_from(raw: RawObservations) -> Result<Self> {
        Observations::new(raw.labels, raw.values)
    }
}

impl Observations {
    /// Builds an observation set from parallel label and value sequences.
    ///
    /// # Errors
    /// - [`Error::LengthMismatch`] if the sequences differ in length.
    /// - [`Error::EmptyObservations`] if both are empty.
    /// - [`Error::NonFiniteValue`] if a value is NaN or infinite.
    pub fn new<L, S, V>(labels: L, values: V) -> Result<Self>
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = f64>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let values: Vec<f64> = values.into_iter().collect();

        if labels.len() != values.len() {
            return Err(Error::LengthMismatch {
                labels: labels.len(),
                values: values.len(),
            });
        }
        if values.is_empty() {
            return Err(Error::EmptyObservations);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteValue { index });
        }

        let registry = GroupRegistry::from_labels(&labels);
        Ok(Self {
            labels,
            values,
            registry,
        })
    }

    /// Number of observations, N.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }
}

/// The distinct group labels of an observation set.
///
/// Labels are kept in order of first appearance. Set semantics do not
/// depend on that order, but pairwise post-hoc output is enumerated over
/// it, so the order is deterministic for a given input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupRegistry {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl GroupRegistry {
    /// Collects distinct labels in order of first appearance.
    ///
    /// # Examples
    /// ```
    /// use u_ranktest::data::GroupRegistry;
    /// let labels: Vec<String> = ["y", "x", "y", "z"].iter().map(|s| s.to_string()).collect();
    /// let reg = GroupRegistry::from_labels(&labels);
    /// assert_eq!(reg.labels(), &["y", "x", "z"]);
    /// assert_eq!(reg.position("z"), Some(2));
    /// ```
    pub fn from_labels(labels: &[String]) -> Self {
        let mut registry = Self::default();
        for label in labels {
            if !registry.positions.contains_key(label) {
                registry
                    .positions
                    .insert(label.clone(), registry.labels.len());
                registry.labels.push(label.clone());
            }
        }
        registry
    }

    /// Distinct labels, first-appearance order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of distinct groups, k.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Registry position of `label`, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let obs = Observations::new(vec!["A", "B", "A"], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(obs.len(), 3);
        assert!(!obs.is_empty());
        assert_eq!(obs.labels(), &["A", "B", "A"]);
        assert_eq!(obs.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(obs.registry().len(), 2);
    }

    #[test]
    fn test_new_length_mismatch() {
        let err = Observations::new(vec!["A", "B"], vec![1.0]).unwrap_err();
        assert_eq!(err, Error::LengthMismatch { labels: 2, values: 1 });
    }

    #[test]
    fn test_new_empty() {
        let err = Observations::new(Vec::<String>::new(), Vec::new()).unwrap_err();
        assert_eq!(err, Error::EmptyObservations);
    }

    #[test]
    fn test_new_non_finite() {
        let err = Observations::new(vec!["A", "A", "B"], vec![1.0, f64::NAN, 2.0]).unwrap_err();
        assert_eq!(err, Error::NonFiniteValue { index: 1 });
        let err = Observations::new(vec!["A"], vec![f64::NEG_INFINITY]).unwrap_err();
        assert_eq!(err, Error::NonFiniteValue { index: 0 });
    }

    #[test]
    fn test_registry_first_appearance_order() {
        let labels: Vec<String> = ["c", "a", "c", "b", "a"].iter().map(|s| s.to_string()).collect();
        let reg = GroupRegistry::from_labels(&labels);
        assert_eq!(reg.labels(), &["c", "a", "b"]);
        assert_eq!(reg.position("c"), Some(0));
        assert_eq!(reg.position("a"), Some(1));
        assert_eq!(reg.position("b"), Some(2));
        assert_eq!(reg.position("d"), None);
        assert!(reg.contains("a"));
        assert!(!reg.contains("d"));
    }

    #[test]
    fn test_registry_empty() {
        let reg = GroupRegistry::from_labels(&[]);
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn test_deserialize_validates() {
        let obs: Observations =
            serde_json::from_str(r#"{"labels":["x","y"],"values":[1.0,2.0]}"#).unwrap();
        assert_eq!(obs.registry().labels(), &["x", "y"]);

        let bad = serde_json::from_str::<Observations>(r#"{"labels":["x"],"values":[1.0,2.0]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_shape() {
        let obs = Observations::new(vec!["x"], vec![4.0]).unwrap();
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json, serde_json::json!({"labels": ["x"], "values": [4.0]}));
    }
}
