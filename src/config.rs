//! Test configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Settings shared by the omnibus test and its post-hoc follow-up.
///
/// The post-hoc test has no α of its own; it reuses the one recorded by
/// the omnibus test that produced its input.
///
/// # Examples
/// ```
/// use u_ranktest::config::TestConfig;
/// let cfg: TestConfig = serde_json::from_str(r#"{"alpha": 0.01}"#).unwrap();
/// assert_eq!(cfg.alpha, 0.01);
/// assert_eq!(TestConfig::default().alpha, 0.05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Significance level α ∈ (0, 1).
    pub alpha: f64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl TestConfig {
    /// Creates a configuration with the given significance level.
    ///
    /// # Errors
    /// [`Error::InvalidAlpha`] unless `0 < alpha < 1`.
    pub fn new(alpha: f64) -> Result<Self> {
        let config = Self { alpha };
        config.validate()?;
        Ok(config)
    }

    /// Checks that α lies strictly between 0 and 1.
    pub fn validate(&self) -> Result<()> {
        validate_alpha(self.alpha)
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidAlpha(alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alpha() {
        assert_eq!(TestConfig::default().alpha, DEFAULT_ALPHA);
        assert!(TestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        for &alpha in &[0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(
                matches!(TestConfig::new(alpha), Err(Error::InvalidAlpha(_))),
                "alpha={alpha} should be rejected"
            );
        }
        assert_eq!(TestConfig::new(0.1).unwrap().alpha, 0.1);
    }

    #[test]
    fn test_deserialize_missing_field_uses_default() {
        let cfg: TestConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, TestConfig::default());
    }

    #[test]
    fn test_roundtrip_json() {
        let cfg = TestConfig::new(0.025).unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(json, r#"{"alpha":0.025}"#);
    }
}
