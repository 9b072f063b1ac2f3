//! Dimension weights for the overall quality index.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Allowed distance of the weight sum from `1.0`.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weights applied to each dimension score. Must sum to `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
  pub completeness: f64,
  pub confidence: f64,
  pub consistency: f64,
}

impl Default for QualityWeights {
  fn default() -> Self {
    Self {
      completeness: 0.3,
      confidence: 0.5,
      consistency: 0.2,
    }
  }
}

impl QualityWeights {
  /// Validated weights.
  pub fn new(completeness: f64, confidence: f64, consistency: f64) -> Result<Self, ConfigurationError> {
    let weights = Self {
      completeness,
      confidence,
      consistency,
    };
    weights.validate()?;
    Ok(weights)
  }

  /// Each weight finite and in `[0, 1]`; the sum within [WEIGHT_SUM_TOLERANCE] of `1.0`.
  pub fn validate(&self) -> Result<(), ConfigurationError> {
    for (dimension, value) in [
      ("completeness", self.completeness),
      ("confidence", self.confidence),
      ("consistency", self.consistency),
    ] {
      if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigurationError::InvalidWeight {
          dimension: dimension.to_string(),
          value,
        });
      }
    }
    let sum = self.completeness + self.confidence + self.consistency;
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
      return Err(ConfigurationError::InvalidWeights { sum });
    }
    Ok(())
  }
}
