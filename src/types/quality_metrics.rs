//! Per-dimension quality scores and their weighted combination.

use serde::{Deserialize, Serialize};

/// Quality scores for one dataset, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
  pub completeness: f64,
  pub confidence: f64,
  pub consistency: f64,
  pub overall_quality_index: f64,
}

impl QualityMetrics {
  /// All-zero metrics, used for degenerate input.
  pub fn zero() -> Self {
    Self {
      completeness: 0.0,
      confidence: 0.0,
      consistency: 0.0,
      overall_quality_index: 0.0,
    }
  }
}
