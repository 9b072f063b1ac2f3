//! Reporting of computed quality metrics.

use tracing::info;

use super::weights::QualityWeights;
use crate::types::QualityMetrics;

/// Receives the metrics computed by the quality step.
pub trait QualityReporter: Send + Sync {
  fn report(&self, calculator_name: &str, metrics: &QualityMetrics, weights: Option<QualityWeights>);
}

/// Reports through `tracing` at info level, one event per dimension.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogQualityReporter;

impl QualityReporter for LogQualityReporter {
  fn report(&self, calculator_name: &str, metrics: &QualityMetrics, weights: Option<QualityWeights>) {
    info!(
      calculator = calculator_name,
      overall_quality_index = metrics.overall_quality_index,
      "quality analysis"
    );
    let w = weights.map(|w| (w.completeness, w.confidence, w.consistency));
    info!(score = metrics.completeness, weight = ?w.map(|w| w.0), "completeness");
    info!(score = metrics.confidence, weight = ?w.map(|w| w.1), "confidence");
    info!(score = metrics.consistency, weight = ?w.map(|w| w.2), "consistency");
  }
}
