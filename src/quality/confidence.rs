//! Confidence dimension.
//!
//! - [TieredConfidenceCalculator]: weighted average that lets low-confidence rows
//!   pull the score down harder.
//! - [MeanConfidenceCalculator]: plain mean over rows with a usable confidence.

use super::calculator::{QualityDimension, QualityDimensionCalculator};
use super::columns::AnnotationColumns;
use crate::types::{Dataset, Row, cell_number, cell_present};

/// Rows below this confidence get [LOW_WEIGHT].
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.70;
/// Rows above this confidence get [HIGH_WEIGHT].
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.90;
pub const LOW_WEIGHT: f64 = 3.0;
pub const MID_WEIGHT: f64 = 2.0;
pub const HIGH_WEIGHT: f64 = 1.0;

/// The row's effective confidence: `0.0` when category, subcategory or
/// confidence is missing, otherwise the confidence clamped to `[0, 1]`.
fn effective_confidence(row: &Row, columns: &AnnotationColumns) -> f64 {
  if !cell_present(row, &columns.category) || !cell_present(row, &columns.subcategory) {
    return 0.0;
  }
  cell_number(row, &columns.confidence)
    .map(|c| c.clamp(0.0, 1.0))
    .unwrap_or(0.0)
}

/// Tier weight for an effective confidence.
pub fn tier_weight(confidence: f64) -> f64 {
  if confidence < LOW_CONFIDENCE_THRESHOLD {
    LOW_WEIGHT
  } else if confidence <= HIGH_CONFIDENCE_THRESHOLD {
    MID_WEIGHT
  } else {
    HIGH_WEIGHT
  }
}

/// `Σ(w·c) / Σw` over all rows, where `c` is the effective confidence and `w`
/// its tier weight. Invalid rows count as `c = 0` with the low-tier weight, so
/// they drag the score down. An empty dataset scores `0.0`.
#[derive(Debug, Clone, Default)]
pub struct TieredConfidenceCalculator {
  columns: AnnotationColumns,
}

impl TieredConfidenceCalculator {
  pub const NAME: &'static str = "tiered";

  pub fn new(columns: AnnotationColumns) -> Self {
    Self { columns }
  }
}

impl QualityDimensionCalculator for TieredConfidenceCalculator {
  fn dimension(&self) -> QualityDimension {
    QualityDimension::Confidence
  }

  fn name(&self) -> &str {
    Self::NAME
  }

  fn calculate(&self, dataset: &Dataset) -> f64 {
    let (weighted, weights) = dataset
      .rows()
      .iter()
      .map(|row| effective_confidence(row, &self.columns))
      .fold((0.0, 0.0), |(sum, weights), c| {
        let w = tier_weight(c);
        (sum + w * c, weights + w)
      });
    if weights > 0.0 { weighted / weights } else { 0.0 }
  }
}

/// Unweighted mean of effective confidences over all rows. An empty dataset
/// scores `0.0`.
#[derive(Debug, Clone, Default)]
pub struct MeanConfidenceCalculator {
  columns: AnnotationColumns,
}

impl MeanConfidenceCalculator {
  pub const NAME: &'static str = "mean";

  pub fn new(columns: AnnotationColumns) -> Self {
    Self { columns }
  }
}

impl QualityDimensionCalculator for MeanConfidenceCalculator {
  fn dimension(&self) -> QualityDimension {
    QualityDimension::Confidence
  }

  fn name(&self) -> &str {
    Self::NAME
  }

  fn calculate(&self, dataset: &Dataset) -> f64 {
    if dataset.is_empty() {
      return 0.0;
    }
    let sum: f64 = dataset
      .rows()
      .iter()
      .map(|row| effective_confidence(row, &self.columns))
      .sum();
    sum / dataset.row_count() as f64
  }
}
