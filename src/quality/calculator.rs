//! Dimension calculator and quality calculator interfaces, plus the two
//! composed calculators.
//!
//! - [DefaultQualityCalculator]: weighted sum of completeness, confidence and consistency.
//! - [ConfidenceOnlyQualityCalculator]: the confidence score alone.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::completeness::RequiredFieldsCompletenessCalculator;
use super::confidence::TieredConfidenceCalculator;
use super::consistency::DescriptionPrefixConsistencyCalculator;
use super::weights::QualityWeights;
use crate::error::ConfigurationError;
use crate::types::{Dataset, QualityMetrics};

/// The three scored dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityDimension {
  Completeness,
  Confidence,
  Consistency,
}

impl QualityDimension {
  pub fn as_str(self) -> &'static str {
    match self {
      QualityDimension::Completeness => "completeness",
      QualityDimension::Confidence => "confidence",
      QualityDimension::Consistency => "consistency",
    }
  }
}

impl fmt::Display for QualityDimension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Scores one dimension of a dataset. Implementations must return a value in
/// `[0, 1]` for every input, including empty datasets.
pub trait QualityDimensionCalculator: Send + Sync {
  fn dimension(&self) -> QualityDimension;

  /// Algorithm name, used in logs and the registry.
  fn name(&self) -> &str;

  fn calculate(&self, dataset: &Dataset) -> f64;
}

/// Produces [QualityMetrics] for a dataset.
pub trait QualityCalculator: Send + Sync {
  /// Recorded as `quality_calculator_name` on the run.
  fn name(&self) -> &str;

  fn calculate(&self, dataset: &Dataset) -> QualityMetrics;

  /// Weights the overall index is built from, when the calculator uses any.
  fn weights(&self) -> Option<QualityWeights> {
    None
  }
}

fn clamp_unit(value: f64) -> f64 {
  if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Weighted composition of three dimension calculators.
#[derive(Clone)]
pub struct DefaultQualityCalculator {
  completeness: Arc<dyn QualityDimensionCalculator>,
  confidence: Arc<dyn QualityDimensionCalculator>,
  consistency: Arc<dyn QualityDimensionCalculator>,
  weights: QualityWeights,
}

impl fmt::Debug for DefaultQualityCalculator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DefaultQualityCalculator")
      .field("completeness", &self.completeness.name())
      .field("confidence", &self.confidence.name())
      .field("consistency", &self.consistency.name())
      .field("weights", &self.weights)
      .finish()
  }
}

impl DefaultQualityCalculator {
  pub const NAME: &'static str = "DefaultQualityCalculator";

  /// Composes the given calculators. Fails when the weights are invalid or a
  /// calculator is plugged into the slot of another dimension.
  pub fn new(
    completeness: Arc<dyn QualityDimensionCalculator>,
    confidence: Arc<dyn QualityDimensionCalculator>,
    consistency: Arc<dyn QualityDimensionCalculator>,
    weights: QualityWeights,
  ) -> Result<Self, ConfigurationError> {
    weights.validate()?;
    check_slot(QualityDimension::Completeness, completeness.as_ref())?;
    check_slot(QualityDimension::Confidence, confidence.as_ref())?;
    check_slot(QualityDimension::Consistency, consistency.as_ref())?;
    Ok(Self {
      completeness,
      confidence,
      consistency,
      weights,
    })
  }

  /// Built-in algorithms with default weights.
  pub fn with_defaults() -> Self {
    Self {
      completeness: Arc::new(RequiredFieldsCompletenessCalculator::default()),
      confidence: Arc::new(TieredConfidenceCalculator::default()),
      consistency: Arc::new(DescriptionPrefixConsistencyCalculator::default()),
      weights: QualityWeights::default(),
    }
  }

  pub fn builder() -> DefaultQualityCalculatorBuilder {
    DefaultQualityCalculatorBuilder::default()
  }
}

fn check_slot(
  expected: QualityDimension,
  calculator: &dyn QualityDimensionCalculator,
) -> Result<(), ConfigurationError> {
  let actual = calculator.dimension();
  if actual == expected {
    Ok(())
  } else {
    Err(ConfigurationError::DimensionMismatch {
      expected: expected.to_string(),
      actual: actual.to_string(),
    })
  }
}

impl QualityCalculator for DefaultQualityCalculator {
  fn name(&self) -> &str {
    Self::NAME
  }

  #[instrument(level = "trace", skip(self, dataset), fields(rows = dataset.row_count()))]
  fn calculate(&self, dataset: &Dataset) -> QualityMetrics {
    let completeness = clamp_unit(self.completeness.calculate(dataset));
    let confidence = clamp_unit(self.confidence.calculate(dataset));
    let consistency = clamp_unit(self.consistency.calculate(dataset));
    let w = self.weights;
    let overall = clamp_unit(
      w.completeness * completeness + w.confidence * confidence + w.consistency * consistency,
    );
    debug!(
      completeness,
      confidence, consistency, overall, "quality dimensions scored"
    );
    QualityMetrics {
      completeness,
      confidence,
      consistency,
      overall_quality_index: overall,
    }
  }

  fn weights(&self) -> Option<QualityWeights> {
    Some(self.weights)
  }
}

/// Builder for [DefaultQualityCalculator]; every slot must be filled.
#[derive(Default)]
pub struct DefaultQualityCalculatorBuilder {
  completeness: Option<Arc<dyn QualityDimensionCalculator>>,
  confidence: Option<Arc<dyn QualityDimensionCalculator>>,
  consistency: Option<Arc<dyn QualityDimensionCalculator>>,
  weights: Option<QualityWeights>,
}

impl DefaultQualityCalculatorBuilder {
  pub fn completeness(mut self, calculator: Arc<dyn QualityDimensionCalculator>) -> Self {
    self.completeness = Some(calculator);
    self
  }

  pub fn confidence(mut self, calculator: Arc<dyn QualityDimensionCalculator>) -> Self {
    self.confidence = Some(calculator);
    self
  }

  pub fn consistency(mut self, calculator: Arc<dyn QualityDimensionCalculator>) -> Self {
    self.consistency = Some(calculator);
    self
  }

  /// Defaults to [QualityWeights::default] when not set.
  pub fn weights(mut self, weights: QualityWeights) -> Self {
    self.weights = Some(weights);
    self
  }

  pub fn build(self) -> Result<DefaultQualityCalculator, ConfigurationError> {
    let missing = |d: QualityDimension| ConfigurationError::MissingCalculator(d.to_string());
    DefaultQualityCalculator::new(
      self
        .completeness
        .ok_or_else(|| missing(QualityDimension::Completeness))?,
      self
        .confidence
        .ok_or_else(|| missing(QualityDimension::Confidence))?,
      self
        .consistency
        .ok_or_else(|| missing(QualityDimension::Consistency))?,
      self.weights.unwrap_or_default(),
    )
  }
}

/// Scores confidence only; completeness and consistency are reported as `0.0`
/// and the overall index equals the confidence score.
#[derive(Clone)]
pub struct ConfidenceOnlyQualityCalculator {
  confidence: Arc<dyn QualityDimensionCalculator>,
}

impl fmt::Debug for ConfidenceOnlyQualityCalculator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConfidenceOnlyQualityCalculator")
      .field("confidence", &self.confidence.name())
      .finish()
  }
}

impl Default for ConfidenceOnlyQualityCalculator {
  fn default() -> Self {
    Self {
      confidence: Arc::new(TieredConfidenceCalculator::default()),
    }
  }
}

impl ConfidenceOnlyQualityCalculator {
  pub const NAME: &'static str = "ConfidenceOnlyQualityCalculator";

  pub fn new(confidence: Arc<dyn QualityDimensionCalculator>) -> Result<Self, ConfigurationError> {
    check_slot(QualityDimension::Confidence, confidence.as_ref())?;
    Ok(Self { confidence })
  }
}

impl QualityCalculator for ConfidenceOnlyQualityCalculator {
  fn name(&self) -> &str {
    Self::NAME
  }

  fn calculate(&self, dataset: &Dataset) -> QualityMetrics {
    let confidence = clamp_unit(self.confidence.calculate(dataset));
    QualityMetrics {
      completeness: 0.0,
      confidence,
      consistency: 0.0,
      overall_quality_index: confidence,
    }
  }
}
