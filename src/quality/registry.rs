//! Quality calculator configuration and the registry that turns it into a
//! calculator at pipeline-assembly time.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::calculator::{
  ConfidenceOnlyQualityCalculator, DefaultQualityCalculator, QualityCalculator, QualityDimension,
  QualityDimensionCalculator,
};
use super::columns::AnnotationColumns;
use super::completeness::RequiredFieldsCompletenessCalculator;
use super::confidence::{MeanConfidenceCalculator, TieredConfidenceCalculator};
use super::consistency::{DEFAULT_PREFIX_LEN, DescriptionPrefixConsistencyCalculator};
use super::weights::QualityWeights;
use crate::error::ConfigurationError;

/// Calculator name selecting [DefaultQualityCalculator].
pub const DEFAULT_CALCULATOR: &str = "default";
/// Calculator name selecting [ConfidenceOnlyQualityCalculator].
pub const CONFIDENCE_ONLY_CALCULATOR: &str = "confidence_only";

/// Which calculator to build and how. Every field has a default, so `{}` is a
/// valid configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
  /// `default` or `confidence_only`.
  pub calculator: String,
  /// Completeness algorithm name.
  pub completeness: String,
  /// Confidence algorithm name (`tiered` or `mean`).
  pub confidence: String,
  /// Consistency algorithm name.
  pub consistency: String,
  pub weights: QualityWeights,
  pub consistency_prefix_len: usize,
  pub columns: AnnotationColumns,
}

impl Default for QualityConfig {
  fn default() -> Self {
    Self {
      calculator: DEFAULT_CALCULATOR.to_string(),
      completeness: RequiredFieldsCompletenessCalculator::NAME.to_string(),
      confidence: TieredConfidenceCalculator::NAME.to_string(),
      consistency: DescriptionPrefixConsistencyCalculator::NAME.to_string(),
      weights: QualityWeights::default(),
      consistency_prefix_len: DEFAULT_PREFIX_LEN,
      columns: AnnotationColumns::default(),
    }
  }
}

impl QualityConfig {
  /// Reads a JSON configuration file.
  #[instrument(level = "trace")]
  pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidConfigFile {
      path: path.to_path_buf(),
      reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))
  }
}

/// Builds a dimension calculator from the configuration.
pub type DimensionFactory = fn(&QualityConfig) -> Arc<dyn QualityDimensionCalculator>;

/// Maps `<dimension>.<algorithm>` names to dimension calculator factories.
#[derive(Debug, Clone)]
pub struct CalculatorRegistry {
  factories: BTreeMap<String, DimensionFactory>,
}

fn key(dimension: QualityDimension, algorithm: &str) -> String {
  format!("{dimension}.{algorithm}")
}

impl Default for CalculatorRegistry {
  /// Registry with the built-in algorithms.
  fn default() -> Self {
    let mut registry = Self::empty();
    registry.register(
      QualityDimension::Completeness,
      RequiredFieldsCompletenessCalculator::NAME,
      |c| Arc::new(RequiredFieldsCompletenessCalculator::new(c.columns.clone())),
    );
    registry.register(
      QualityDimension::Confidence,
      TieredConfidenceCalculator::NAME,
      |c| Arc::new(TieredConfidenceCalculator::new(c.columns.clone())),
    );
    registry.register(
      QualityDimension::Confidence,
      MeanConfidenceCalculator::NAME,
      |c| Arc::new(MeanConfidenceCalculator::new(c.columns.clone())),
    );
    registry.register(
      QualityDimension::Consistency,
      DescriptionPrefixConsistencyCalculator::NAME,
      |c| {
        Arc::new(DescriptionPrefixConsistencyCalculator::new(
          c.columns.clone(),
          c.consistency_prefix_len,
        ))
      },
    );
    registry
  }
}

impl CalculatorRegistry {
  pub fn empty() -> Self {
    Self {
      factories: BTreeMap::new(),
    }
  }

  /// Registers (or replaces) an algorithm for a dimension.
  pub fn register(&mut self, dimension: QualityDimension, algorithm: &str, factory: DimensionFactory) {
    self.factories.insert(key(dimension, algorithm), factory);
  }

  /// Registered names, `<dimension>.<algorithm>`, sorted.
  pub fn names(&self) -> Vec<&str> {
    self.factories.keys().map(String::as_str).collect()
  }

  fn dimension(
    &self,
    dimension: QualityDimension,
    algorithm: &str,
    config: &QualityConfig,
  ) -> Result<Arc<dyn QualityDimensionCalculator>, ConfigurationError> {
    let name = key(dimension, algorithm);
    let factory = self
      .factories
      .get(&name)
      .ok_or(ConfigurationError::UnknownCalculator(name))?;
    Ok(factory(config))
  }

  /// Builds the calculator described by `config`. Fails before any scoring
  /// happens when a name is unknown or the weights are invalid.
  #[instrument(level = "trace", skip(self))]
  pub fn build(&self, config: &QualityConfig) -> Result<Arc<dyn QualityCalculator>, ConfigurationError> {
    let confidence = self.dimension(QualityDimension::Confidence, &config.confidence, config)?;
    let calculator: Arc<dyn QualityCalculator> = match config.calculator.as_str() {
      DEFAULT_CALCULATOR => Arc::new(
        DefaultQualityCalculator::builder()
          .completeness(self.dimension(
            QualityDimension::Completeness,
            &config.completeness,
            config,
          )?)
          .confidence(confidence)
          .consistency(self.dimension(
            QualityDimension::Consistency,
            &config.consistency,
            config,
          )?)
          .weights(config.weights)
          .build()?,
      ),
      CONFIDENCE_ONLY_CALCULATOR => Arc::new(ConfidenceOnlyQualityCalculator::new(confidence)?),
      other => return Err(ConfigurationError::UnknownCalculator(other.to_string())),
    };
    debug!(calculator = calculator.name(), "quality calculator assembled");
    Ok(calculator)
  }
}
