//! Result of executing a single pipeline step.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::Dataset;

/// Result code reported by a step that completed normally.
pub const RESULT_OK: i32 = 0;
/// Result code used when a failing step does not pick a more specific one.
pub const RESULT_FAILED: i32 = -1;
/// Result code recorded when a step publishes a malformed reserved metadata value.
pub const RESULT_INVALID_METADATA: i32 = -2;

/// Reserved metadata key: overall quality index, a number in `[0, 1]`.
pub const QUALITY_INDEX_KEY: &str = "quality_index";
/// Reserved metadata key: name of the calculator that produced the index.
pub const QUALITY_CALCULATOR_KEY: &str = "quality_calculator_name";
/// Reserved metadata key: full [QualityMetrics](super::QualityMetrics) object.
pub const QUALITY_METRICS_KEY: &str = "quality_metrics";
/// Keys the pipeline lifts onto the run record instead of the step's parameters.
pub const RESERVED_KEYS: [&str; 3] = [QUALITY_INDEX_KEY, QUALITY_CALCULATOR_KEY, QUALITY_METRICS_KEY];

/// Open key/value fragment a step hands to the pipeline.
pub type StepMetadataMap = BTreeMap<String, Value>;

/// Structured failure detail carried by failed steps and runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepError {
  pub message: String,
}

impl StepError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

impl fmt::Display for StepError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message)
  }
}

/// Result of executing a single pipeline step.
///
/// `result_code` is `0` on success, negative on failure and positive for a
/// success with a warning. `error` is set exactly when the code is negative;
/// the constructors are the only way to build one, so the pairing always holds.
#[derive(Debug, Clone)]
pub struct StepOutcome {
  dataset: Dataset,
  result_code: i32,
  error: Option<StepError>,
  metadata: StepMetadataMap,
}

impl StepOutcome {
  pub fn success(dataset: Dataset) -> Self {
    Self {
      dataset,
      result_code: RESULT_OK,
      error: None,
      metadata: StepMetadataMap::new(),
    }
  }

  /// Success with a positive warning code. Non-positive codes are recorded as `1`.
  pub fn warning(dataset: Dataset, code: i32) -> Self {
    Self {
      dataset,
      result_code: code.max(1),
      error: None,
      metadata: StepMetadataMap::new(),
    }
  }

  /// Failure with [RESULT_FAILED].
  pub fn failure(dataset: Dataset, message: impl Into<String>) -> Self {
    Self::failure_with_code(dataset, RESULT_FAILED, message)
  }

  /// Failure with a specific negative code. Non-negative codes are recorded as [RESULT_FAILED].
  pub fn failure_with_code(dataset: Dataset, code: i32, message: impl Into<String>) -> Self {
    let result_code = if code < 0 { code } else { RESULT_FAILED };
    Self {
      dataset,
      result_code,
      error: Some(StepError::new(message)),
      metadata: StepMetadataMap::new(),
    }
  }

  /// Adds one metadata entry.
  pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.metadata.insert(key.into(), value.into());
    self
  }

  pub fn succeeded(&self) -> bool {
    self.result_code >= 0
  }

  pub fn result_code(&self) -> i32 {
    self.result_code
  }

  pub fn error(&self) -> Option<&StepError> {
    self.error.as_ref()
  }

  pub fn dataset(&self) -> &Dataset {
    &self.dataset
  }

  pub fn metadata(&self) -> &StepMetadataMap {
    &self.metadata
  }

  /// Splits the outcome into its parts, handing the dataset on to the next owner.
  pub fn into_parts(self) -> (Dataset, i32, Option<StepError>, StepMetadataMap) {
    (self.dataset, self.result_code, self.error, self.metadata)
  }
}
