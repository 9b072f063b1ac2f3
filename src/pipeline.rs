//! Sequential, fail-fast pipeline orchestrator.
//!
//! - [Step]: one unit of work, `(dataset, context) -> StepOutcome`.
//! - [Pipeline]: runs its steps in order, records a [StepMetadata] per attempted
//!   step, halts on the first failure and persists the run record.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::collector::{MetadataCollector, QualityLift};
use crate::error::PipelineError;
use crate::repository::MetadataRepository;
use crate::types::{
  Dataset, PipelineMetadata, QUALITY_CALCULATOR_KEY, QUALITY_INDEX_KEY, QUALITY_METRICS_KEY,
  QualityMetrics, RESULT_INVALID_METADATA, RunContext, StepError, StepMetadata, StepMetadataMap,
  StepOutcome,
};

/// One unit of pipeline work.
///
/// A step takes ownership of the current dataset and returns the dataset the
/// next step receives inside its [StepOutcome]. Failures are reported through
/// the outcome (negative result code), never by panicking. `context` is shared
/// by every step of the run; writes are visible to later steps.
pub trait Step: Send + Sync {
  /// Name recorded in the step's metadata.
  fn name(&self) -> &str;

  fn execute(&self, dataset: Dataset, context: &mut RunContext) -> StepOutcome;
}

/// Result of [Pipeline::run]: the run record and the last dataset.
///
/// On failure `dataset` is the one returned by the failing step.
#[derive(Debug, Clone)]
pub struct RunReport {
  pub metadata: PipelineMetadata,
  pub dataset: Dataset,
}

impl RunReport {
  pub fn succeeded(&self) -> bool {
    self.metadata.succeeded()
  }
}

/// Ordered steps plus an optional repository the run record is saved to.
pub struct Pipeline {
  name: String,
  steps: Vec<Box<dyn Step>>,
  repository: Option<Arc<dyn MetadataRepository>>,
}

impl std::fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("name", &self.name)
      .field("steps", &self.step_names())
      .field("repository", &self.repository.is_some())
      .finish()
  }
}

impl Pipeline {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      steps: Vec::new(),
      repository: None,
    }
  }

  pub fn with_step(mut self, step: impl Step + 'static) -> Self {
    self.steps.push(Box::new(step));
    self
  }

  pub fn add_step(&mut self, step: Box<dyn Step>) {
    self.steps.push(step);
  }

  /// Every run of this pipeline is saved to `repository`, on success and on failure.
  pub fn with_repository(mut self, repository: Arc<dyn MetadataRepository>) -> Self {
    self.repository = Some(repository);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name()).collect()
  }

  /// Runs every step in order on `initial`.
  ///
  /// A step failure is not an `Err`: the returned report carries the failing
  /// step's code and error, and no later step runs. `Err` is reserved for a
  /// run record that could not be persisted.
  #[instrument(level = "trace", skip(self, initial, context), fields(pipeline = %self.name))]
  pub fn run(&self, initial: Dataset, context: &mut RunContext) -> Result<RunReport, PipelineError> {
    let mut collector = MetadataCollector::start(&self.name);
    let run_id = collector.run_id();
    info!(
      run_id = %run_id,
      pipeline = %self.name,
      steps = self.steps.len(),
      input_rows = initial.row_count(),
      "pipeline run started"
    );

    let mut current = initial;
    for step in &self.steps {
      let step_start = Utc::now();
      let input_rows = current.row_count();
      let outcome = step.execute(current, context);
      let step_end = Utc::now().max(step_start);

      let (dataset, mut result_code, mut step_error, mut parameters) = outcome.into_parts();
      let lift = match take_quality_lift(&mut parameters) {
        Ok(lift) => lift,
        Err(message) => {
          if result_code >= 0 {
            result_code = RESULT_INVALID_METADATA;
            step_error = Some(StepError::new(message));
          }
          None
        }
      };

      let record = StepMetadata::new(
        step.name(),
        step_start,
        step_end,
        input_rows,
        dataset.row_count(),
        parameters,
        result_code,
        step_error,
      );
      info!(
        run_id = %run_id,
        step = step.name(),
        input_rows = record.input_rows,
        output_rows = record.output_rows,
        duration_seconds = record.duration_seconds,
        result_code,
        "step finished"
      );
      let failure = record.error.clone();
      collector.record_step(record);

      if result_code < 0 {
        error!(
          run_id = %run_id,
          step = step.name(),
          result_code,
          error = failure.as_ref().map(|e| e.message.as_str()).unwrap_or_default(),
          "step failed; halting pipeline"
        );
        let metadata = collector.finalize(result_code, failure, context);
        self.persist(&metadata)?;
        return Ok(RunReport { metadata, dataset });
      }
      if result_code > 0 {
        warn!(run_id = %run_id, step = step.name(), result_code, "step completed with warning");
      }
      if let Some(lift) = lift {
        collector.record_quality(lift);
      }
      current = dataset;
    }

    let metadata = collector.finalize(0, None, context);
    info!(
      run_id = %run_id,
      pipeline = %self.name,
      duration_seconds = metadata.duration_seconds(),
      quality_index = ?metadata.quality_index(),
      "pipeline run completed"
    );
    self.persist(&metadata)?;
    Ok(RunReport {
      metadata,
      dataset: current,
    })
  }

  fn persist(&self, metadata: &PipelineMetadata) -> Result<(), PipelineError> {
    let Some(repository) = &self.repository else {
      return Ok(());
    };
    repository.save(metadata).map(|_| ()).map_err(|e| {
      error!(run_id = %metadata.run_id(), error = %e, "failed to persist pipeline metadata");
      PipelineError::from(e)
    })
  }
}

/// Removes the reserved quality keys from a step's metadata and validates them.
///
/// `quality_index` must be a number in `[0, 1]`, `quality_calculator_name` a
/// string and `quality_metrics` a [QualityMetrics] object. The name and metrics
/// are only accepted alongside an index.
pub(crate) fn take_quality_lift(
  parameters: &mut StepMetadataMap,
) -> Result<Option<QualityLift>, String> {
  let index = parameters.remove(QUALITY_INDEX_KEY);
  let name = parameters.remove(QUALITY_CALCULATOR_KEY);
  let metrics = parameters.remove(QUALITY_METRICS_KEY);

  let Some(index) = index.filter(|v| !v.is_null()) else {
    if name.as_ref().is_some_and(|v| !v.is_null()) || metrics.as_ref().is_some_and(|v| !v.is_null()) {
      return Err(format!(
        "{QUALITY_CALCULATOR_KEY}/{QUALITY_METRICS_KEY} reported without {QUALITY_INDEX_KEY}"
      ));
    }
    return Ok(None);
  };

  let index = index
    .as_f64()
    .filter(|i| (0.0..=1.0).contains(i))
    .ok_or_else(|| format!("{QUALITY_INDEX_KEY} must be a number in [0, 1], got {index}"))?;

  let calculator_name = match name {
    None | Some(Value::Null) => None,
    Some(Value::String(s)) => Some(s),
    Some(other) => {
      return Err(format!(
        "{QUALITY_CALCULATOR_KEY} must be a string, got {other}"
      ));
    }
  };

  let metrics = match metrics {
    None | Some(Value::Null) => None,
    Some(value) => Some(
      serde_json::from_value::<QualityMetrics>(value)
        .map_err(|e| format!("{QUALITY_METRICS_KEY} is malformed: {e}"))?,
    ),
  };

  Ok(Some(QualityLift {
    index,
    calculator_name,
    metrics,
  }))
}
