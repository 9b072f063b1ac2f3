//! Aggregate record of one pipeline run, persisted as one JSON object per run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::step_metadata::seconds_between;
use super::{QualityMetrics, RunContext, StepError, StepMetadata};

/// Root record of a pipeline run.
///
/// Created when a run starts and mutated only through
/// [MetadataCollector](crate::collector::MetadataCollector); read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
  run_id: Uuid,
  pipeline_name: String,
  start_time: DateTime<Utc>,
  end_time: DateTime<Utc>,
  duration_seconds: f64,
  result_code: i32,
  error: Option<StepError>,
  quality_index: Option<f64>,
  quality_calculator_name: Option<String>,
  #[serde(default)]
  quality_metrics: Option<QualityMetrics>,
  #[serde(default)]
  input_rows: Option<usize>,
  #[serde(default)]
  output_rows: Option<usize>,
  #[serde(default)]
  context: RunContext,
  steps: Vec<StepMetadata>,
}

impl PipelineMetadata {
  /// Starts a fresh record with a new run id and `start_time = now`.
  pub(crate) fn start(pipeline_name: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      run_id: Uuid::new_v4(),
      pipeline_name: pipeline_name.into(),
      start_time: now,
      end_time: now,
      duration_seconds: 0.0,
      result_code: 0,
      error: None,
      quality_index: None,
      quality_calculator_name: None,
      quality_metrics: None,
      input_rows: None,
      output_rows: None,
      context: RunContext::new(),
      steps: Vec::new(),
    }
  }

  pub fn run_id(&self) -> Uuid {
    self.run_id
  }

  pub fn pipeline_name(&self) -> &str {
    &self.pipeline_name
  }

  pub fn start_time(&self) -> DateTime<Utc> {
    self.start_time
  }

  pub fn end_time(&self) -> DateTime<Utc> {
    self.end_time
  }

  pub fn duration_seconds(&self) -> f64 {
    self.duration_seconds
  }

  pub fn result_code(&self) -> i32 {
    self.result_code
  }

  pub fn error(&self) -> Option<&StepError> {
    self.error.as_ref()
  }

  pub fn quality_index(&self) -> Option<f64> {
    self.quality_index
  }

  pub fn quality_calculator_name(&self) -> Option<&str> {
    self.quality_calculator_name.as_deref()
  }

  pub fn quality_metrics(&self) -> Option<&QualityMetrics> {
    self.quality_metrics.as_ref()
  }

  /// Input rows of the first recorded step.
  pub fn input_rows(&self) -> Option<usize> {
    self.input_rows
  }

  /// Output rows of the last recorded step.
  pub fn output_rows(&self) -> Option<usize> {
    self.output_rows
  }

  /// Shared context as it stood when the run ended.
  pub fn context(&self) -> &RunContext {
    &self.context
  }

  /// Recorded steps in execution order.
  pub fn steps(&self) -> &[StepMetadata] {
    &self.steps
  }

  pub fn succeeded(&self) -> bool {
    self.result_code >= 0
  }

  /// The step that halted the run, if any.
  pub fn failed_step(&self) -> Option<&StepMetadata> {
    self.steps.iter().find(|s| !s.succeeded())
  }

  pub(crate) fn push_step(&mut self, step: StepMetadata) {
    if self.steps.is_empty() {
      self.input_rows = Some(step.input_rows);
    }
    self.output_rows = Some(step.output_rows);
    self.steps.push(step);
  }

  pub(crate) fn set_quality(
    &mut self,
    index: f64,
    calculator_name: Option<String>,
    metrics: Option<QualityMetrics>,
  ) {
    self.quality_index = Some(index);
    self.quality_calculator_name = calculator_name;
    self.quality_metrics = metrics;
  }

  pub(crate) fn finish(&mut self, result_code: i32, error: Option<StepError>, context: RunContext) {
    self.end_time = Utc::now().max(self.start_time);
    self.duration_seconds = seconds_between(self.start_time, self.end_time);
    self.result_code = result_code;
    self.error = if result_code < 0 {
      Some(error.unwrap_or_else(|| {
        StepError::new(format!("pipeline failed with result code {result_code}"))
      }))
    } else {
      None
    };
    self.context = context;
  }
}
