//! Accumulates the metadata of one pipeline run.

use tracing::debug;
use uuid::Uuid;

use crate::types::{PipelineMetadata, QualityMetrics, RunContext, StepError, StepMetadata};

/// Quality facts lifted from a step's metadata onto the run record.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityLift {
  pub index: f64,
  pub calculator_name: Option<String>,
  pub metrics: Option<QualityMetrics>,
}

/// Builds a [PipelineMetadata] as the pipeline executes.
///
/// One collector per run: it is created when the run starts and consumed by
/// [finalize](Self::finalize). It owns no persistence logic.
#[derive(Debug)]
pub struct MetadataCollector {
  metadata: PipelineMetadata,
}

impl MetadataCollector {
  /// Starts a new run record (fresh run id, `start_time = now`).
  pub fn start(pipeline_name: impl Into<String>) -> Self {
    let metadata = PipelineMetadata::start(pipeline_name);
    debug!(run_id = %metadata.run_id(), pipeline = metadata.pipeline_name(), "metadata collection started");
    Self { metadata }
  }

  pub fn run_id(&self) -> Uuid {
    self.metadata.run_id()
  }

  /// The record collected so far.
  pub fn metadata(&self) -> &PipelineMetadata {
    &self.metadata
  }

  /// Appends a step record. Steps are never reordered.
  pub fn record_step(&mut self, step: StepMetadata) {
    self.metadata.push_step(step);
  }

  /// Sets the run-level quality index and calculator name. A later quality step
  /// overrides an earlier one.
  pub fn record_quality(&mut self, lift: QualityLift) {
    self
      .metadata
      .set_quality(lift.index, lift.calculator_name, lift.metrics);
  }

  /// Closes the record: `end_time = now`, result code/error, context snapshot.
  pub fn finalize(
    mut self,
    result_code: i32,
    error: Option<StepError>,
    context: &RunContext,
  ) -> PipelineMetadata {
    self.metadata.finish(result_code, error, context.clone());
    self.metadata
  }
}
