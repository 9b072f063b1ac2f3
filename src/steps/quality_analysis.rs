//! Step that scores the current dataset with a [QualityCalculator].

use std::sync::Arc;

use tracing::instrument;

use crate::pipeline::Step;
use crate::quality::{QualityCalculator, QualityReporter};
use crate::types::{
  Dataset, QUALITY_CALCULATOR_KEY, QUALITY_INDEX_KEY, QUALITY_METRICS_KEY, RunContext, StepOutcome,
};

/// Computes quality metrics and passes the dataset through unchanged.
///
/// Publishes `quality_index`, `quality_calculator_name` and `quality_metrics`
/// in its outcome metadata; the pipeline lifts them onto the run record.
pub struct QualityAnalysisStep {
  calculator: Arc<dyn QualityCalculator>,
  reporter: Option<Arc<dyn QualityReporter>>,
}

impl QualityAnalysisStep {
  pub const NAME: &'static str = "QualityAnalysisStep";

  pub fn new(calculator: Arc<dyn QualityCalculator>) -> Self {
    Self {
      calculator,
      reporter: None,
    }
  }

  pub fn with_reporter(mut self, reporter: Arc<dyn QualityReporter>) -> Self {
    self.reporter = Some(reporter);
    self
  }
}

impl Step for QualityAnalysisStep {
  fn name(&self) -> &str {
    Self::NAME
  }

  #[instrument(level = "trace", skip(self, dataset, _context), fields(rows = dataset.row_count()))]
  fn execute(&self, dataset: Dataset, _context: &mut RunContext) -> StepOutcome {
    let metrics = self.calculator.calculate(&dataset);
    if let Some(reporter) = &self.reporter {
      reporter.report(self.calculator.name(), &metrics, self.calculator.weights());
    }
    let encoded = match serde_json::to_value(&metrics) {
      Ok(v) => v,
      Err(e) => return StepOutcome::failure(dataset, format!("encoding quality metrics: {e}")),
    };
    StepOutcome::success(dataset)
      .with_metadata(QUALITY_INDEX_KEY, metrics.overall_quality_index)
      .with_metadata(QUALITY_CALCULATOR_KEY, self.calculator.name())
      .with_metadata(QUALITY_METRICS_KEY, encoded)
  }
}
