//! Step that writes the dataset to a CSV file.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{info, instrument};

use crate::dataset_io::write_csv;
use crate::pipeline::Step;
use crate::types::{Dataset, RunContext, StepOutcome};

/// Writes the dataset as CSV, creating parent directories, and passes it on.
///
/// With `save_empty = false` an empty dataset is not written and no path is
/// reported. Otherwise reports the absolute `output_file_path`.
#[derive(Debug, Clone)]
pub struct SaveFileStep {
  output_path: PathBuf,
  save_empty: bool,
}

impl SaveFileStep {
  pub const NAME: &'static str = "SaveFileStep";

  pub fn new(output_path: impl Into<PathBuf>) -> Self {
    Self {
      output_path: output_path.into(),
      save_empty: true,
    }
  }

  pub fn save_empty(mut self, save_empty: bool) -> Self {
    self.save_empty = save_empty;
    self
  }

  pub fn output_path(&self) -> &std::path::Path {
    &self.output_path
  }
}

impl Step for SaveFileStep {
  fn name(&self) -> &str {
    Self::NAME
  }

  #[instrument(level = "trace", skip(self, dataset, _context), fields(path = %self.output_path.display()))]
  fn execute(&self, dataset: Dataset, _context: &mut RunContext) -> StepOutcome {
    if dataset.is_empty() && !self.save_empty {
      info!(path = %self.output_path.display(), "empty dataset not saved");
      return StepOutcome::success(dataset);
    }
    if let Err(e) = write_csv(&self.output_path, &dataset) {
      return StepOutcome::failure(dataset, e.to_string());
    }
    let absolute = std::path::absolute(&self.output_path).unwrap_or_else(|_| self.output_path.clone());
    info!(path = %absolute.display(), rows = dataset.row_count(), "dataset saved");
    StepOutcome::success(dataset).with_metadata(
      "output_file_path",
      Value::String(absolute.display().to_string()),
    )
  }
}
