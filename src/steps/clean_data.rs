//! Step that applies an ordered list of cleaning functions.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::pipeline::Step;
use crate::types::{Dataset, RunContext, StepOutcome, cell_present};

/// A named dataset-to-dataset transformation.
#[derive(Clone)]
pub struct Cleaner {
  name: String,
  apply: Arc<dyn Fn(Dataset) -> Dataset + Send + Sync>,
}

impl Cleaner {
  pub fn new(name: impl Into<String>, apply: impl Fn(Dataset) -> Dataset + Send + Sync + 'static) -> Self {
    Self {
      name: name.into(),
      apply: Arc::new(apply),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn apply(&self, dataset: Dataset) -> Dataset {
    (self.apply)(dataset)
  }
}

impl fmt::Debug for Cleaner {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Cleaner").field(&self.name).finish()
  }
}

/// Trims surrounding whitespace from every string cell; cells left empty become null.
pub fn trim_cells(mut dataset: Dataset) -> Dataset {
  for row in dataset.rows_mut() {
    for value in row.values_mut() {
      if let Value::String(s) = value {
        let trimmed = s.trim();
        if trimmed.is_empty() {
          *value = Value::Null;
        } else if trimmed.len() != s.len() {
          *value = Value::String(trimmed.to_string());
        }
      }
    }
  }
  dataset
}

/// Drops rows in which no column has a present value.
pub fn drop_blank_rows(dataset: Dataset) -> Dataset {
  dataset.retain_rows(|row| row.keys().any(|c| cell_present(row, c)))
}

/// Runs its cleaners in order. An empty dataset is passed through untouched
/// with a warning. Reports `cleaners` and `rows_removed`.
#[derive(Debug, Clone)]
pub struct CleanDataStep {
  cleaners: Vec<Cleaner>,
}

impl Default for CleanDataStep {
  /// [trim_cells] then [drop_blank_rows].
  fn default() -> Self {
    Self::new()
      .with_cleaner(Cleaner::new("trim_cells", trim_cells))
      .with_cleaner(Cleaner::new("drop_blank_rows", drop_blank_rows))
  }
}

impl CleanDataStep {
  pub const NAME: &'static str = "CleanDataStep";

  /// No cleaners; the dataset passes through unchanged.
  pub fn new() -> Self {
    Self { cleaners: Vec::new() }
  }

  pub fn with_cleaner(mut self, cleaner: Cleaner) -> Self {
    self.cleaners.push(cleaner);
    self
  }

  pub fn cleaner_names(&self) -> Vec<&str> {
    self.cleaners.iter().map(Cleaner::name).collect()
  }
}

impl Step for CleanDataStep {
  fn name(&self) -> &str {
    Self::NAME
  }

  fn execute(&self, dataset: Dataset, _context: &mut RunContext) -> StepOutcome {
    let names: Vec<Value> = self
      .cleaners
      .iter()
      .map(|c| Value::String(c.name.clone()))
      .collect();
    if dataset.is_empty() {
      warn!("no data to clean");
      return StepOutcome::success(dataset)
        .with_metadata("cleaners", names)
        .with_metadata("rows_removed", 0);
    }
    let before = dataset.row_count();
    let cleaned = self.cleaners.iter().fold(dataset, |d, c| c.apply(d));
    let removed = before.saturating_sub(cleaned.row_count());
    info!(rows = cleaned.row_count(), rows_removed = removed, "data cleaned");
    StepOutcome::success(cleaned)
      .with_metadata("cleaners", names)
      .with_metadata("rows_removed", removed)
  }
}
