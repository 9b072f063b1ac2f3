//! Step that merges trained annotations into the dataset.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::dataset_io::read_csv;
use crate::pipeline::Step;
use crate::quality::AnnotationColumns;
use crate::types::{Dataset, Row, RunContext, StepOutcome, cell_number, cell_present, cell_text};

/// Default join key.
pub const DEFAULT_KEY_COLUMN: &str = "TransactionNumber";

/// Left-joins annotations (category, subcategory, confidence) read from a CSV
/// file onto the dataset by key columns.
///
/// For a matched row, the trained category and subcategory replace the current
/// ones when the current value is blank, or when the trained confidence is
/// present and the current one is missing or lower. The trained confidence
/// replaces the current one only in the latter case. Rows without a match, or
/// with a blank key, are left as they are. When the annotation file holds
/// several rows for one key, the first one wins.
///
/// Reports `annotation_file` and `merged_rows` (rows where anything changed).
#[derive(Debug, Clone)]
pub struct MergeAnnotationsStep {
  annotation_file: PathBuf,
  key_columns: Vec<String>,
  columns: AnnotationColumns,
}

impl MergeAnnotationsStep {
  pub const NAME: &'static str = "MergeAnnotationsStep";

  /// Joins on [DEFAULT_KEY_COLUMN] when `key_columns` is empty.
  pub fn new(annotation_file: impl Into<PathBuf>, key_columns: Vec<String>) -> Self {
    let key_columns = if key_columns.is_empty() {
      vec![DEFAULT_KEY_COLUMN.to_string()]
    } else {
      key_columns
    };
    Self {
      annotation_file: annotation_file.into(),
      key_columns,
      columns: AnnotationColumns::default(),
    }
  }

  pub fn with_columns(mut self, columns: AnnotationColumns) -> Self {
    self.columns = columns;
    self
  }

  fn key_of(&self, row: &Row) -> Option<Vec<String>> {
    self
      .key_columns
      .iter()
      .map(|c| cell_text(row, c))
      .collect()
  }

  /// Applies `trained` to `row`; true when anything changed.
  fn merge_row(&self, row: &mut Row, trained: &Row) -> bool {
    let c = &self.columns;
    let trained_conf = cell_number(trained, &c.confidence);
    let current_conf = cell_number(row, &c.confidence);
    let better = match (trained_conf, current_conf) {
      (Some(_), None) => true,
      (Some(t), Some(o)) => o < t,
      (None, _) => false,
    };
    let mut changed = false;
    for column in [&c.category, &c.subcategory] {
      let Some(value) = trained.get(column).filter(|_| cell_present(trained, column)) else {
        continue;
      };
      if (!cell_present(row, column) || better) && row.get(column) != Some(value) {
        row.insert(column.clone(), value.clone());
        changed = true;
      }
    }
    if better
      && let Some(value) = trained.get(&c.confidence)
      && row.get(&c.confidence) != Some(value)
    {
      row.insert(c.confidence.clone(), value.clone());
      changed = true;
    }
    changed
  }
}

impl Step for MergeAnnotationsStep {
  fn name(&self) -> &str {
    Self::NAME
  }

  #[instrument(level = "trace", skip(self, dataset, _context), fields(file = %self.annotation_file.display()))]
  fn execute(&self, mut dataset: Dataset, _context: &mut RunContext) -> StepOutcome {
    let trained = match read_csv(&self.annotation_file) {
      Ok(trained) => trained,
      Err(e) => return StepOutcome::failure(dataset, e.to_string()),
    };
    let mut by_key: HashMap<Vec<String>, &Row> = HashMap::new();
    for row in trained.rows() {
      match self.key_of(row) {
        Some(key) => {
          by_key.entry(key).or_insert(row);
        }
        None => debug!("annotation row without key skipped"),
      }
    }
    if by_key.is_empty() {
      warn!(file = %self.annotation_file.display(), "annotation file has no keyed rows");
    }

    let c = &self.columns;
    for column in [&c.category, &c.subcategory, &c.confidence] {
      dataset.ensure_column(column);
    }
    let mut merged = 0usize;
    for row in dataset.rows_mut() {
      let Some(annotation) = self.key_of(row).and_then(|k| by_key.get(&k).copied()) else {
        continue;
      };
      if self.merge_row(row, annotation) {
        merged += 1;
      }
    }
    info!(rows = dataset.row_count(), merged_rows = merged, "annotations merged");
    StepOutcome::success(dataset)
      .with_metadata(
        "annotation_file",
        Value::String(self.annotation_file.display().to_string()),
      )
      .with_metadata("merged_rows", merged)
  }
}
