//! Tabular dataset handed from step to step.
//!
//! A dataset is an ordered list of column names plus rows keyed by column.
//! Cells are JSON values; `Null` (or an absent key) means the cell is missing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One row: column name to cell value.
pub type Row = BTreeMap<String, Value>;

/// Tabular payload passed between pipeline steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
  columns: Vec<String>,
  rows: Vec<Row>,
}

impl Dataset {
  /// Creates an empty dataset with the given columns.
  pub fn new<I, S>(columns: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      columns: columns.into_iter().map(Into::into).collect(),
      rows: Vec::new(),
    }
  }

  /// Builds a dataset from rows; columns are taken in order of first appearance.
  pub fn from_rows(rows: Vec<Row>) -> Self {
    let mut dataset = Self::default();
    for row in rows {
      dataset.push_row(row);
    }
    dataset
  }

  pub fn columns(&self) -> &[String] {
    &self.columns
  }

  pub fn rows(&self) -> &[Row] {
    &self.rows
  }

  pub fn rows_mut(&mut self) -> &mut Vec<Row> {
    &mut self.rows
  }

  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  pub fn has_column(&self, column: &str) -> bool {
    self.columns.iter().any(|c| c == column)
  }

  /// Adds a column if it is not present yet. Existing rows are left untouched
  /// (a missing key reads as a missing cell).
  pub fn ensure_column(&mut self, column: &str) {
    if !self.has_column(column) {
      self.columns.push(column.to_string());
    }
  }

  /// Appends a row, registering any column it introduces.
  pub fn push_row(&mut self, row: Row) {
    for key in row.keys() {
      self.ensure_column(key);
    }
    self.rows.push(row);
  }

  /// Appends every row of `other`, keeping this dataset's column order first.
  pub fn append(&mut self, other: Dataset) {
    for column in &other.columns {
      self.ensure_column(column);
    }
    self.rows.extend(other.rows);
  }

  /// Consumes the dataset, keeping only rows for which `keep` returns true.
  pub fn retain_rows(mut self, keep: impl FnMut(&Row) -> bool) -> Self {
    self.rows.retain(keep);
    self
  }
}

/// Returns the cell as trimmed, non-empty text. Numbers and booleans are rendered
/// as text; null, empty and whitespace-only cells are `None`.
pub fn cell_text(row: &Row, column: &str) -> Option<String> {
  match row.get(column)? {
    Value::Null => None,
    Value::String(s) => {
      let trimmed = s.trim();
      (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    other => Some(other.to_string()),
  }
}

/// Returns the cell as a finite number. Numeric strings are parsed; anything
/// else (null, blank, non-numeric, NaN) is `None`.
pub fn cell_number(row: &Row, column: &str) -> Option<f64> {
  let n = match row.get(column)? {
    Value::Number(n) => n.as_f64()?,
    Value::String(s) => s.trim().parse::<f64>().ok()?,
    _ => return None,
  };
  n.is_finite().then_some(n)
}

/// True when the cell exists and is not null, empty or whitespace-only.
pub fn cell_present(row: &Row, column: &str) -> bool {
  cell_text(row, column).is_some()
}
