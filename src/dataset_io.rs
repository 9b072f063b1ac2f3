//! CSV load/save for [Dataset].
//!
//! Cells are read as strings; empty cells become `null`. On write, `null` is an
//! empty cell and non-string values use their JSON text.

use std::path::Path;

use serde_json::Value;
use tracing::instrument;

use crate::error::DatasetIoError;
use crate::types::{Dataset, Row};

/// Loads a CSV file with a header row.
#[instrument(level = "trace")]
pub fn read_csv(path: &Path) -> Result<Dataset, DatasetIoError> {
  let csv_err = |source| DatasetIoError::Csv {
    path: path.to_path_buf(),
    source,
  };
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .from_path(path)
    .map_err(csv_err)?;
  let headers: Vec<String> = reader
    .headers()
    .map_err(csv_err)?
    .iter()
    .map(|h| h.trim().to_string())
    .collect();
  let mut dataset = Dataset::new(headers.clone());
  for record in reader.records() {
    let record = record.map_err(csv_err)?;
    let row: Row = headers
      .iter()
      .enumerate()
      .map(|(i, h)| {
        let value = match record.get(i) {
          Some(s) if !s.is_empty() => Value::String(s.to_string()),
          _ => Value::Null,
        };
        (h.clone(), value)
      })
      .collect();
    dataset.push_row(row);
  }
  Ok(dataset)
}

/// Writes `dataset` as CSV, creating parent directories as needed.
#[instrument(level = "trace", skip(dataset), fields(rows = dataset.row_count()))]
pub fn write_csv(path: &Path, dataset: &Dataset) -> Result<(), DatasetIoError> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent).map_err(|source| DatasetIoError::Io {
      path: parent.to_path_buf(),
      source,
    })?;
  }
  let csv_err = |source| DatasetIoError::Csv {
    path: path.to_path_buf(),
    source,
  };
  let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
  writer.write_record(dataset.columns()).map_err(csv_err)?;
  for row in dataset.rows() {
    let record: Vec<String> = dataset
      .columns()
      .iter()
      .map(|c| cell_to_field(row.get(c)))
      .collect();
    writer.write_record(&record).map_err(csv_err)?;
  }
  writer.flush().map_err(|source| DatasetIoError::Io {
    path: path.to_path_buf(),
    source,
  })
}

fn cell_to_field(value: Option<&Value>) -> String {
  match value {
    None | Some(Value::Null) => String::new(),
    Some(Value::String(s)) => s.clone(),
    Some(other) => other.to_string(),
  }
}
