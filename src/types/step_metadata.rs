//! Timing, row-count and parameter record for one executed step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{StepError, StepMetadataMap};

/// One recorded step of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepMetadata {
  pub name: String,
  pub start_time: DateTime<Utc>,
  pub end_time: DateTime<Utc>,
  /// `end_time - start_time` in seconds.
  pub duration_seconds: f64,
  pub input_rows: usize,
  pub output_rows: usize,
  #[serde(default)]
  pub parameters: StepMetadataMap,
  pub result_code: i32,
  pub error: Option<StepError>,
}

impl StepMetadata {
  /// Builds a step record. A negative code without an error gets a generic
  /// message; an error attached to a non-negative code is dropped. An end
  /// before the start is clamped to the start.
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    name: impl Into<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    input_rows: usize,
    output_rows: usize,
    parameters: StepMetadataMap,
    result_code: i32,
    error: Option<StepError>,
  ) -> Self {
    let error = if result_code < 0 {
      Some(error.unwrap_or_else(|| {
        StepError::new(format!("step failed with result code {result_code}"))
      }))
    } else {
      None
    };
    let end_time = end_time.max(start_time);
    Self {
      name: name.into(),
      start_time,
      end_time,
      duration_seconds: seconds_between(start_time, end_time),
      input_rows,
      output_rows,
      parameters,
      result_code,
      error,
    }
  }

  pub fn succeeded(&self) -> bool {
    self.result_code >= 0
  }
}

/// Elapsed seconds between two instants, never negative.
pub(crate) fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
  (end - start)
    .num_microseconds()
    .map(|us| us as f64 / 1_000_000.0)
    .unwrap_or(0.0)
    .max(0.0)
}
