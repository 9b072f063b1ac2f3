//! Tests for `StepOutcome`.

use super::{Dataset, RESULT_FAILED, StepOutcome};

#[test]
fn success_creates_success_outcome() {
  let o = StepOutcome::success(Dataset::default());
  assert!(o.succeeded());
  assert_eq!(o.result_code(), 0);
  assert!(o.error().is_none());
  assert!(o.metadata().is_empty());
}

#[test]
fn failure_creates_failure_outcome() {
  let o = StepOutcome::failure(Dataset::default(), "boom");
  assert!(!o.succeeded());
  assert_eq!(o.result_code(), RESULT_FAILED);
  assert_eq!(o.error().map(|e| e.message.as_str()), Some("boom"));
}

#[test]
fn failure_with_code_keeps_negative_code() {
  let o = StepOutcome::failure_with_code(Dataset::default(), -7, "bad input");
  assert_eq!(o.result_code(), -7);
  assert!(o.error().is_some());
}

#[test]
fn failure_with_non_negative_code_is_forced_negative() {
  let o = StepOutcome::failure_with_code(Dataset::default(), 0, "oops");
  assert_eq!(o.result_code(), RESULT_FAILED);
  assert!(!o.succeeded());
}

#[test]
fn warning_succeeds_without_error() {
  let o = StepOutcome::warning(Dataset::default(), 3);
  assert!(o.succeeded());
  assert_eq!(o.result_code(), 3);
  assert!(o.error().is_none());
  assert_eq!(StepOutcome::warning(Dataset::default(), -4).result_code(), 1);
}

#[test]
fn with_metadata_accumulates_entries() {
  let o = StepOutcome::success(Dataset::default())
    .with_metadata("output_file_path", "/tmp/out.csv")
    .with_metadata("rows", 3);
  assert_eq!(o.metadata().len(), 2);
  assert_eq!(o.metadata()["rows"], serde_json::json!(3));
}
