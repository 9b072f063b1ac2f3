//! Tests for `PipelineMetadata`.

use chrono::Utc;
use serde_json::json;

use super::{PipelineMetadata, QualityMetrics, RunContext, StepError, StepMetadata, StepMetadataMap};

fn step(name: &str, input: usize, output: usize, code: i32) -> StepMetadata {
  let now = Utc::now();
  StepMetadata::new(name, now, now, input, output, StepMetadataMap::new(), code, None)
}

#[test]
fn start_generates_unique_run_ids() {
  let a = PipelineMetadata::start("p");
  let b = PipelineMetadata::start("p");
  assert_ne!(a.run_id(), b.run_id());
  assert_eq!(a.pipeline_name(), "p");
  assert!(a.steps().is_empty());
  assert!(a.quality_index().is_none());
  assert!(a.quality_calculator_name().is_none());
}

#[test]
fn push_step_tracks_first_input_and_last_output() {
  let mut m = PipelineMetadata::start("p");
  m.push_step(step("a", 10, 8, 0));
  m.push_step(step("b", 8, 5, 0));
  assert_eq!(m.input_rows(), Some(10));
  assert_eq!(m.output_rows(), Some(5));
  let names: Vec<&str> = m.steps().iter().map(|s| s.name.as_str()).collect();
  assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn finish_with_failure_keeps_error() {
  let mut m = PipelineMetadata::start("p");
  m.push_step(step("a", 1, 1, 0));
  m.push_step(step("b", 1, 0, -1));
  m.finish(-1, Some(StepError::new("bad")), RunContext::new());
  assert!(!m.succeeded());
  assert_eq!(m.result_code(), -1);
  assert_eq!(m.error().map(|e| e.message.as_str()), Some("bad"));
  assert_eq!(m.failed_step().map(|s| s.name.as_str()), Some("b"));
  assert!(m.end_time() >= m.start_time());
  assert!(m.duration_seconds() >= 0.0);
}

#[test]
fn finish_with_failure_and_no_error_synthesizes_one() {
  let mut m = PipelineMetadata::start("p");
  m.finish(-4, None, RunContext::new());
  assert!(m.error().is_some());
}

#[test]
fn finish_with_success_clears_error() {
  let mut m = PipelineMetadata::start("p");
  m.finish(0, Some(StepError::new("ignored")), RunContext::new());
  assert!(m.succeeded());
  assert!(m.error().is_none());
}

#[test]
fn pipeline_metadata_serializes_contract_fields() {
  let mut m = PipelineMetadata::start("bank");
  m.push_step(step("load", 0, 3, 0));
  m.set_quality(
    0.8,
    Some("DefaultQualityCalculator".to_string()),
    Some(QualityMetrics::zero()),
  );
  let mut ctx = RunContext::new();
  ctx.insert("categories".to_string(), json!("context/candidate_categories.json"));
  m.finish(0, None, ctx);

  let v = serde_json::to_value(&m).unwrap();
  for key in [
    "run_id",
    "pipeline_name",
    "start_time",
    "end_time",
    "duration_seconds",
    "result_code",
    "error",
    "quality_index",
    "quality_calculator_name",
    "steps",
  ] {
    assert!(v.get(key).is_some(), "missing {key}");
  }
  assert_eq!(v["run_id"], json!(m.run_id().to_string()));
  assert_eq!(v["error"], json!(null));
  assert_eq!(v["quality_index"], json!(0.8));
  assert_eq!(v["quality_calculator_name"], "DefaultQualityCalculator");
  assert_eq!(v["steps"].as_array().unwrap().len(), 1);
  assert_eq!(v["context"]["categories"], "context/candidate_categories.json");
}
