//! Tests for metadata repositories.

use chrono::{Duration, Utc};
use serde_json::json;

use crate::collector::{MetadataCollector, QualityLift};
use crate::error::RepositoryError;
use crate::repository::{
  FileMetadataRepository, InMemoryMetadataRepository, MetadataRepository, default_storage_root,
};
use crate::types::{PipelineMetadata, QualityMetrics, RunContext, StepError, StepMetadata};

fn sample_metadata(failed: bool) -> PipelineMetadata {
  let mut c = MetadataCollector::start("bank_transaction_analysis");
  let t = Utc::now();
  let mut params = crate::types::StepMetadataMap::new();
  params.insert("output_file_path".to_string(), json!("/data/out.csv"));
  c.record_step(StepMetadata::new(
    "AppendFilesStep",
    t,
    t + Duration::milliseconds(12),
    0,
    3,
    params,
    0,
    None,
  ));
  c.record_quality(QualityLift {
    index: 0.7417,
    calculator_name: Some("DefaultQualityCalculator".to_string()),
    metrics: Some(QualityMetrics {
      completeness: 1.0,
      confidence: 0.7416666666666667,
      consistency: 1.0,
      overall_quality_index: 0.8708333333333333,
    }),
  });
  let (code, error) = if failed {
    c.record_step(StepMetadata::new(
      "SaveFileStep",
      t,
      t + Duration::milliseconds(3),
      3,
      0,
      Default::default(),
      -1,
      Some(StepError::new("permission denied")),
    ));
    (-1, Some(StepError::new("permission denied")))
  } else {
    (0, None)
  };
  let mut ctx = RunContext::new();
  ctx.insert("categories".to_string(), json!(["Food", "Transport"]));
  c.finalize(code, error, &ctx)
}

#[test]
fn file_repository_roundtrip_is_field_for_field() {
  let dir = tempfile::tempdir().unwrap();
  let repo = FileMetadataRepository::new(dir.path());
  for failed in [false, true] {
    let m = sample_metadata(failed);
    let run_id = repo.save(&m).unwrap();
    assert_eq!(run_id, m.run_id().to_string());
    let loaded = repo.load(&run_id).unwrap();
    assert_eq!(loaded, m);
  }
}

#[test]
fn save_creates_missing_directories_and_names_file_by_run_id() {
  let dir = tempfile::tempdir().unwrap();
  let root = dir.path().join("nested").join("pipelines");
  let repo = FileMetadataRepository::new(&root);
  let m = sample_metadata(false);
  let run_id = repo.save(&m).unwrap();
  let path = root.join(format!("{run_id}.json"));
  assert!(path.exists());
  assert_eq!(repo.path_for(&run_id), path);
  let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
  assert_eq!(raw["run_id"], json!(run_id));
  assert_eq!(raw["pipeline_name"], "bank_transaction_analysis");
  assert_eq!(raw["steps"][0]["name"], "AppendFilesStep");
  assert_eq!(raw["steps"][0]["input_rows"], 0);
  assert_eq!(raw["steps"][0]["output_rows"], 3);
}

#[test]
fn repeated_save_overwrites() {
  let dir = tempfile::tempdir().unwrap();
  let repo = FileMetadataRepository::new(dir.path());
  let m = sample_metadata(false);
  repo.save(&m).unwrap();
  repo.save(&m).unwrap();
  assert_eq!(repo.list_runs().unwrap().len(), 1);
  assert_eq!(repo.load(&m.run_id().to_string()).unwrap(), m);
}

#[test]
fn list_runs_enumerates_saved_records_sorted() {
  let dir = tempfile::tempdir().unwrap();
  let repo = FileMetadataRepository::new(dir.path());
  assert!(repo.list_runs().unwrap().is_empty());
  let mut ids: Vec<String> = (0..3)
    .map(|_| repo.save(&sample_metadata(false)).unwrap())
    .collect();
  std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
  ids.sort();
  assert_eq!(repo.list_runs().unwrap(), ids);
}

#[test]
fn list_runs_on_missing_root_is_empty() {
  let dir = tempfile::tempdir().unwrap();
  let repo = FileMetadataRepository::new(dir.path().join("never-created"));
  assert!(repo.list_runs().unwrap().is_empty());
}

#[test]
fn load_unknown_run_is_not_found() {
  let dir = tempfile::tempdir().unwrap();
  let repo = FileMetadataRepository::new(dir.path());
  let missing = uuid::Uuid::new_v4().to_string();
  assert!(matches!(repo.load(&missing), Err(RepositoryError::NotFound(id)) if id == missing));
  assert!(matches!(
    repo.load("../../etc/passwd"),
    Err(RepositoryError::NotFound(_))
  ));
}

#[test]
fn load_corrupt_record_is_serialization_error() {
  let dir = tempfile::tempdir().unwrap();
  let repo = FileMetadataRepository::new(dir.path());
  let id = uuid::Uuid::new_v4().to_string();
  std::fs::write(repo.path_for(&id), "{not json").unwrap();
  assert!(matches!(
    repo.load(&id),
    Err(RepositoryError::Serialization { .. })
  ));
}

#[test]
fn default_root_ends_with_metadata_pipelines() {
  let root = default_storage_root();
  assert!(root.ends_with(".metadata/pipelines"));
}

#[test]
fn in_memory_repository_roundtrip_and_not_found() {
  let repo = InMemoryMetadataRepository::new();
  let m = sample_metadata(true);
  let id = repo.save(&m).unwrap();
  assert_eq!(repo.load(&id).unwrap(), m);
  assert_eq!(repo.list_runs().unwrap(), vec![id]);
  assert!(matches!(
    repo.load("nope"),
    Err(RepositoryError::NotFound(_))
  ));
}
