//! Tests for the workflow registry.

use std::sync::Arc;

use crate::config::WorkflowSettings;
use crate::error::ConfigurationError;
use crate::quality::{CalculatorRegistry, QualityConfig, QualityWeights};
use crate::repository::{InMemoryMetadataRepository, MetadataRepository};
use crate::types::Dataset;
use crate::workflows::{WORKFLOW_NAMES, build_workflow};

fn build(name: &str, settings: &WorkflowSettings) -> Result<crate::workflows::Workflow, ConfigurationError> {
  build_workflow(name, settings, &QualityConfig::default(), &CalculatorRegistry::default())
}

#[test]
fn every_named_workflow_builds() {
  let settings = WorkflowSettings::default();
  for name in WORKFLOW_NAMES {
    let w = build(name, &settings).unwrap();
    assert_eq!(w.pipeline.name(), name);
  }
}

#[test]
fn bank_analysis_step_order() {
  let w = build("bank_transaction_analysis", &WorkflowSettings::default()).unwrap();
  assert_eq!(
    w.pipeline.step_names(),
    vec![
      "AppendFilesStep",
      "CleanDataStep",
      "MergeAnnotationsStep",
      "QualityAnalysisStep",
      "SaveFileStep",
    ]
  );
  assert!(w.context.contains_key("typecode"));
}

#[test]
fn unknown_workflow_is_rejected() {
  assert_eq!(
    build("nightly", &WorkflowSettings::default()).err().map(|e| e.to_string()),
    Some("unknown workflow: nightly".to_string())
  );
}

#[test]
fn invalid_quality_config_fails_at_assembly() {
  let quality = QualityConfig {
    weights: QualityWeights {
      completeness: 0.5,
      confidence: 0.5,
      consistency: 0.5,
    },
    ..QualityConfig::default()
  };
  let result = build_workflow(
    "quality_report",
    &WorkflowSettings::default(),
    &quality,
    &CalculatorRegistry::default(),
  );
  assert!(matches!(result, Err(ConfigurationError::InvalidWeights { .. })));
  assert!(
    build_workflow(
      "minimal_load",
      &WorkflowSettings::default(),
      &quality,
      &CalculatorRegistry::default()
    )
    .is_ok()
  );
}

#[test]
fn bank_analysis_runs_end_to_end() {
  let dir = tempfile::tempdir().unwrap();
  let settings = WorkflowSettings::new(dir.path());
  let statements = dir.path().join("extratos").join("bank_bos");
  std::fs::create_dir_all(&statements).unwrap();
  std::fs::write(
    statements.join("2025-01.csv"),
    "TransactionNumber,TransactionDescription,Amount\n\
     1, TESCO STORES 3121 ,-12.50\n\
     2,TESCO STORES 9981,-40.00\n\
     3,SHELL 0042,-60.10\n",
  )
  .unwrap();
  std::fs::create_dir_all(dir.path().join("training")).unwrap();
  std::fs::write(
    dir.path().join("training").join("factoids.csv"),
    "TransactionNumber,CategoryAnnotation,SubCategoryAnnotation,Confidence\n\
     1,Food,Groceries,0.95\n\
     2,Food,Groceries,0.85\n\
     3,Transport,Fuel,0.60\n",
  )
  .unwrap();

  let repo = Arc::new(InMemoryMetadataRepository::new());
  let w = build("bank_transaction_analysis", &settings).unwrap();
  let mut context = w.context;
  let report = w
    .pipeline
    .with_repository(repo.clone())
    .run(Dataset::default(), &mut context)
    .unwrap();

  let m = &report.metadata;
  assert!(m.succeeded(), "{:?}", m.error());
  assert_eq!(m.steps().len(), 5);
  let confidence = (0.95 + 2.0 * 0.85 + 3.0 * 0.60) / 6.0;
  let expected = 0.3 * 1.0 + 0.5 * confidence + 0.2 * 1.0;
  assert!((m.quality_index().unwrap() - expected).abs() < 1e-12);
  assert_eq!(m.quality_calculator_name(), Some("DefaultQualityCalculator"));
  assert_eq!(m.steps()[2].parameters["merged_rows"], 3);
  let output = dir.path().join("output").join("annotated_bos.csv");
  assert!(output.exists());
  assert_eq!(repo.load(&m.run_id().to_string()).unwrap(), *m);
}
