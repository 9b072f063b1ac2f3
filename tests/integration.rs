//! Library-level integration tests: assembled workflows run against a data
//! tree in a temp dir, with run records saved to a file repository.

use std::path::Path;
use std::sync::Arc;

use statement_analyzer::quality::{CalculatorRegistry, QualityConfig};
use statement_analyzer::{
  Dataset, FileMetadataRepository, MetadataRepository, WorkflowSettings, build_workflow,
};

fn write(path: &Path, contents: &str) {
  std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
  std::fs::write(path, contents).expect("write");
}

fn seed(root: &Path) {
  write(
    &root.join("extratos/bank_bos/2025-02.csv"),
    "TransactionNumber,TransactionDescription,Amount\n\
     3,NETFLIX.COM 44,-9.99\n\
     4,NETFLIX.COM 45,-9.99\n",
  );
  write(
    &root.join("extratos/bank_bos/2025-01.csv"),
    "TransactionNumber,TransactionDescription,Amount\n\
     1,TESCO STORES 3121,-12.50\n\
     2,TESCO STORES 9981,-40.00\n\
     ,,\n",
  );
  write(
    &root.join("training/factoids.csv"),
    "TransactionNumber,CategoryAnnotation,SubCategoryAnnotation,Confidence\n\
     1,Food,Groceries,0.95\n\
     2,Food,Groceries,0.85\n\
     3,Entertainment,Streaming,0.60\n\
     4,Bills,Subscriptions,0.75\n",
  );
}

#[test]
fn analysis_then_quality_report_agree() {
  let dir = tempfile::tempdir().expect("temp dir");
  seed(dir.path());
  let settings = WorkflowSettings::new(dir.path());
  let repo = Arc::new(FileMetadataRepository::new(dir.path().join("meta")));
  let registry = CalculatorRegistry::default();
  let quality = QualityConfig::default();

  let analysis = build_workflow("bank_transaction_analysis", &settings, &quality, &registry)
    .expect("build analysis");
  let mut context = analysis.context;
  let first = analysis
    .pipeline
    .with_repository(repo.clone())
    .run(Dataset::default(), &mut context)
    .expect("run analysis");
  let m = &first.metadata;
  assert!(m.succeeded(), "{:?}", m.error());
  // blank CSV row dropped by the cleaner
  assert_eq!(m.steps()[0].output_rows, 5);
  assert_eq!(m.steps()[1].output_rows, 4);
  assert_eq!(m.output_rows(), Some(4));
  // NETFLIX group disagrees, TESCO group agrees
  let metrics = m.quality_metrics().expect("metrics");
  assert_eq!(metrics.completeness, 1.0);
  assert_eq!(metrics.consistency, 0.5);

  let report = build_workflow("quality_report", &settings, &quality, &registry).expect("build report");
  let mut context = report.context;
  let second = report
    .pipeline
    .with_repository(repo.clone())
    .run(Dataset::default(), &mut context)
    .expect("run report");
  let again = second.metadata.quality_metrics().expect("metrics");
  assert_eq!(again.completeness, metrics.completeness);
  assert_eq!(again.consistency, metrics.consistency);
  assert!((again.confidence - metrics.confidence).abs() < 1e-12);

  let mut runs = repo.list_runs().expect("list");
  runs.sort();
  let mut expected = vec![m.run_id().to_string(), second.metadata.run_id().to_string()];
  expected.sort();
  assert_eq!(runs, expected);
  assert_eq!(&repo.load(&m.run_id().to_string()).expect("load"), m);
}

#[test]
fn missing_annotations_fail_fast_before_saving_output() {
  let dir = tempfile::tempdir().expect("temp dir");
  seed(dir.path());
  std::fs::remove_file(dir.path().join("training/factoids.csv")).expect("rm");
  let settings = WorkflowSettings::new(dir.path());
  let repo = Arc::new(FileMetadataRepository::new(dir.path().join("meta")));
  let w = build_workflow(
    "bank_transaction_analysis",
    &settings,
    &QualityConfig::default(),
    &CalculatorRegistry::default(),
  )
  .expect("build");
  let mut context = w.context;
  let run = w
    .pipeline
    .with_repository(repo.clone())
    .run(Dataset::default(), &mut context)
    .expect("run");
  let m = &run.metadata;
  assert_eq!(m.result_code(), -1);
  assert_eq!(m.steps().len(), 3);
  assert_eq!(m.failed_step().map(|s| s.name.as_str()), Some("MergeAnnotationsStep"));
  assert!(m.quality_index().is_none());
  assert!(!dir.path().join("output/annotated_bos.csv").exists());
  assert_eq!(&repo.load(&m.run_id().to_string()).expect("load"), m);
}
