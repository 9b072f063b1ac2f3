//! Tests for `MergeAnnotationsStep`.

use serde_json::json;

use crate::pipeline::Step;
use crate::steps::MergeAnnotationsStep;
use crate::types::{Dataset, Row, RunContext};

fn row(number: &str, category: Option<&str>, confidence: Option<&str>) -> Row {
  let mut r = Row::new();
  r.insert("TransactionNumber".to_string(), json!(number));
  r.insert(
    "CategoryAnnotation".to_string(),
    category.map_or(json!(null), |c| json!(c)),
  );
  r.insert("SubCategoryAnnotation".to_string(), json!(null));
  r.insert(
    "Confidence".to_string(),
    confidence.map_or(json!(null), |c| json!(c)),
  );
  r
}

fn trained_file(dir: &std::path::Path) -> std::path::PathBuf {
  let path = dir.join("factoids.csv");
  std::fs::write(
    &path,
    "TransactionNumber,CategoryAnnotation,SubCategoryAnnotation,Confidence\n\
     1,Food,Groceries,0.9\n\
     2,Travel,Fuel,0.5\n\
     3,Bills,Energy,0.8\n\
     3,Other,Other,0.99\n",
  )
  .unwrap();
  path
}

#[test]
fn merge_rules_follow_blank_and_confidence() {
  let dir = tempfile::tempdir().unwrap();
  let d = Dataset::from_rows(vec![
    row("1", None, None),
    row("2", Some("Shopping"), Some("0.7")),
    row("3", Some("Bills"), Some("0.6")),
    row("4", Some("Kept"), Some("0.1")),
  ]);
  let outcome = MergeAnnotationsStep::new(trained_file(dir.path()), vec![])
    .execute(d, &mut RunContext::new());
  assert!(outcome.succeeded());
  let rows = outcome.dataset().rows();

  // blank current: replaced
  assert_eq!(rows[0]["CategoryAnnotation"], json!("Food"));
  assert_eq!(rows[0]["SubCategoryAnnotation"], json!("Groceries"));
  assert_eq!(rows[0]["Confidence"], json!("0.9"));

  // current more confident: category kept, blank subcategory filled
  assert_eq!(rows[1]["CategoryAnnotation"], json!("Shopping"));
  assert_eq!(rows[1]["SubCategoryAnnotation"], json!("Fuel"));
  assert_eq!(rows[1]["Confidence"], json!("0.7"));

  // duplicate keys: first trained row wins
  assert_eq!(rows[2]["SubCategoryAnnotation"], json!("Energy"));
  assert_eq!(rows[2]["Confidence"], json!("0.8"));

  // no match
  assert_eq!(rows[3]["CategoryAnnotation"], json!("Kept"));

  assert_eq!(outcome.metadata()["merged_rows"], json!(3));
  assert_eq!(outcome.dataset().row_count(), 4);
}

#[test]
fn missing_annotation_file_fails() {
  let dir = tempfile::tempdir().unwrap();
  let outcome = MergeAnnotationsStep::new(dir.path().join("missing.csv"), vec![])
    .execute(Dataset::from_rows(vec![row("1", None, None)]), &mut RunContext::new());
  assert!(!outcome.succeeded());
  assert_eq!(outcome.dataset().row_count(), 1);
}

#[test]
fn annotation_columns_are_added_when_absent() {
  let dir = tempfile::tempdir().unwrap();
  let mut bare = Row::new();
  bare.insert("TransactionNumber".to_string(), json!("1"));
  let outcome = MergeAnnotationsStep::new(trained_file(dir.path()), vec!["TransactionNumber".to_string()])
    .execute(Dataset::from_rows(vec![bare]), &mut RunContext::new());
  let d = outcome.dataset();
  assert!(d.has_column("CategoryAnnotation"));
  assert!(d.has_column("Confidence"));
  assert_eq!(d.rows()[0]["CategoryAnnotation"], json!("Food"));
}
