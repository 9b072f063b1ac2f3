//! CLI: run a named workflow, or inspect persisted runs.
//!
//! Usage: `run_pipeline [OPTIONS]`
//! Example: run_pipeline --workflow minimal_load --metadata-dir /tmp/runs
//!
//! The run record is saved under the metadata directory as `<run_id>.json`.
//! Set RUST_LOG=statement_analyzer=trace for span-level detail.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use statement_analyzer::quality::CalculatorRegistry;
use statement_analyzer::{
  AnalyzerConfig, ConfigOverrides, Dataset, MetadataRepository, RepositoryError, build_workflow,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run a statement-analysis workflow.
#[derive(Parser, Debug)]
#[command(name = "run_pipeline")]
#[command(
  after_help = r#"Environment variables (override the matching flags when set):
  ANALYZER_METADATA_DIR   Directory run records are saved to (default: $HOME/.metadata/pipelines).
  ANALYZER_DATA_DIR       Data root of the built-in workflows (default: data).
  RUST_LOG                Log filter; takes precedence over --log-level.

Workflows:
  bank_transaction_analysis   load, clean, merge annotations, score quality, save
  minimal_load                load and save unchanged
  quality_report              score data/output/annotated_bos.csv

Examples:
  run_pipeline
  run_pipeline --workflow quality_report --quality-config quality.json
  run_pipeline --list-runs
  run_pipeline --show-run 3f1c0f9e-6a55-4e0e-9a51-2f6d1f0b7c11"#
)]
struct Args {
  /// Workflow to run.
  #[arg(long, value_name = "NAME", default_value = "bank_transaction_analysis")]
  workflow: String,

  /// Log level used when RUST_LOG is not set.
  #[arg(long, value_name = "LEVEL", default_value = "info")]
  log_level: String,

  /// Directory run records are saved to. Overridden by ANALYZER_METADATA_DIR if set.
  #[arg(long, value_name = "DIR")]
  metadata_dir: Option<PathBuf>,

  /// Data root of the built-in workflows. Overridden by ANALYZER_DATA_DIR if set.
  #[arg(long, value_name = "DIR")]
  data_dir: Option<PathBuf>,

  /// JSON file selecting the quality calculator, algorithms and weights.
  #[arg(long, value_name = "FILE")]
  quality_config: Option<PathBuf>,

  /// Print the ids of persisted runs and exit.
  #[arg(long, conflicts_with = "show_run")]
  list_runs: bool,

  /// Print one persisted run record as JSON and exit.
  #[arg(long, value_name = "RUN_ID")]
  show_run: Option<String>,
}

fn main() {
  let args = Args::parse();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
    )
    .with_writer(std::io::stderr)
    .init();

  let overrides = ConfigOverrides {
    workflow: Some(args.workflow.clone()),
    log_level: Some(args.log_level.clone()),
    metadata_dir: args.metadata_dir.clone(),
    data_dir: args.data_dir.clone(),
    quality_config: args.quality_config.clone(),
  };
  let config = match AnalyzerConfig::from_env(overrides) {
    Ok(c) => c,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      process::exit(1);
    }
  };
  info!(
    workflow = %config.workflow,
    metadata_dir = %config.metadata_dir.display(),
    data_dir = %config.data_dir.display(),
    "options (env or flags)"
  );
  let repository = config.repository();

  if args.list_runs {
    match repository.list_runs() {
      Ok(runs) => {
        for run in runs {
          println!("{}", run);
        }
        return;
      }
      Err(e) => {
        eprintln!("Repository error: {}", e);
        process::exit(1);
      }
    }
  }

  if let Some(run_id) = &args.show_run {
    let metadata = match repository.load(run_id) {
      Ok(m) => m,
      Err(RepositoryError::NotFound(id)) => {
        eprintln!("No run with id {}", id);
        process::exit(1);
      }
      Err(e) => {
        eprintln!("Repository error: {}", e);
        process::exit(1);
      }
    };
    match serde_json::to_string_pretty(&metadata) {
      Ok(json) => println!("{}", json),
      Err(e) => {
        eprintln!("Error encoding run {}: {}", run_id, e);
        process::exit(1);
      }
    }
    return;
  }

  let workflow = match build_workflow(
    &config.workflow,
    &config.workflow_settings(),
    &config.quality,
    &CalculatorRegistry::default(),
  ) {
    Ok(w) => w,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      process::exit(1);
    }
  };

  let mut context = workflow.context;
  let report = match workflow
    .pipeline
    .with_repository(std::sync::Arc::new(repository))
    .run(Dataset::default(), &mut context)
  {
    Ok(r) => r,
    Err(e) => {
      eprintln!("Pipeline error: {}", e);
      process::exit(1);
    }
  };

  let m = &report.metadata;
  println!("Pipeline completed.");
  println!("  Workflow: {}", m.pipeline_name());
  println!("  Run id: {}", m.run_id());
  println!("  Result code: {}", m.result_code());
  println!("  Steps: {}", m.steps().len());
  if let Some(index) = m.quality_index() {
    println!("  Quality index: {:.4}", index);
  }
  if let Some(error) = m.error() {
    println!("  Error: {}", error);
  }
  if !m.succeeded() {
    process::exit(1);
  }
}
