//! Built-in named workflows.
//!
//! - `bank_transaction_analysis`: load statements, clean, merge trained
//!   annotations, score quality, save the annotated file.
//! - `minimal_load`: load statements and save them unchanged.
//! - `quality_report`: score an already annotated file.

use std::sync::Arc;

use tracing::info;

use crate::config::WorkflowSettings;
use crate::error::ConfigurationError;
use crate::pipeline::Pipeline;
use crate::quality::{CalculatorRegistry, LogQualityReporter, QualityConfig};
use crate::steps::{
  AppendFilesStep, CleanDataStep, MergeAnnotationsStep, QualityAnalysisStep, SaveFileStep,
};
use crate::types::RunContext;

pub const BANK_TRANSACTION_ANALYSIS: &str = "bank_transaction_analysis";
pub const MINIMAL_LOAD: &str = "minimal_load";
pub const QUALITY_REPORT: &str = "quality_report";

/// Names accepted by [build_workflow].
pub const WORKFLOW_NAMES: [&str; 3] = [BANK_TRANSACTION_ANALYSIS, MINIMAL_LOAD, QUALITY_REPORT];

/// An assembled pipeline together with the context its runs start from.
#[derive(Debug)]
pub struct Workflow {
  pub pipeline: Pipeline,
  pub context: RunContext,
}

/// Assembles the workflow called `name`. The quality calculator is built here,
/// so invalid quality configuration fails before anything runs.
pub fn build_workflow(
  name: &str,
  settings: &WorkflowSettings,
  quality: &QualityConfig,
  registry: &CalculatorRegistry,
) -> Result<Workflow, ConfigurationError> {
  let statements = || {
    AppendFilesStep::from_dir(
      settings.resolve(&settings.statements_dir),
      settings.statement_extension.clone(),
    )
  };
  let quality_step = || -> Result<QualityAnalysisStep, ConfigurationError> {
    Ok(QualityAnalysisStep::new(registry.build(quality)?).with_reporter(Arc::new(LogQualityReporter)))
  };

  let (pipeline, context) = match name {
    BANK_TRANSACTION_ANALYSIS => (
      Pipeline::new(name)
        .with_step(statements())
        .with_step(CleanDataStep::default())
        .with_step(MergeAnnotationsStep::new(
          settings.resolve(&settings.annotations_file),
          settings.key_columns.clone(),
        )
        .with_columns(quality.columns.clone()))
        .with_step(quality_step()?)
        .with_step(SaveFileStep::new(settings.resolve(&settings.annotated_output)).save_empty(false)),
      settings.context.clone(),
    ),
    MINIMAL_LOAD => (
      Pipeline::new(name)
        .with_step(statements())
        .with_step(SaveFileStep::new(settings.resolve(&settings.raw_output)).save_empty(false)),
      RunContext::new(),
    ),
    QUALITY_REPORT => (
      Pipeline::new(name)
        .with_step(AppendFilesStep::from_files(vec![
          settings.resolve(&settings.annotated_output),
        ]))
        .with_step(quality_step()?),
      RunContext::new(),
    ),
    other => return Err(ConfigurationError::UnknownWorkflow(other.to_string())),
  };
  info!(workflow = name, steps = ?pipeline.step_names(), "workflow assembled");
  Ok(Workflow { pipeline, context })
}
