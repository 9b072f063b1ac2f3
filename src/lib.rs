//! # statement-analyzer
//!
//! Sequential transaction-processing pipeline with per-run metadata and
//! categorization quality scoring.
//!
//! ## Architecture
//!
//! A [Pipeline] runs an ordered list of [Step]s. Each step takes the current
//! [Dataset](types::Dataset) plus a shared [RunContext](types::RunContext) and
//! returns a [StepOutcome](types::StepOutcome). The first failing step halts the
//! run (fail-fast).
//!
//! Every run produces a [PipelineMetadata](types::PipelineMetadata) record built by
//! a [MetadataCollector](collector::MetadataCollector) and saved through a
//! [MetadataRepository](repository::MetadataRepository).
//!
//! Quality scoring lives in [quality]: completeness, confidence and consistency
//! calculators composed by a weighted [QualityCalculator](quality::QualityCalculator).
//! The [QualityAnalysisStep](steps::QualityAnalysisStep) publishes the index, which
//! the pipeline lifts onto the run record.

pub mod collector;
pub mod config;
pub mod dataset_io;
pub mod error;
pub mod pipeline;
pub mod quality;
pub mod repository;
#[cfg(test)]
mod repository_test;
pub mod steps;
pub mod types;
pub mod workflows;
#[cfg(test)]
mod workflows_test;

pub use config::{AnalyzerConfig, ConfigOverrides, WorkflowSettings};
pub use error::{ConfigurationError, DatasetIoError, PipelineError, RepositoryError};
pub use pipeline::{Pipeline, RunReport, Step};
pub use repository::{FileMetadataRepository, InMemoryMetadataRepository, MetadataRepository};
pub use types::{Dataset, PipelineMetadata, QualityMetrics, RunContext, StepMetadata, StepOutcome};
pub use workflows::{Workflow, build_workflow};
