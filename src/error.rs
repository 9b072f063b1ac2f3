//! Error types for configuration, metadata persistence, dataset I/O and pipeline runs.
//!
//! Step failures are not errors: a step that fails returns a
//! [StepOutcome](crate::types::StepOutcome) with a negative result code and the
//! pipeline halts on it. The types here cover faults the caller must handle.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid calculator/weight/workflow configuration. Raised at assembly time,
/// before any run starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
  #[error("quality weights must sum to 1.0, got {sum}")]
  InvalidWeights { sum: f64 },

  #[error("weight for {dimension} must be a finite value in [0, 1], got {value}")]
  InvalidWeight { dimension: String, value: f64 },

  #[error("missing calculator for the {0} dimension")]
  MissingCalculator(String),

  #[error("calculator for the {expected} slot scores {actual}")]
  DimensionMismatch { expected: String, actual: String },

  #[error("unknown calculator: {0}")]
  UnknownCalculator(String),

  #[error("unknown workflow: {0}")]
  UnknownWorkflow(String),

  #[error("invalid configuration file {path}: {reason}")]
  InvalidConfigFile { path: PathBuf, reason: String },
}

/// Failure to persist or retrieve pipeline metadata.
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("no pipeline run with id {0}")]
  NotFound(String),

  #[error("metadata storage error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("metadata encoding error at {path}: {source}")]
  Serialization {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Failure reading or writing a CSV dataset.
#[derive(Debug, Error)]
pub enum DatasetIoError {
  #[error("i/o error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("csv error at {path}: {source}")]
  Csv {
    path: PathBuf,
    #[source]
    source: csv::Error,
  },
}

/// Fault surfaced by [Pipeline::run](crate::pipeline::Pipeline::run).
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error(transparent)]
  Repository(#[from] RepositoryError),
}
