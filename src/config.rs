//! Runtime configuration resolved once at startup.
//!
//! Precedence for every setting: environment variable, then CLI flag, then the
//! documented default.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::debug;

use crate::error::ConfigurationError;
use crate::quality::QualityConfig;
use crate::repository::{FileMetadataRepository, default_storage_root};
use crate::types::RunContext;

/// Overrides the metadata storage root.
pub const METADATA_DIR_ENV: &str = "ANALYZER_METADATA_DIR";
/// Overrides the data root the built-in workflows read from and write to.
pub const DATA_DIR_ENV: &str = "ANALYZER_DATA_DIR";

pub const DEFAULT_WORKFLOW: &str = "bank_transaction_analysis";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub workflow: Option<String>,
  pub log_level: Option<String>,
  pub metadata_dir: Option<PathBuf>,
  pub data_dir: Option<PathBuf>,
  pub quality_config: Option<PathBuf>,
}

/// Fully resolved configuration of one process.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
  pub workflow: String,
  pub log_level: String,
  pub metadata_dir: PathBuf,
  pub data_dir: PathBuf,
  pub quality: QualityConfig,
}

impl AnalyzerConfig {
  /// Resolves against the process environment.
  pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigurationError> {
    Self::resolve(overrides, |key| std::env::var(key).ok())
  }

  /// Resolves with `env` as the environment lookup. Empty variables are ignored.
  pub fn resolve(
    overrides: ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
  ) -> Result<Self, ConfigurationError> {
    let env_path = |key: &str| env(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
    let metadata_dir = env_path(METADATA_DIR_ENV)
      .or(overrides.metadata_dir)
      .unwrap_or_else(default_storage_root);
    let data_dir = env_path(DATA_DIR_ENV)
      .or(overrides.data_dir)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let quality = match &overrides.quality_config {
      Some(path) => QualityConfig::from_file(path)?,
      None => QualityConfig::default(),
    };
    let config = Self {
      workflow: overrides
        .workflow
        .unwrap_or_else(|| DEFAULT_WORKFLOW.to_string()),
      log_level: overrides
        .log_level
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
      metadata_dir,
      data_dir,
      quality,
    };
    debug!(?config, "configuration resolved");
    Ok(config)
  }

  pub fn repository(&self) -> FileMetadataRepository {
    FileMetadataRepository::new(&self.metadata_dir)
  }

  pub fn workflow_settings(&self) -> WorkflowSettings {
    WorkflowSettings::new(&self.data_dir)
  }
}

/// File locations and shared context used by the built-in workflows. Relative
/// locations are resolved against `data_root`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
  pub data_root: PathBuf,
  pub statements_dir: PathBuf,
  pub statement_extension: String,
  pub annotations_file: PathBuf,
  pub key_columns: Vec<String>,
  pub annotated_output: PathBuf,
  pub raw_output: PathBuf,
  /// Initial run context.
  pub context: RunContext,
}

impl Default for WorkflowSettings {
  fn default() -> Self {
    Self::new(DEFAULT_DATA_DIR)
  }
}

impl WorkflowSettings {
  pub fn new(data_root: impl AsRef<Path>) -> Self {
    let mut context = RunContext::new();
    context.insert(
      "categories".to_string(),
      json!("context/candidate_categories.json"),
    );
    context.insert(
      "typecode".to_string(),
      json!("context/transaction_type_codes.json"),
    );
    Self {
      data_root: data_root.as_ref().to_path_buf(),
      statements_dir: PathBuf::from("extratos").join("bank_bos"),
      statement_extension: "csv".to_string(),
      annotations_file: PathBuf::from("training").join("factoids.csv"),
      key_columns: vec!["TransactionNumber".to_string()],
      annotated_output: PathBuf::from("output").join("annotated_bos.csv"),
      raw_output: PathBuf::from("output").join("raw_bos.csv"),
      context,
    }
  }

  /// `path` under the data root (absolute paths are kept as they are).
  pub fn resolve(&self, path: &Path) -> PathBuf {
    self.data_root.join(path)
  }
}
