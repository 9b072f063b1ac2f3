//! Step that loads CSV files and appends them to the dataset.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::dataset_io::read_csv;
use crate::pipeline::Step;
use crate::types::{Dataset, RunContext, StepOutcome};

/// Where [AppendFilesStep] finds its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
  /// Every file in `dir` whose extension matches `extension` (case-insensitive).
  Directory { dir: PathBuf, extension: String },
  /// An explicit list of files.
  Files(Vec<PathBuf>),
}

/// Reads every input file as CSV, newest file name first, and appends the rows
/// to the incoming dataset.
///
/// Unreadable files are skipped with a warning. The step fails when there are
/// no input files or none of them can be read. Reports `input_files` (files
/// read, in read order) and `skipped_files`.
#[derive(Debug, Clone)]
pub struct AppendFilesStep {
  source: FileSource,
}

impl AppendFilesStep {
  pub const NAME: &'static str = "AppendFilesStep";

  pub fn from_dir(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
    Self {
      source: FileSource::Directory {
        dir: dir.into(),
        extension: extension.into().trim_start_matches('.').to_string(),
      },
    }
  }

  pub fn from_files(files: Vec<PathBuf>) -> Self {
    Self {
      source: FileSource::Files(files),
    }
  }

  pub fn source(&self) -> &FileSource {
    &self.source
  }

  fn candidate_files(&self) -> Result<Vec<PathBuf>, String> {
    let mut files = match &self.source {
      FileSource::Files(files) => files.clone(),
      FileSource::Directory { dir, extension } => list_dir(dir, extension)?,
    };
    files.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    Ok(files)
  }
}

fn list_dir(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, String> {
  let entries =
    std::fs::read_dir(dir).map_err(|e| format!("cannot list {}: {e}", dir.display()))?;
  Ok(
    entries
      .filter_map(|entry| entry.ok().map(|e| e.path()))
      .filter(|path| path.is_file())
      .filter(|path| {
        path
          .extension()
          .and_then(|e| e.to_str())
          .is_some_and(|e| e.eq_ignore_ascii_case(extension))
      })
      .collect(),
  )
}

impl Step for AppendFilesStep {
  fn name(&self) -> &str {
    Self::NAME
  }

  #[instrument(level = "trace", skip(self, dataset, _context))]
  fn execute(&self, mut dataset: Dataset, _context: &mut RunContext) -> StepOutcome {
    let files = match self.candidate_files() {
      Ok(files) => files,
      Err(message) => return StepOutcome::failure(dataset, message),
    };
    if files.is_empty() {
      return StepOutcome::failure(dataset, format!("no input files found in {:?}", self.source));
    }

    let mut read = Vec::new();
    let mut skipped = 0usize;
    for path in &files {
      debug!(path = %path.display(), "reading input file");
      match read_csv(path) {
        Ok(loaded) => {
          dataset.append(loaded);
          read.push(Value::String(path.display().to_string()));
        }
        Err(e) => {
          warn!(path = %path.display(), error = %e, "skipping unreadable input file");
          skipped += 1;
        }
      }
    }
    if read.is_empty() {
      return StepOutcome::failure(dataset, "no readable input files");
    }
    info!(files = read.len(), rows = dataset.row_count(), "input files appended");
    StepOutcome::success(dataset)
      .with_metadata("input_files", read)
      .with_metadata("skipped_files", skipped)
  }
}
