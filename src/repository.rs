//! Persistence of [PipelineMetadata] records keyed by run id.
//!
//! - [FileMetadataRepository]: one pretty-printed JSON file per run, `<root>/<run_id>.json`.
//! - [InMemoryMetadataRepository]: process-local store for tests and dry runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::types::PipelineMetadata;

/// File extension of persisted run records.
pub const METADATA_EXTENSION: &str = "json";

/// Stores and retrieves pipeline run records.
pub trait MetadataRepository: Send + Sync {
  /// Persists `metadata` under its run id and returns that id. Saving the same
  /// run again overwrites the previous record.
  fn save(&self, metadata: &PipelineMetadata) -> Result<String, RepositoryError>;

  /// Loads a run record; [RepositoryError::NotFound] if the id is unknown.
  fn load(&self, run_id: &str) -> Result<PipelineMetadata, RepositoryError>;

  /// Ids of all persisted runs, sorted.
  fn list_runs(&self) -> Result<Vec<String>, RepositoryError>;
}

/// Default storage root: `$HOME/.metadata/pipelines`, or `.metadata/pipelines`
/// under the working directory when `HOME` is unset.
pub fn default_storage_root() -> PathBuf {
  std::env::var_os("HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from("."))
    .join(".metadata")
    .join("pipelines")
}

/// JSON-file repository rooted at a directory fixed at construction.
#[derive(Debug, Clone)]
pub struct FileMetadataRepository {
  root: PathBuf,
}

impl FileMetadataRepository {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    info!(root = %root.display(), "metadata repository");
    Self { root }
  }

  /// Repository at [default_storage_root].
  pub fn with_default_location() -> Self {
    Self::new(default_storage_root())
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// File that holds (or would hold) the record for `run_id`.
  pub fn path_for(&self, run_id: &str) -> PathBuf {
    self.root.join(format!("{run_id}.{METADATA_EXTENSION}"))
  }
}

/// Run ids are UUIDs; anything else cannot name a stored record (and must not
/// be joined onto the storage root).
fn parse_run_id(run_id: &str) -> Result<Uuid, RepositoryError> {
  Uuid::parse_str(run_id).map_err(|_| RepositoryError::NotFound(run_id.to_string()))
}

impl MetadataRepository for FileMetadataRepository {
  #[instrument(level = "trace", skip(self, metadata), fields(run_id = %metadata.run_id()))]
  fn save(&self, metadata: &PipelineMetadata) -> Result<String, RepositoryError> {
    let run_id = metadata.run_id().to_string();
    let path = self.path_for(&run_id);
    let json = serde_json::to_string_pretty(metadata).map_err(|source| {
      RepositoryError::Serialization {
        path: path.clone(),
        source,
      }
    })?;
    std::fs::create_dir_all(&self.root).map_err(|source| RepositoryError::Io {
      path: self.root.clone(),
      source,
    })?;
    // Write-then-rename: readers never observe a partially written record.
    let tmp = self.root.join(format!(".{run_id}.{METADATA_EXTENSION}.tmp"));
    std::fs::write(&tmp, json).map_err(|source| RepositoryError::Io {
      path: tmp.clone(),
      source,
    })?;
    std::fs::rename(&tmp, &path).map_err(|source| RepositoryError::Io {
      path: path.clone(),
      source,
    })?;
    info!(run_id = %run_id, path = %path.display(), "pipeline metadata saved");
    Ok(run_id)
  }

  #[instrument(level = "trace", skip(self))]
  fn load(&self, run_id: &str) -> Result<PipelineMetadata, RepositoryError> {
    let id = parse_run_id(run_id)?;
    let path = self.path_for(&id.to_string());
    let bytes = match std::fs::read(&path) {
      Ok(b) => b,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        return Err(RepositoryError::NotFound(run_id.to_string()));
      }
      Err(source) => return Err(RepositoryError::Io { path, source }),
    };
    serde_json::from_slice(&bytes).map_err(|source| RepositoryError::Serialization { path, source })
  }

  #[instrument(level = "trace", skip(self))]
  fn list_runs(&self) -> Result<Vec<String>, RepositoryError> {
    let entries = match std::fs::read_dir(&self.root) {
      Ok(entries) => entries,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(source) => {
        return Err(RepositoryError::Io {
          path: self.root.clone(),
          source,
        });
      }
    };
    let mut runs = Vec::new();
    for entry in entries {
      let entry = entry.map_err(|source| RepositoryError::Io {
        path: self.root.clone(),
        source,
      })?;
      let path = entry.path();
      if path.extension().and_then(|e| e.to_str()) != Some(METADATA_EXTENSION) {
        continue;
      }
      if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
        && Uuid::parse_str(stem).is_ok()
      {
        runs.push(stem.to_string());
      }
    }
    runs.sort();
    Ok(runs)
  }
}

/// In-process repository. Records are stored as their JSON encoding so a load
/// goes through the same decoding path as the file repository.
#[derive(Debug, Default)]
pub struct InMemoryMetadataRepository {
  records: Mutex<BTreeMap<String, String>>,
}

impl InMemoryMetadataRepository {
  pub fn new() -> Self {
    Self::default()
  }

  fn records(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
    // Poisoning cannot leave the map half-updated.
    self.records.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl MetadataRepository for InMemoryMetadataRepository {
  fn save(&self, metadata: &PipelineMetadata) -> Result<String, RepositoryError> {
    let run_id = metadata.run_id().to_string();
    let json = serde_json::to_string(metadata).map_err(|source| RepositoryError::Serialization {
      path: PathBuf::from(&run_id),
      source,
    })?;
    self.records().insert(run_id.clone(), json);
    Ok(run_id)
  }

  fn load(&self, run_id: &str) -> Result<PipelineMetadata, RepositoryError> {
    let json = self
      .records()
      .get(run_id)
      .cloned()
      .ok_or_else(|| RepositoryError::NotFound(run_id.to_string()))?;
    serde_json::from_str(&json).map_err(|source| RepositoryError::Serialization {
      path: PathBuf::from(run_id),
      source,
    })
  }

  fn list_runs(&self) -> Result<Vec<String>, RepositoryError> {
    Ok(self.records().keys().cloned().collect())
  }
}
