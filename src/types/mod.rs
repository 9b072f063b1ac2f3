//! Data carried through a pipeline run: the dataset, step outcomes and run metadata.

use serde_json::Value;
use std::collections::BTreeMap;

mod dataset;
mod pipeline_metadata;
#[cfg(test)]
mod pipeline_metadata_test;
mod quality_metrics;
mod step_metadata;
mod step_outcome;
#[cfg(test)]
mod step_outcome_test;

pub use dataset::{Dataset, Row, cell_number, cell_present, cell_text};
pub use pipeline_metadata::PipelineMetadata;
pub use quality_metrics::QualityMetrics;
pub use step_metadata::StepMetadata;
pub use step_outcome::{
  QUALITY_CALCULATOR_KEY, QUALITY_INDEX_KEY, QUALITY_METRICS_KEY, RESERVED_KEYS, RESULT_FAILED,
  RESULT_INVALID_METADATA, RESULT_OK, StepError, StepMetadataMap, StepOutcome,
};

/// Key-value context shared read/write by every step of one run.
pub type RunContext = BTreeMap<String, Value>;
