//! Pipeline steps shipped with the crate.
//!
//! - [AppendFilesStep]: load CSV files into the dataset.
//! - [CleanDataStep]: apply cleaning functions.
//! - [MergeAnnotationsStep]: merge trained annotations by key.
//! - [QualityAnalysisStep]: score categorization quality.
//! - [SaveFileStep]: write the dataset as CSV.

pub mod append_files;
pub mod clean_data;
pub mod merge_annotations;
#[cfg(test)]
mod merge_annotations_test;
pub mod quality_analysis;
pub mod save_file;

pub use append_files::{AppendFilesStep, FileSource};
pub use clean_data::{CleanDataStep, Cleaner, drop_blank_rows, trim_cells};
pub use merge_annotations::MergeAnnotationsStep;
pub use quality_analysis::QualityAnalysisStep;
pub use save_file::SaveFileStep;
