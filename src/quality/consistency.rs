//! Consistency: rows with similar descriptions should share one categorization.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::calculator::{QualityDimension, QualityDimensionCalculator};
use super::columns::AnnotationColumns;
use crate::types::{Dataset, cell_text};

/// Default number of normalized characters used as the grouping key.
pub const DEFAULT_PREFIX_LEN: usize = 10;

static NON_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z]+").expect("literal pattern"));

/// Lowercases, replaces every run of non-letters with one space, trims and
/// keeps the first `prefix_len` characters.
pub fn normalize_description(description: &str, prefix_len: usize) -> String {
  let lowered = description.to_lowercase();
  let letters = NON_LETTERS.replace_all(&lowered, " ");
  letters
    .trim()
    .chars()
    .take(prefix_len)
    .collect::<String>()
    .trim_end()
    .to_string()
}

/// Groups rows by normalized description prefix. Each group with at least two
/// rows is consistent when all its rows carry the same (category, subcategory)
/// pair. Score = consistent groups / eligible groups.
///
/// Rows without a usable description, category or subcategory are skipped. When no group has two rows
/// (including the empty dataset) the score is `0.0`.
#[derive(Debug, Clone)]
pub struct DescriptionPrefixConsistencyCalculator {
  columns: AnnotationColumns,
  prefix_len: usize,
}

impl Default for DescriptionPrefixConsistencyCalculator {
  fn default() -> Self {
    Self::new(AnnotationColumns::default(), DEFAULT_PREFIX_LEN)
  }
}

impl DescriptionPrefixConsistencyCalculator {
  pub const NAME: &'static str = "description_prefix";

  /// A `prefix_len` of zero is treated as one.
  pub fn new(columns: AnnotationColumns, prefix_len: usize) -> Self {
    Self {
      columns,
      prefix_len: prefix_len.max(1),
    }
  }

  pub fn prefix_len(&self) -> usize {
    self.prefix_len
  }
}

type Labels = (String, String);

impl QualityDimensionCalculator for DescriptionPrefixConsistencyCalculator {
  fn dimension(&self) -> QualityDimension {
    QualityDimension::Consistency
  }

  fn name(&self) -> &str {
    Self::NAME
  }

  fn calculate(&self, dataset: &Dataset) -> f64 {
    let c = &self.columns;
    let mut groups: HashMap<String, Vec<Labels>> = HashMap::new();
    for row in dataset.rows() {
      let Some(description) = cell_text(row, &c.description) else {
        continue;
      };
      let (Some(category), Some(subcategory)) =
        (cell_text(row, &c.category), cell_text(row, &c.subcategory))
      else {
        continue;
      };
      let key = normalize_description(&description, self.prefix_len);
      if key.is_empty() {
        continue;
      }
      groups.entry(key).or_default().push((category, subcategory));
    }
    let (eligible, consistent) = groups
      .values()
      .filter(|labels| labels.len() >= 2)
      .fold((0usize, 0usize), |(eligible, consistent), labels| {
        let uniform = labels.iter().all(|l| *l == labels[0]);
        (eligible + 1, consistent + usize::from(uniform))
      });
    if eligible == 0 {
      0.0
    } else {
      consistent as f64 / eligible as f64
    }
  }
}
