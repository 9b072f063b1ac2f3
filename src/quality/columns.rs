//! Names of the annotation columns the quality calculators read.

use serde::{Deserialize, Serialize};

/// Column holding a row's category annotation.
pub const CATEGORY_COLUMN: &str = "CategoryAnnotation";
/// Column holding a row's subcategory annotation.
pub const SUBCATEGORY_COLUMN: &str = "SubCategoryAnnotation";
/// Column holding the categorization confidence in `[0, 1]`.
pub const CONFIDENCE_COLUMN: &str = "Confidence";
/// Column holding the free-text transaction description.
pub const DESCRIPTION_COLUMN: &str = "TransactionDescription";

/// Column mapping shared by every dimension calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationColumns {
  pub category: String,
  pub subcategory: String,
  pub confidence: String,
  pub description: String,
}

impl Default for AnnotationColumns {
  fn default() -> Self {
    Self {
      category: CATEGORY_COLUMN.to_string(),
      subcategory: SUBCATEGORY_COLUMN.to_string(),
      confidence: CONFIDENCE_COLUMN.to_string(),
      description: DESCRIPTION_COLUMN.to_string(),
    }
  }
}
