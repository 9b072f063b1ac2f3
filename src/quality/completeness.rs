//! Completeness: how many of the required annotation fields each row carries.

use super::calculator::{QualityDimension, QualityDimensionCalculator};
use super::columns::AnnotationColumns;
use crate::types::{Dataset, cell_number, cell_present};

/// Per row, the fraction of category, subcategory and confidence that are
/// present and non-empty; averaged over rows. An empty dataset scores `0.0`.
///
/// A confidence cell counts as present only when it parses as a number.
#[derive(Debug, Clone, Default)]
pub struct RequiredFieldsCompletenessCalculator {
  columns: AnnotationColumns,
}

impl RequiredFieldsCompletenessCalculator {
  pub const NAME: &'static str = "required_fields";

  pub fn new(columns: AnnotationColumns) -> Self {
    Self { columns }
  }
}

impl QualityDimensionCalculator for RequiredFieldsCompletenessCalculator {
  fn dimension(&self) -> QualityDimension {
    QualityDimension::Completeness
  }

  fn name(&self) -> &str {
    Self::NAME
  }

  fn calculate(&self, dataset: &Dataset) -> f64 {
    if dataset.is_empty() {
      return 0.0;
    }
    let c = &self.columns;
    let total: f64 = dataset
      .rows()
      .iter()
      .map(|row| {
        let present = [
          cell_present(row, &c.category),
          cell_present(row, &c.subcategory),
          cell_number(row, &c.confidence).is_some(),
        ]
        .into_iter()
        .filter(|p| *p)
        .count();
        present as f64 / 3.0
      })
      .sum();
    total / dataset.row_count() as f64
  }
}
