//! Categorization quality scoring.
//!
//! Three dimension calculators (completeness, confidence, consistency) feed a
//! [QualityCalculator]. Calculators and weights are configuration: a
//! [QualityConfig] is turned into a calculator by the [CalculatorRegistry] once,
//! when the pipeline is assembled.

pub mod calculator;
pub mod columns;
pub mod completeness;
pub mod confidence;
pub mod consistency;
pub mod registry;
pub mod reporter;
pub mod weights;

pub use calculator::{
  ConfidenceOnlyQualityCalculator, DefaultQualityCalculator, DefaultQualityCalculatorBuilder,
  QualityCalculator, QualityDimension, QualityDimensionCalculator,
};
pub use columns::AnnotationColumns;
pub use completeness::RequiredFieldsCompletenessCalculator;
pub use confidence::{MeanConfidenceCalculator, TieredConfidenceCalculator};
pub use consistency::DescriptionPrefixConsistencyCalculator;
pub use registry::{CalculatorRegistry, QualityConfig};
pub use reporter::{LogQualityReporter, QualityReporter};
pub use weights::QualityWeights;
