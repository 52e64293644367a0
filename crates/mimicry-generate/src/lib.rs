//! Synthetic data generation engine for mimicry.
//!
//! Two pipelines share the same scalar strategies: sample-driven generation
//! infers a pattern tree from an example value and regenerates values of
//! that shape, while configuration-driven generation builds items from an
//! explicit per-field schema in three passes so links always see concrete
//! targets.

pub mod anonymize;
pub mod builder;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod inference;
pub mod model;

pub use anonymize::{Anonymizer, ShapeAnonymizer};
pub use builder::ConfigurationBuilder;
pub use engine::{
    GenerationEngine, GenerationResult, generate_from_configuration, generate_from_sample,
};
pub use errors::GenerationError;
pub use generators::{FieldGenerator, SampleGenerator, generate_from_pattern};
pub use inference::infer_pattern;
pub use model::{GenerateOptions, GenerationIssue, GenerationReport, ItemDiagnostics};
