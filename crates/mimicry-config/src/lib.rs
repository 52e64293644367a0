//! Configuration contracts and link validation for mimicry.
//!
//! A configuration is an explicit schema of per-field actions. This crate
//! models it and rejects illegal cross-field links before generation starts.

pub mod errors;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::ConfigurationError;
pub use model::{ConfigNode, Configuration, FieldAction, FieldConfig, FieldType};
pub use schema::configuration_json_schema;
pub use validate::{
    ValidationSummary, has_local_link, resolve_link_target, validate_configuration,
};
