use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::Configuration;

/// Emit the JSON Schema for configuration documents.
pub fn configuration_json_schema() -> RootSchema {
    schema_for!(Configuration)
}
