use chrono::{DateTime, Utc};
use mimicry_config::{FieldAction, FieldConfig, FieldType};
use mimicry_core::{ARRAY_WILDCARD, join_path};
use rand::RngCore;
use serde_json::Value;

use crate::anonymize::Anonymizer;
use crate::generators::{
    DEFAULT_INT_RANGE, DEFAULT_LONG_RANGE, float_value, format_datetime, parse_datetime,
    random_bool, random_datetime, random_double, random_guid, random_int, random_word,
};
use crate::model::{ItemDiagnostics, UNKNOWN_FIELD_TYPE};

/// Produces the value of one configured field from its optional seed value.
#[derive(Debug, Clone, Copy)]
pub struct FieldGenerator<'a> {
    pub reference_time: DateTime<Utc>,
    /// Length of arrays declared without `ArrayCount`.
    pub default_array_count: usize,
    pub anonymizer: Option<&'a dyn Anonymizer>,
}

impl FieldGenerator<'_> {
    /// Generate the value of `field`.
    ///
    /// `Preserve` echoes a present seed, `Anonymize` reshapes a seed of the
    /// declared type, anything else (or a missing seed) draws a fresh value.
    /// Array fields always yield an explicit sequence.
    pub fn generate(
        &self,
        field: &FieldConfig,
        seed: Option<&Value>,
        path: &str,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) -> Value {
        if field.field_type == FieldType::Array {
            return self.generate_array(field, seed, path, rng, diagnostics);
        }
        self.generate_scalar(&field.field_type, field.action, seed, path, rng, diagnostics)
    }

    fn generate_array(
        &self,
        field: &FieldConfig,
        seed: Option<&Value>,
        path: &str,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) -> Value {
        let item_action = field.item_action.unwrap_or(field.action);
        let preserve =
            field.action == FieldAction::Preserve || item_action == FieldAction::Preserve;
        if preserve && let Some(seed) = seed {
            return match seed {
                Value::Array(items) => Value::Array(items.clone()),
                scalar => Value::Array(vec![scalar.clone()]),
            };
        }

        let count = field.array_count.unwrap_or(self.default_array_count);
        let item_type = field.item_type.clone().unwrap_or_default();
        let seed_items: &[Value] = match seed {
            Some(Value::Array(items)) => items,
            Some(scalar) => std::slice::from_ref(scalar),
            None => &[],
        };
        let element_path = join_path(path, ARRAY_WILDCARD);

        let items = (0..count)
            .map(|index| {
                let item_seed = (!seed_items.is_empty())
                    .then(|| &seed_items[index % seed_items.len()]);
                self.generate_scalar(
                    &item_type,
                    item_action,
                    item_seed,
                    &element_path,
                    rng,
                    diagnostics,
                )
            })
            .collect();
        Value::Array(items)
    }

    fn generate_scalar(
        &self,
        field_type: &FieldType,
        action: FieldAction,
        seed: Option<&Value>,
        path: &str,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) -> Value {
        match (action, seed) {
            (FieldAction::Preserve, Some(seed)) => return seed.clone(),
            (FieldAction::Anonymize, Some(seed)) => {
                if let Some(value) = self.anonymize(field_type, seed, rng) {
                    return value;
                }
            }
            _ => {}
        }
        self.random_scalar(field_type, path, rng, diagnostics)
    }

    /// Reshape a type-matching seed; `None` when the seed does not fit the
    /// type or no anonymizer is installed.
    fn anonymize(
        &self,
        field_type: &FieldType,
        seed: &Value,
        rng: &mut dyn RngCore,
    ) -> Option<Value> {
        match field_type {
            FieldType::Guid => seed.as_str().map(|_| Value::String(random_guid(rng))),
            FieldType::Bool => seed.as_bool().map(|flag| Value::Bool(!flag)),
            FieldType::String => {
                let text = seed.as_str()?;
                let anonymizer = self.anonymizer?;
                Some(Value::String(anonymizer.scramble_text(text, rng)))
            }
            FieldType::Int | FieldType::Long => {
                let number = seed.as_i64()?;
                let anonymizer = self.anonymizer?;
                Some(Value::from(anonymizer.offset_integer(number, rng)))
            }
            FieldType::Double => {
                let number = seed.as_f64()?;
                let anonymizer = self.anonymizer?;
                Some(float_value(anonymizer.offset_float(number, rng)))
            }
            FieldType::Datetime => {
                let value = seed.as_str().and_then(parse_datetime)?;
                let anonymizer = self.anonymizer?;
                Some(Value::String(format_datetime(
                    anonymizer.jitter_datetime(value, rng),
                )))
            }
            FieldType::Array | FieldType::Unknown(_) => None,
        }
    }

    fn random_scalar(
        &self,
        field_type: &FieldType,
        path: &str,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) -> Value {
        match field_type {
            FieldType::String => Value::String(random_word(rng)),
            FieldType::Int => {
                Value::from(random_int(DEFAULT_INT_RANGE.0, DEFAULT_INT_RANGE.1, rng))
            }
            FieldType::Long => {
                Value::from(random_int(DEFAULT_LONG_RANGE.0, DEFAULT_LONG_RANGE.1, rng))
            }
            FieldType::Double => float_value(random_double(rng)),
            FieldType::Bool => Value::Bool(random_bool(rng)),
            FieldType::Datetime => {
                Value::String(format_datetime(random_datetime(self.reference_time, rng)))
            }
            FieldType::Guid => Value::String(random_guid(rng)),
            FieldType::Array => Value::Array(Vec::new()),
            FieldType::Unknown(name) => {
                diagnostics.record(
                    UNKNOWN_FIELD_TYPE,
                    path,
                    format!("unknown field type '{name}'; using an empty string"),
                );
                Value::String(String::new())
            }
        }
    }
}
