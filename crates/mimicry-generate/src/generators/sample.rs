use chrono::{DateTime, Utc};
use mimicry_core::{ARRAY_WILDCARD, Pattern, ScalarFormat, ScalarPattern, join_path};
use rand::{Rng, RngCore};
use serde_json::{Map, Value};

use crate::anonymize::{Anonymizer, ShapeAnonymizer};
use crate::generators::{
    DEPTH_EXCEEDED_SENTINEL, float_value, format_datetime, placeholder_text, random_bool,
    random_datetime, random_double, random_dotted, random_guid, random_int, random_kebab,
    random_numeric_string, random_word,
};
use crate::model::{ItemDiagnostics, MAX_DEPTH_EXCEEDED};

/// Generates new values shaped like an inferred pattern tree.
#[derive(Debug, Clone, Copy)]
pub struct SampleGenerator<'a> {
    pub max_depth: usize,
    pub max_array_items: usize,
    /// Scramble free text instead of drawing vocabulary words.
    pub anonymize: bool,
    pub reference_time: DateTime<Utc>,
    pub anonymizer: Option<&'a dyn Anonymizer>,
}

impl SampleGenerator<'_> {
    /// Generate one value for `pattern` found at `path` and `depth`.
    ///
    /// Object and array children that are containers recurse one level
    /// deeper; scalar children are produced at the current depth.
    pub fn generate(
        &self,
        pattern: &Pattern,
        path: &str,
        depth: usize,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) -> Value {
        if depth > self.max_depth {
            diagnostics.record(
                MAX_DEPTH_EXCEEDED,
                path,
                format!("depth {depth} exceeds max depth {}", self.max_depth),
            );
            return Value::String(DEPTH_EXCEEDED_SENTINEL.to_string());
        }

        match pattern {
            Pattern::Null => Value::Null,
            Pattern::Scalar(scalar) => self.scalar(scalar, rng),
            Pattern::Object { properties } => {
                let mut object = Map::with_capacity(properties.len());
                for (name, child) in properties {
                    let child_path = join_path(path, name);
                    let value = self.child(child, &child_path, depth, rng, diagnostics);
                    object.insert(name.clone(), value);
                }
                Value::Object(object)
            }
            Pattern::Array {
                item_count,
                item_patterns,
                ..
            } => {
                if *item_count == 0 {
                    return Value::Array(Vec::new());
                }
                let length = rng.random_range(1..=self.max_array_items.max(1));
                let element_path = join_path(path, ARRAY_WILDCARD);
                let fallback = Pattern::fallback();
                let items = (0..length)
                    .map(|index| {
                        let item = if item_patterns.is_empty() {
                            &fallback
                        } else {
                            &item_patterns[index % item_patterns.len()]
                        };
                        self.child(item, &element_path, depth, rng, diagnostics)
                    })
                    .collect();
                Value::Array(items)
            }
        }
    }

    fn child(
        &self,
        pattern: &Pattern,
        path: &str,
        depth: usize,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) -> Value {
        let depth = if pattern.is_container() { depth + 1 } else { depth };
        self.generate(pattern, path, depth, rng, diagnostics)
    }

    fn scalar(&self, scalar: &ScalarPattern, rng: &mut dyn RngCore) -> Value {
        if scalar.preserve_field
            && let Some(original) = &scalar.original_value
        {
            return original.clone();
        }

        match &scalar.format {
            ScalarFormat::Datetime => {
                Value::String(format_datetime(random_datetime(self.reference_time, rng)))
            }
            ScalarFormat::Guid => Value::String(random_guid(rng)),
            ScalarFormat::StringNumeric => Value::String(random_numeric_string(rng)),
            ScalarFormat::StringKebab => Value::String(random_kebab(rng)),
            ScalarFormat::StringDotted => Value::String(random_dotted(rng)),
            ScalarFormat::StringText { length } => match self.anonymizer {
                Some(anonymizer) if self.anonymize => {
                    Value::String(anonymizer.scramble_text(&placeholder_text(*length), rng))
                }
                _ => Value::String(random_word(rng)),
            },
            ScalarFormat::Int { min, max } => Value::from(random_int(*min, *max, rng)),
            ScalarFormat::Long { min, max } => Value::from(random_int(*min, *max, rng)),
            ScalarFormat::Double => float_value(random_double(rng)),
            ScalarFormat::Bool => Value::Bool(random_bool(rng)),
            ScalarFormat::Complex => Value::Null,
        }
    }
}

/// Generate one value from a pattern tree with the bundled anonymizer and
/// the current time as datetime anchor.
///
/// Lets callers infer a pattern once and reuse it across calls.
pub fn generate_from_pattern(
    pattern: &Pattern,
    max_depth: usize,
    max_array_items: usize,
    anonymize: bool,
    rng: &mut dyn RngCore,
) -> Value {
    let generator = SampleGenerator {
        max_depth,
        max_array_items,
        anonymize,
        reference_time: Utc::now(),
        anonymizer: Some(&ShapeAnonymizer),
    };
    let mut diagnostics = ItemDiagnostics::new();
    generator.generate(pattern, "", 0, rng, &mut diagnostics)
}

