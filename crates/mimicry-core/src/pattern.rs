use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::FALLBACK_TEXT_LENGTH;

/// Format tag assigned to a scalar sample value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarFormat {
    /// ISO-8601 datetime string.
    Datetime,
    /// Canonical 8-4-4-4-12 hex GUID string.
    Guid,
    /// Free text; only the length of the sample is kept.
    StringText { length: usize },
    /// String made only of digits.
    StringNumeric,
    /// Two or more alphabetic tokens joined by hyphens.
    StringKebab,
    /// String starting with `alpha.alpha`.
    StringDotted,
    /// 32-bit integer with a half-open generation range.
    Int { min: i64, max: i64 },
    /// 64-bit integer with a half-open generation range.
    Long { min: i64, max: i64 },
    Double,
    Bool,
    /// Opaque value the classifier does not recognize.
    Complex,
}

/// Scalar leaf of a pattern tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarPattern {
    pub format: ScalarFormat,
    /// Whether a preservation rule exempts this leaf from mutation.
    #[serde(default)]
    pub preserve_field: bool,
    /// Sample value echoed verbatim when `preserve_field` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<Value>,
}

impl ScalarPattern {
    pub fn new(format: ScalarFormat) -> Self {
        Self {
            format,
            preserve_field: false,
            original_value: None,
        }
    }

    pub fn preserved(format: ScalarFormat, original: Value) -> Self {
        Self {
            format,
            preserve_field: true,
            original_value: Some(original),
        }
    }
}

/// Inferred shape and format description of a sample value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    Null,
    Scalar(ScalarPattern),
    Object {
        properties: IndexMap<String, Pattern>,
    },
    Array {
        /// Length of the sampled sequence.
        item_count: usize,
        /// Number of leading elements that were inspected.
        sample_size: usize,
        item_patterns: Vec<Pattern>,
    },
}

impl Pattern {
    pub fn scalar(format: ScalarFormat) -> Self {
        Pattern::Scalar(ScalarPattern::new(format))
    }

    /// Leaf used for anything past the depth bound and for unsampled array items.
    pub fn fallback() -> Self {
        Pattern::scalar(ScalarFormat::StringText {
            length: FALLBACK_TEXT_LENGTH,
        })
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Pattern::Object { .. } | Pattern::Array { .. })
    }

    /// Depth of the deepest container in the tree; scalars and nulls count as 0.
    pub fn depth(&self) -> usize {
        match self {
            Pattern::Null | Pattern::Scalar(_) => 0,
            Pattern::Object { properties } => {
                1 + properties.values().map(Pattern::depth).max().unwrap_or(0)
            }
            Pattern::Array { item_patterns, .. } => {
                1 + item_patterns.iter().map(Pattern::depth).max().unwrap_or(0)
            }
        }
    }
}
