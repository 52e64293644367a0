use indexmap::IndexMap;
use mimicry_core::{ARRAY_WILDCARD, Pattern, ScalarPattern, classify, join_path, should_preserve};
use serde_json::Value;

/// Number of leading sequence elements inspected during inference.
pub const ARRAY_SAMPLE_SIZE: usize = 3;

/// Infer a pattern tree from a sample value.
///
/// `path` is the dotted path of `value` within the sample (empty for the
/// root) and is matched against `preserve_rules`. Sequence elements extend
/// the path with `*`, so one rule covers every position. Nodes deeper than
/// `max_depth` collapse to [`Pattern::fallback`].
pub fn infer_pattern<S: AsRef<str>>(
    value: &Value,
    path: &str,
    preserve_rules: &[S],
    depth: usize,
    max_depth: usize,
) -> Pattern {
    if value.is_null() {
        return Pattern::Null;
    }
    if depth > max_depth {
        return Pattern::fallback();
    }

    match value {
        Value::Object(map) => {
            let properties: IndexMap<String, Pattern> = map
                .iter()
                .map(|(name, child)| {
                    let child_path = join_path(path, name);
                    let pattern =
                        infer_pattern(child, &child_path, preserve_rules, depth + 1, max_depth);
                    (name.clone(), pattern)
                })
                .collect();
            Pattern::Object { properties }
        }
        Value::Array(items) => {
            let element_path = join_path(path, ARRAY_WILDCARD);
            let sample_size = items.len().min(ARRAY_SAMPLE_SIZE);
            let item_patterns = items
                .iter()
                .take(sample_size)
                .map(|item| {
                    infer_pattern(item, &element_path, preserve_rules, depth + 1, max_depth)
                })
                .collect();
            Pattern::Array {
                item_count: items.len(),
                sample_size,
                item_patterns,
            }
        }
        scalar => {
            let format = classify(scalar);
            if should_preserve(path, preserve_rules) {
                Pattern::Scalar(ScalarPattern::preserved(format, scalar.clone()))
            } else {
                Pattern::scalar(format)
            }
        }
    }
}
