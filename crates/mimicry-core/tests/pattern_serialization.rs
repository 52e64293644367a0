use indexmap::IndexMap;
use mimicry_core::{Pattern, ScalarFormat, ScalarPattern};
use serde_json::json;

#[test]
fn serializes_pattern_tree_with_kind_tags() {
    let mut properties = IndexMap::new();
    properties.insert(
        "age".to_string(),
        Pattern::scalar(ScalarFormat::Int { min: -70, max: 130 }),
    );
    properties.insert(
        "id".to_string(),
        Pattern::Scalar(ScalarPattern::preserved(ScalarFormat::Guid, json!("abc"))),
    );
    properties.insert(
        "tags".to_string(),
        Pattern::Array {
            item_count: 0,
            sample_size: 0,
            item_patterns: Vec::new(),
        },
    );
    let pattern = Pattern::Object { properties };

    let value = serde_json::to_value(&pattern).expect("serialize pattern");
    let expected = json!({
        "kind": "object",
        "properties": {
            "age": {
                "kind": "scalar",
                "format": {"int": {"min": -70, "max": 130}},
                "preserve_field": false
            },
            "id": {
                "kind": "scalar",
                "format": "guid",
                "preserve_field": true,
                "original_value": "abc"
            },
            "tags": {
                "kind": "array",
                "item_count": 0,
                "sample_size": 0,
                "item_patterns": []
            }
        }
    });
    assert_eq!(value, expected);

    let restored: Pattern = serde_json::from_value(value).expect("deserialize pattern");
    assert_eq!(restored, pattern);
    assert_eq!(restored.depth(), 2);
}
