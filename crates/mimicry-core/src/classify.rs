use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::pattern::ScalarFormat;

const INT_SPREAD: i64 = 100;
const LONG_SPREAD: i64 = 1000;

struct StringRules {
    datetime: Regex,
    guid: Regex,
    numeric: Regex,
    kebab: Regex,
    dotted: Regex,
}

static RULES: LazyLock<StringRules> = LazyLock::new(|| StringRules {
    datetime: Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}")
        .expect("static datetime regex"),
    guid: Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .expect("static guid regex"),
    numeric: Regex::new(r"^[0-9]+$").expect("static numeric regex"),
    kebab: Regex::new(r"^[A-Za-z]+(?:-[A-Za-z]+)+$").expect("static kebab regex"),
    dotted: Regex::new(r"^[A-Za-z]+\.[A-Za-z]").expect("static dotted regex"),
});

/// Classify one scalar sample value into a format tag.
///
/// String rules are tried in order: datetime prefix, GUID, all digits,
/// kebab-case, dotted prefix, then plain text. Containers and nulls are
/// reported as [`ScalarFormat::Complex`].
pub fn classify(value: &Value) -> ScalarFormat {
    match value {
        Value::String(text) => classify_str(text),
        Value::Number(number) => classify_number(number),
        Value::Bool(_) => ScalarFormat::Bool,
        Value::Null | Value::Array(_) | Value::Object(_) => ScalarFormat::Complex,
    }
}

fn classify_str(text: &str) -> ScalarFormat {
    let rules = &*RULES;
    if rules.datetime.is_match(text) {
        ScalarFormat::Datetime
    } else if rules.guid.is_match(text) {
        ScalarFormat::Guid
    } else if rules.numeric.is_match(text) {
        ScalarFormat::StringNumeric
    } else if rules.kebab.is_match(text) {
        ScalarFormat::StringKebab
    } else if rules.dotted.is_match(text) {
        ScalarFormat::StringDotted
    } else {
        ScalarFormat::StringText {
            length: text.chars().count(),
        }
    }
}

fn classify_number(number: &Number) -> ScalarFormat {
    if let Some(value) = number.as_i64() {
        if i32::try_from(value).is_ok() {
            return ScalarFormat::Int {
                min: value - INT_SPREAD,
                max: value + INT_SPREAD,
            };
        }
        return long_format(value);
    }
    if let Some(value) = number.as_u64() {
        return long_format(i64::try_from(value).unwrap_or(i64::MAX));
    }
    ScalarFormat::Double
}

fn long_format(value: i64) -> ScalarFormat {
    ScalarFormat::Long {
        min: value.saturating_sub(LONG_SPREAD),
        max: value.saturating_add(LONG_SPREAD),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn classifies_strings_in_rule_order() {
        let cases = [
            ("2023-10-01T12:00:00Z", ScalarFormat::Datetime),
            ("2023-10-01T12:00:00.123+02:00", ScalarFormat::Datetime),
            (
                "3f2504e0-4f89-11d3-9a0c-0305e82c3301",
                ScalarFormat::Guid,
            ),
            ("0042", ScalarFormat::StringNumeric),
            ("order-line-item", ScalarFormat::StringKebab),
            ("com.example", ScalarFormat::StringDotted),
            ("com.example.service", ScalarFormat::StringDotted),
            ("single-", ScalarFormat::StringText { length: 7 }),
            ("John Doe", ScalarFormat::StringText { length: 8 }),
            ("", ScalarFormat::StringText { length: 0 }),
        ];

        for (input, expected) in cases {
            assert_eq!(classify(&json!(input)), expected, "input {input:?}");
        }
    }

    #[test]
    fn datetimes_require_ascii_digits() {
        assert_eq!(
            classify(&json!("٢٠٢٣-١٠-٠١T١٢:٠٠:٠٠")),
            ScalarFormat::StringText { length: 19 }
        );
    }

    #[test]
    fn text_length_counts_characters() {
        assert_eq!(
            classify(&json!("ação")),
            ScalarFormat::StringText { length: 4 }
        );
    }

    #[test]
    fn classifies_numbers_by_width() {
        assert_eq!(
            classify(&json!(30)),
            ScalarFormat::Int { min: -70, max: 130 }
        );
        assert_eq!(
            classify(&json!(5_000_000_000_i64)),
            ScalarFormat::Long {
                min: 4_999_999_000,
                max: 5_000_001_000
            }
        );
        assert_eq!(
            classify(&json!(u64::MAX)),
            ScalarFormat::Long {
                min: i64::MAX - 1000,
                max: i64::MAX
            }
        );
        assert_eq!(classify(&json!(1.5)), ScalarFormat::Double);
        assert_eq!(classify(&json!(true)), ScalarFormat::Bool);
    }

    #[test]
    fn containers_are_complex() {
        assert_eq!(classify(&json!({"a": 1})), ScalarFormat::Complex);
        assert_eq!(classify(&json!([1])), ScalarFormat::Complex);
        assert_eq!(classify(&Value::Null), ScalarFormat::Complex);
    }
}
