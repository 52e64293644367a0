use glob::Pattern;

/// Decide whether the field at `path` is exempt from mutation.
///
/// Rules are glob patterns (`*` matches any run, `?` a single character)
/// tried in order; the first hit wins. A rule that is not a valid glob is
/// compared to the path literally instead.
pub fn should_preserve<S: AsRef<str>>(path: &str, rules: &[S]) -> bool {
    rules.iter().any(|rule| matches_rule(path, rule.as_ref()))
}

/// Match a single preservation rule against a dotted path.
pub fn matches_rule(path: &str, rule: &str) -> bool {
    match Pattern::new(rule) {
        Ok(pattern) => pattern.matches(path),
        Err(_) => path == rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table() {
        let cases: &[(&str, &str, bool)] = &[
            ("name", "name", true),
            ("name", "nam", false),
            ("user.email", "user.*", true),
            ("user.address.city", "user.*", true),
            ("items.*", "items.*", true),
            ("items.*.sku", "*.sku", true),
            ("id", "i?", true),
            ("uid", "i?", false),
            ("user.id", "*id", true),
            ("user.a", "user.[ab]", true),
            ("user.c", "user.[ab]", false),
            // Malformed globs fall back to literal comparison.
            ("items[0", "items[0", true),
            ("items[1", "items[0", false),
            ("a**b", "a**b", true),
            ("axxb", "a**b", false),
        ];

        for (path, rule, expected) in cases {
            assert_eq!(
                matches_rule(path, rule),
                *expected,
                "path {path:?} rule {rule:?}"
            );
        }
    }

    #[test]
    fn empty_rule_list_preserves_nothing() {
        let rules: [&str; 0] = [];
        assert!(!should_preserve("name", &rules));
    }

    #[test]
    fn first_matching_rule_wins_after_malformed_ones() {
        let rules = vec!["[broken".to_string(), "user.*".to_string()];
        assert!(should_preserve("user.email", &rules));
        assert!(should_preserve("[broken", &rules));
        assert!(!should_preserve("account.email", &rules));
    }
}
