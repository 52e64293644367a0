use serde_json::Value;

use crate::ARRAY_WILDCARD;

/// Look up a dotted path in a seed tree.
///
/// Empty and `*` segments are skipped. A null root, a missing key, a null
/// value or a non-object intermediate all resolve to `None`. Sequences at
/// the end of the path are returned as they are.
pub fn resolve_seed_path<'a>(seed: Option<&'a Value>, path: &str) -> Option<&'a Value> {
    seed.and_then(|root| walk(root, path))
}

/// Look up a dotted path in an in-progress result tree.
///
/// Uses the same traversal as [`resolve_seed_path`]; a missing key and a
/// legitimate null are both reported as `None`.
pub fn resolve_linked_path<'a>(result: &'a Value, path: &str) -> Option<&'a Value> {
    walk(result, path)
}

fn walk<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments(path) {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.')
        .filter(|segment| !segment.is_empty() && *segment != ARRAY_WILDCARD)
}

/// Append a segment to a dotted path; an empty prefix yields the segment.
pub fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

/// Path of the enclosing node, or `None` for a top-level path.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(parent, _)| parent)
}

/// Number of dots in the path; top-level fields sit at depth 0.
pub fn path_depth(path: &str) -> usize {
    path.matches('.').count()
}

/// True when `ancestor` names a node strictly above `path`.
pub fn is_strict_ancestor(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'.'
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn seed_lookup_traverses_objects() {
        let seed = json!({"user": {"address": {"city": "Lisbon"}}, "tags": ["a"]});
        assert_eq!(
            resolve_seed_path(Some(&seed), "user.address.city"),
            Some(&json!("Lisbon"))
        );
        assert_eq!(
            resolve_seed_path(Some(&seed), "user..address.*.city"),
            Some(&json!("Lisbon"))
        );
        assert_eq!(resolve_seed_path(Some(&seed), "tags"), Some(&json!(["a"])));
    }

    #[test]
    fn seed_lookup_reports_absence() {
        let seed = json!({"user": {"name": null}, "tags": ["a"], "age": 3});
        assert_eq!(resolve_seed_path(None, "user"), None);
        assert_eq!(resolve_seed_path(Some(&Value::Null), "user"), None);
        assert_eq!(resolve_seed_path(Some(&seed), "user.missing"), None);
        assert_eq!(resolve_seed_path(Some(&seed), "user.name"), None);
        assert_eq!(resolve_seed_path(Some(&seed), "age.value"), None);
        assert_eq!(resolve_seed_path(Some(&seed), "tags.0"), None);
    }

    #[test]
    fn empty_path_returns_root() {
        let result = json!({"id": 1});
        assert_eq!(resolve_linked_path(&result, ""), Some(&result));
    }

    #[test]
    fn path_helpers() {
        assert_eq!(join_path("", "id"), "id");
        assert_eq!(join_path("user", "id"), "user.id");
        assert_eq!(parent_path("user.address.city"), Some("user.address"));
        assert_eq!(parent_path("id"), None);
        assert_eq!(path_depth("id"), 0);
        assert_eq!(path_depth("user.address.city"), 2);
        assert!(is_strict_ancestor("user", "user.address"));
        assert!(!is_strict_ancestor("user", "user"));
        assert!(!is_strict_ancestor("user", "username"));
        assert!(!is_strict_ancestor("user.address", "user"));
    }
}
