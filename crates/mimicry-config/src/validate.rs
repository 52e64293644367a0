use indexmap::IndexMap;
use mimicry_core::{is_strict_ancestor, join_path, parent_path, path_depth};

use crate::errors::ConfigurationError;
use crate::model::{ConfigNode, Configuration, FieldConfig};

/// Counts gathered while validating a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Declared nodes, groups and item-structure fields included.
    pub fields: usize,
    /// Link fields that passed every check.
    pub links: usize,
}

#[derive(Debug)]
struct CollectedField<'a> {
    path: String,
    depth: usize,
    /// Path of the array whose item structure declares this field.
    array_scope: Option<String>,
    is_link: bool,
    link_to: Option<&'a str>,
}

/// Reject configurations with illegal links; validation is all-or-nothing.
///
/// Every node is collected once with its path, depth and enclosing array
/// scope. Each link field is then checked: its target must exist, must not
/// be a link itself, must stay inside the same item structure, and outside
/// arrays must be an ancestor, a same-parent sibling or a deeper node that is
/// not its own descendant.
pub fn validate_configuration(
    configuration: &Configuration,
) -> Result<ValidationSummary, ConfigurationError> {
    let mut fields = IndexMap::new();
    collect(configuration, "", None, &mut fields);

    let mut links = 0;
    for field in fields.values() {
        if !field.is_link {
            continue;
        }
        // Links without a target degrade to Randomize at generation time.
        let Some(link_to) = field.link_to else {
            continue;
        };
        check_link(configuration, field, link_to, &fields)?;
        links += 1;
    }

    Ok(ValidationSummary {
        fields: fields.len(),
        links,
    })
}

fn collect<'a>(
    configuration: &'a Configuration,
    prefix: &str,
    array_scope: Option<&str>,
    out: &mut IndexMap<String, CollectedField<'a>>,
) {
    for (name, node) in configuration.iter() {
        let path = join_path(prefix, name);
        let field = match node {
            ConfigNode::Group(_) => None,
            ConfigNode::Field(field) => Some(field),
        };
        out.insert(
            path.clone(),
            CollectedField {
                path: path.clone(),
                depth: path_depth(&path),
                array_scope: array_scope.map(str::to_string),
                is_link: field.is_some_and(FieldConfig::is_link),
                link_to: field.and_then(|field| field.link_to.as_deref()),
            },
        );

        match node {
            ConfigNode::Group(group) => collect(group, &path, array_scope, out),
            ConfigNode::Field(field) => {
                if let Some(structure) = &field.item_structure {
                    collect(structure, &path, Some(&path), out);
                }
            }
        }
    }
}

fn check_link(
    configuration: &Configuration,
    field: &CollectedField<'_>,
    link_to: &str,
    fields: &IndexMap<String, CollectedField<'_>>,
) -> Result<(), ConfigurationError> {
    let resolved = resolve_link_target(
        configuration,
        &field.path,
        link_to,
        field.array_scope.as_deref(),
    );

    let Some(target) = fields.get(&resolved) else {
        return Err(ConfigurationError::MissingTarget {
            field: field.path.clone(),
            target: resolved,
        });
    };

    if target.array_scope != field.array_scope {
        return Err(ConfigurationError::ArrayScope {
            field: field.path.clone(),
            target: resolved,
        });
    }

    if target.is_link {
        return Err(ConfigurationError::ChainedLink {
            field: field.path.clone(),
            target: resolved,
        });
    }

    if field.array_scope.is_some() {
        return Ok(());
    }

    if is_strict_ancestor(&field.path, &target.path) {
        return Err(ConfigurationError::DownwardLink {
            field: field.path.clone(),
            target: resolved,
        });
    }

    check_depth(field, target)
}

/// Resolve a `LinkTo` value to a path from the configuration root.
///
/// Outside item structures the target already is a root path. Inside the
/// item structure of the array at `array_path`, a target prefixed with the
/// array path is kept; otherwise a sibling in the link field's own group
/// wins over a field at the item root. Unknown targets come back unchanged.
pub fn resolve_link_target(
    configuration: &Configuration,
    field_path: &str,
    link_to: &str,
    array_path: Option<&str>,
) -> String {
    let Some(array_path) = array_path else {
        return link_to.to_string();
    };
    if is_strict_ancestor(array_path, link_to) {
        return link_to.to_string();
    }
    if let Some(parent) = parent_path(field_path) {
        let sibling = join_path(parent, link_to);
        if configuration.lookup(&sibling).is_some() {
            return sibling;
        }
    }
    let rooted = join_path(array_path, link_to);
    if configuration.lookup(&rooted).is_some() {
        return rooted;
    }
    link_to.to_string()
}

fn check_depth(
    field: &CollectedField<'_>,
    target: &CollectedField<'_>,
) -> Result<(), ConfigurationError> {
    if is_strict_ancestor(&target.path, &field.path) {
        return Ok(());
    }

    let compatible = if target.depth == field.depth {
        parent_path(&target.path) == parent_path(&field.path)
    } else {
        target.depth > field.depth
    };

    if compatible {
        Ok(())
    } else {
        Err(ConfigurationError::CrossScopeLink {
            field: field.path.clone(),
            target: target.path.clone(),
        })
    }
}

/// True when a link declared below the group at `group_path` targets a
/// node strictly inside that group.
///
/// Targets are compared as resolved root paths, so a nested group reusing
/// a name cannot be mistaken for the target. Item structures below the
/// group are not searched; array items resolve links against themselves.
pub fn has_local_link(
    configuration: &Configuration,
    group_path: &str,
    array_path: Option<&str>,
) -> bool {
    fn visit(
        scope: &Configuration,
        prefix: &str,
        configuration: &Configuration,
        group_path: &str,
        array_path: Option<&str>,
    ) -> bool {
        scope.iter().any(|(name, node)| {
            let path = join_path(prefix, name);
            match node {
                ConfigNode::Group(group) => {
                    visit(group, &path, configuration, group_path, array_path)
                }
                ConfigNode::Field(field) => {
                    field.is_link()
                        && field.link_to.as_deref().is_some_and(|link_to| {
                            let target =
                                resolve_link_target(configuration, &path, link_to, array_path);
                            is_strict_ancestor(group_path, &target)
                        })
                }
            }
        })
    }

    match configuration.lookup(group_path) {
        Some(ConfigNode::Group(group)) => {
            visit(group, group_path, configuration, group_path, array_path)
        }
        _ => false,
    }
}
