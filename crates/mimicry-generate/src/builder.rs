use mimicry_config::{
    ConfigNode, Configuration, FieldConfig, has_local_link, resolve_link_target,
};
use mimicry_core::{join_path, resolve_linked_path, resolve_seed_path};
use rand::RngCore;
use serde_json::{Map, Value};

use crate::generators::FieldGenerator;
use crate::model::{ItemDiagnostics, MISSING_LINK_TO, UNRESOLVED_LINK};

/// Builds one item from a validated configuration in three passes.
///
/// 1. Skeleton: the output shape, with structured arrays pre-sized.
/// 2. Population: every non-link field from its seed value.
/// 3. Linking: every link field copied from the item as it stood after
///    population.
///
/// Link targets are never links themselves, so the third pass needs no
/// ordering between links.
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationBuilder<'a> {
    fields: FieldGenerator<'a>,
}

/// Where link targets are looked up while walking one scope.
#[derive(Clone, Copy)]
struct LinkScope<'s> {
    /// The whole configuration; link targets resolve to paths from its root.
    declared: &'s Configuration,
    /// Post-population value of the innermost scope holding a local link.
    context: &'s Value,
    context_path: &'s str,
    /// Post-population value of the document or of the enclosing array item.
    root: &'s Value,
    /// Configuration path of the enclosing array, empty for the document.
    root_path: &'s str,
}

impl LinkScope<'_> {
    fn array_path(&self) -> Option<&str> {
        (!self.root_path.is_empty()).then_some(self.root_path)
    }
}

/// The part of `path` below `base`, when `path` lies strictly under it.
fn relative_to<'p>(base: &str, path: &'p str) -> Option<&'p str> {
    if base.is_empty() {
        return Some(path);
    }
    path.strip_prefix(base)?.strip_prefix('.')
}

impl<'a> ConfigurationBuilder<'a> {
    pub fn new(fields: FieldGenerator<'a>) -> Self {
        Self { fields }
    }

    pub fn build(
        &self,
        configuration: &Configuration,
        seed: Option<&Value>,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) -> Value {
        let mut result = self.skeleton(configuration);
        self.populate(configuration, &mut result, seed, "", "", rng, diagnostics);

        let populated = Value::Object(result.clone());
        let scope = LinkScope {
            declared: configuration,
            context: &populated,
            context_path: "",
            root: &populated,
            root_path: "",
        };
        self.link(
            configuration,
            &mut result,
            &populated,
            scope,
            "",
            rng,
            diagnostics,
        );
        Value::Object(result)
    }

    fn skeleton(&self, configuration: &Configuration) -> Map<String, Value> {
        configuration
            .iter()
            .map(|(name, node)| {
                let value = match node {
                    ConfigNode::Group(group) => Value::Object(self.skeleton(group)),
                    ConfigNode::Field(field) => match &field.item_structure {
                        Some(structure) => Value::Array(
                            (0..self.array_count(field))
                                .map(|_| Value::Object(self.skeleton(structure)))
                                .collect(),
                        ),
                        // Simple arrays are sized while populating.
                        None => Value::Null,
                    },
                };
                (name.clone(), value)
            })
            .collect()
    }

    fn populate(
        &self,
        configuration: &Configuration,
        target: &mut Map<String, Value>,
        seed: Option<&Value>,
        seed_prefix: &str,
        path: &str,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) {
        for (name, node) in configuration.iter() {
            let field_path = join_path(path, name);
            let seed_path = join_path(seed_prefix, name);
            match node {
                ConfigNode::Group(group) => {
                    if let Some(Value::Object(child)) = target.get_mut(name) {
                        self.populate(
                            group,
                            child,
                            seed,
                            &seed_path,
                            &field_path,
                            rng,
                            diagnostics,
                        );
                    }
                }
                ConfigNode::Field(field) if field.is_link() => {}
                ConfigNode::Field(field) => {
                    let field_seed = resolve_seed_path(seed, &seed_path);
                    match &field.item_structure {
                        Some(structure) => {
                            let Some(Value::Array(items)) = target.get_mut(name) else {
                                continue;
                            };
                            let seed_items = field_seed
                                .and_then(Value::as_array)
                                .filter(|items| !items.is_empty());
                            for (index, item) in items.iter_mut().enumerate() {
                                let Value::Object(item) = item else {
                                    continue;
                                };
                                let item_seed =
                                    seed_items.map(|seeds| &seeds[index % seeds.len()]);
                                self.populate(
                                    structure,
                                    item,
                                    item_seed,
                                    "",
                                    &field_path,
                                    rng,
                                    diagnostics,
                                );
                            }
                        }
                        None => {
                            let value = self.fields.generate(
                                field,
                                field_seed,
                                &field_path,
                                rng,
                                diagnostics,
                            );
                            target.insert(name.clone(), value);
                        }
                    }
                }
            }
        }
    }

    /// `populated` is the post-population value of the scope `target` is
    /// being rewritten from.
    fn link(
        &self,
        configuration: &Configuration,
        target: &mut Map<String, Value>,
        populated: &Value,
        scope: LinkScope<'_>,
        path: &str,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) {
        for (name, node) in configuration.iter() {
            let field_path = join_path(path, name);
            let populated_child = populated.get(name).unwrap_or(&Value::Null);
            match node {
                ConfigNode::Group(group) => {
                    let Some(Value::Object(child)) = target.get_mut(name) else {
                        continue;
                    };
                    let child_scope = if has_local_link(
                        scope.declared,
                        &field_path,
                        scope.array_path(),
                    ) {
                        LinkScope {
                            context: populated_child,
                            context_path: &field_path,
                            ..scope
                        }
                    } else {
                        scope
                    };
                    self.link(
                        group,
                        child,
                        populated_child,
                        child_scope,
                        &field_path,
                        rng,
                        diagnostics,
                    );
                }
                ConfigNode::Field(field) if field.is_link() => {
                    let value = self.resolve_link(field, scope, &field_path, rng, diagnostics);
                    target.insert(name.clone(), value);
                }
                ConfigNode::Field(field) => {
                    let Some(structure) = &field.item_structure else {
                        continue;
                    };
                    let Some(Value::Array(items)) = target.get_mut(name) else {
                        continue;
                    };
                    for (index, item) in items.iter_mut().enumerate() {
                        let Value::Object(item) = item else {
                            continue;
                        };
                        let populated_item = populated_child.get(index).unwrap_or(&Value::Null);
                        let item_scope = LinkScope {
                            declared: scope.declared,
                            context: populated_item,
                            context_path: &field_path,
                            root: populated_item,
                            root_path: &field_path,
                        };
                        self.link(
                            structure,
                            item,
                            populated_item,
                            item_scope,
                            &field_path,
                            rng,
                            diagnostics,
                        );
                    }
                }
            }
        }
    }

    fn resolve_link(
        &self,
        field: &FieldConfig,
        scope: LinkScope<'_>,
        path: &str,
        rng: &mut dyn RngCore,
        diagnostics: &mut ItemDiagnostics,
    ) -> Value {
        let Some(link_to) = field.link_to.as_deref() else {
            diagnostics.record(MISSING_LINK_TO, path, "link field has no LinkTo; randomizing");
            return self
                .fields
                .generate(&field.randomized(), None, path, rng, diagnostics);
        };

        let target = resolve_link_target(scope.declared, path, link_to, scope.array_path());
        let resolved = relative_to(scope.context_path, &target)
            .and_then(|relative| resolve_linked_path(scope.context, relative))
            .or_else(|| {
                relative_to(scope.root_path, &target)
                    .and_then(|relative| resolve_linked_path(scope.root, relative))
            });
        match resolved {
            Some(value) => value.clone(),
            None => {
                diagnostics.record(
                    UNRESOLVED_LINK,
                    path,
                    format!("link target '{link_to}' has no value; randomizing"),
                );
                self.fields
                    .generate(&field.randomized(), None, path, rng, diagnostics)
            }
        }
    }

    fn array_count(&self, field: &FieldConfig) -> usize {
        field.array_count.unwrap_or(self.fields.default_array_count)
    }
}
