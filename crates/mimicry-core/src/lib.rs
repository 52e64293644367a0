//! Core contracts and helpers for mimicry.
//!
//! This crate defines the inferred pattern tree, the scalar value classifier,
//! dotted-path resolution over heterogeneous trees and preservation rules
//! shared by the configuration validator and the generation engine.

pub mod classify;
pub mod path;
pub mod pattern;
pub mod preserve;

pub use classify::classify;
pub use path::{
    is_strict_ancestor, join_path, parent_path, path_depth, resolve_linked_path,
    resolve_seed_path,
};
pub use pattern::{Pattern, ScalarFormat, ScalarPattern};
pub use preserve::{matches_rule, should_preserve};

/// Default recursion bound for inference and sample-driven generation.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Length of the text leaf that replaces anything past the depth bound.
pub const FALLBACK_TEXT_LENGTH: usize = 10;

/// Path segment standing for "every element" of a sequence.
pub const ARRAY_WILDCARD: &str = "*";
