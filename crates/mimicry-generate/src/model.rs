use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::GenerationError;

/// Depth bound reached during sample-driven generation.
pub const MAX_DEPTH_EXCEEDED: &str = "max_depth_exceeded";
/// Link field declared without a `LinkTo` target.
pub const MISSING_LINK_TO: &str = "missing_link_to";
/// Link target absent from the generated item.
pub const UNRESOLVED_LINK: &str = "unresolved_link";
/// Field `Type` that no generator understands.
pub const UNKNOWN_FIELD_TYPE: &str = "unknown_field_type";

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Run seed; a random one is drawn when unset.
    pub seed: Option<u64>,
    /// Recursion bound for inference and sample-driven generation.
    pub max_depth: usize,
    /// Upper bound for the length of regenerated sample arrays.
    pub max_array_items: usize,
    /// Scramble free text in the sample-driven pipeline.
    pub anonymize: bool,
    /// Glob rules naming sample fields that are echoed verbatim.
    pub preserve_rules: Vec<String>,
    /// Array length used when a field has no `ArrayCount`.
    pub default_array_count: usize,
    /// Build items on the rayon pool.
    pub parallel: bool,
    /// Anchor for generated datetimes; the wall clock when unset.
    pub reference_time: Option<DateTime<Utc>>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            max_depth: mimicry_core::DEFAULT_MAX_DEPTH,
            max_array_items: 5,
            anonymize: false,
            preserve_rules: Vec::new(),
            default_array_count: 3,
            parallel: false,
            reference_time: None,
        }
    }
}

impl GenerateOptions {
    /// Load options from TOML text; absent keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, GenerationError> {
        let options: GenerateOptions = toml::from_str(contents)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.max_depth == 0 {
            return Err(GenerationError::InvalidOptions(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_array_items == 0 {
            return Err(GenerationError::InvalidOptions(
                "max_array_items must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Structured generation issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    pub path: Option<String>,
}

impl GenerationIssue {
    pub fn warning(code: &str, path: &str, message: impl Into<String>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.to_string(),
            message: message.into(),
            path: (!path.is_empty()).then(|| path.to_string()),
        }
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_seed: u64,
    pub items_requested: usize,
    pub items_generated: usize,
    pub duration_ms: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(run_seed: u64, items_requested: usize) -> Self {
        Self {
            run_seed,
            items_requested,
            items_generated: 0,
            duration_ms: 0,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }

    /// Number of warnings recorded under `code`.
    pub fn warning_count(&self, code: &str) -> u64 {
        self.warnings_by_code.get(code).copied().unwrap_or(0)
    }
}

/// Issues collected while building a single item.
///
/// Each item owns its diagnostics so items can be built on separate threads;
/// the engine merges them into the report in item order.
#[derive(Debug, Default)]
pub struct ItemDiagnostics {
    issues: Vec<GenerationIssue>,
}

impl ItemDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, code: &str, path: &str, message: impl Into<String>) {
        let issue = GenerationIssue::warning(code, path, message);
        warn!(code = %issue.code, path = %path, message = %issue.message, "generation anomaly");
        self.issues.push(issue);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<GenerationIssue> {
        self.issues
    }
}
