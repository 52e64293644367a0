use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info, warn};

use mimicry_config::{Configuration, validate_configuration};

use crate::anonymize::{Anonymizer, ShapeAnonymizer};
use crate::builder::ConfigurationBuilder;
use crate::errors::GenerationError;
use crate::generators::{FieldGenerator, SampleGenerator};
use crate::inference::infer_pattern;
use crate::model::{GenerateOptions, GenerationReport, ItemDiagnostics};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// The item itself when exactly one was requested, otherwise an array.
    pub output: Value,
    pub report: GenerationReport,
}

/// Entry point for generating synthetic data from samples or configurations.
#[derive(Debug)]
pub struct GenerationEngine {
    options: GenerateOptions,
    anonymizer: Option<Box<dyn Anonymizer>>,
    reference_time: DateTime<Utc>,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        let reference_time = options.reference_time.unwrap_or_else(Utc::now);
        Self {
            options,
            anonymizer: Some(Box::new(ShapeAnonymizer)),
            reference_time,
        }
    }

    /// Replace the scalar anonymizer; `None` makes anonymize requests draw
    /// fresh vocabulary values instead.
    pub fn with_anonymizer(mut self, anonymizer: Option<Box<dyn Anonymizer>>) -> Self {
        self.anonymizer = anonymizer;
        self
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Infer a pattern from `sample` once and generate `count` values from it.
    pub fn generate_from_sample(
        &self,
        sample: &Value,
        count: usize,
    ) -> Result<GenerationResult, GenerationError> {
        self.options.validate()?;

        let pattern = infer_pattern(
            sample,
            "",
            &self.options.preserve_rules,
            0,
            self.options.max_depth,
        );
        debug!(depth = pattern.depth(), "pattern inferred");

        let generator = SampleGenerator {
            max_depth: self.options.max_depth,
            max_array_items: self.options.max_array_items,
            anonymize: self.options.anonymize,
            reference_time: self.reference_time,
            anonymizer: self.anonymizer.as_deref(),
        };

        Ok(self.build_items(count, "sample", |rng, diagnostics| {
            generator.generate(&pattern, "", 0, rng, diagnostics)
        }))
    }

    /// Validate `configuration` once, then build `count` items from it.
    ///
    /// A configuration with illegal links aborts the call before any item
    /// is built.
    pub fn generate_from_configuration(
        &self,
        configuration: &Configuration,
        seed: Option<&Value>,
        count: usize,
    ) -> Result<GenerationResult, GenerationError> {
        self.options.validate()?;

        let summary = match validate_configuration(configuration) {
            Ok(summary) => summary,
            Err(err) => {
                warn!(error = %err, "configuration rejected");
                return Err(err.into());
            }
        };
        debug!(
            fields = summary.fields,
            links = summary.links,
            "configuration validated"
        );

        let builder = ConfigurationBuilder::new(FieldGenerator {
            reference_time: self.reference_time,
            default_array_count: self.options.default_array_count,
            anonymizer: self.anonymizer.as_deref(),
        });

        Ok(self.build_items(count, "configuration", |rng, diagnostics| {
            builder.build(configuration, seed, rng, diagnostics)
        }))
    }

    fn build_items<F>(&self, count: usize, source: &str, build: F) -> GenerationResult
    where
        F: Fn(&mut dyn RngCore, &mut ItemDiagnostics) -> Value + Sync,
    {
        let start = Instant::now();
        let run_seed = self.options.seed.unwrap_or_else(|| rand::rng().random());

        info!(
            run_seed,
            items = count,
            source,
            parallel = self.options.parallel,
            "generation started"
        );

        let build_item = |index: usize| {
            let mut rng = ChaCha8Rng::seed_from_u64(hash_item_seed(run_seed, index as u64));
            let mut diagnostics = ItemDiagnostics::new();
            let value = build(&mut rng, &mut diagnostics);
            debug!(item = index, clean = diagnostics.is_empty(), "item generated");
            (value, diagnostics)
        };

        let items: Vec<(Value, ItemDiagnostics)> = if self.options.parallel {
            (0..count).into_par_iter().map(build_item).collect()
        } else {
            (0..count).map(build_item).collect()
        };

        let mut report = GenerationReport::new(run_seed, count);
        let mut values = Vec::with_capacity(items.len());
        for (value, diagnostics) in items {
            for issue in diagnostics.into_issues() {
                report.record_warning(issue);
            }
            values.push(value);
        }
        report.items_generated = values.len();
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            run_seed,
            items = report.items_generated,
            warnings = report.warnings.len(),
            duration_ms = report.duration_ms,
            "generation completed"
        );

        let output = if count == 1 {
            values.into_iter().next().unwrap_or(Value::Null)
        } else {
            Value::Array(values)
        };
        GenerationResult { output, report }
    }
}

/// Derive the seed of one item; items are independent of build order.
fn hash_item_seed(run_seed: u64, item_index: u64) -> u64 {
    let mut hash = run_seed ^ item_index.wrapping_add(1).wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= hash >> 31;
    hash.wrapping_mul(0x100000001b3)
}

/// Generate `count` values shaped like `sample`.
///
/// Fields whose dotted path matches one of `preserve_rules` are copied from
/// the sample verbatim. A single value is returned for `count == 1`, an
/// array otherwise.
pub fn generate_from_sample<S: AsRef<str>>(
    sample: &Value,
    count: usize,
    max_array_items: usize,
    anonymize: bool,
    preserve_rules: &[S],
) -> Result<Value, GenerationError> {
    let options = GenerateOptions {
        max_array_items,
        anonymize,
        preserve_rules: preserve_rules
            .iter()
            .map(|rule| rule.as_ref().to_string())
            .collect(),
        ..GenerateOptions::default()
    };
    let result = GenerationEngine::new(options).generate_from_sample(sample, count)?;
    Ok(result.output)
}

/// Build `count` items from `configuration`, drawing seed values from `seed`.
pub fn generate_from_configuration(
    configuration: &Configuration,
    seed: Option<&Value>,
    count: usize,
) -> Result<Value, GenerationError> {
    let result = GenerationEngine::new(GenerateOptions::default())
        .generate_from_configuration(configuration, seed, count)?;
    Ok(result.output)
}
