use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use mimicry_core::{Pattern, ScalarFormat};
use mimicry_generate::{
    GenerateOptions, GenerationEngine, GenerationError, generate_from_pattern,
    generate_from_sample, infer_pattern,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use regex::Regex;
use serde_json::{Value, json};

fn load_fixture(name: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let contents =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap()
}

fn seeded(seed: u64) -> GenerateOptions {
    GenerateOptions {
        seed: Some(seed),
        reference_time: Some(reference_time()),
        ..GenerateOptions::default()
    }
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn regenerated_sample_keeps_keys_and_ranges() {
    let sample = json!({"name": "John Doe", "age": 30, "items": ["item1", "item2"]});

    for seed in 0..20 {
        let result = GenerationEngine::new(seeded(seed))
            .generate_from_sample(&sample, 1)
            .expect("generate");
        let output = result.output;

        assert_eq!(keys(&output), ["name", "age", "items"]);
        assert!(output["name"].is_string());
        let age = output["age"].as_i64().expect("age is an integer");
        assert!((-70..130).contains(&age), "age {age}");
        let items = output["items"].as_array().expect("items is an array");
        assert!((1..=5).contains(&items.len()));
        assert!(items.iter().all(Value::is_string));
    }
}

#[test]
fn datetime_samples_stay_within_a_year() {
    let sample = json!("2023-10-01T12:00:00Z");
    assert_eq!(
        infer_pattern(&sample, "", &[] as &[&str], 0, 10),
        Pattern::scalar(ScalarFormat::Datetime)
    );

    let format = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").expect("regex");
    let result = GenerationEngine::new(seeded(9))
        .generate_from_sample(&sample, 25)
        .expect("generate");
    for value in result.output.as_array().expect("array of items") {
        let text = value.as_str().expect("string");
        assert!(format.is_match(text), "{text}");
        let parsed = DateTime::parse_from_rfc3339(text).expect("datetime");
        let delta = parsed.with_timezone(&Utc) - reference_time();
        assert!(delta.num_days().abs() <= 365, "{text}");
    }
}

#[test]
fn preserved_fields_are_copied_verbatim() {
    let sample = load_fixture("order.sample.json");
    let mut options = seeded(1);
    options.preserve_rules = vec!["customer.*".to_string(), "lines.*.sku".to_string()];

    let first = GenerationEngine::new(options.clone())
        .generate_from_sample(&sample, 1)
        .expect("first run")
        .output;
    options.seed = Some(2);
    let second = GenerationEngine::new(options)
        .generate_from_sample(&sample, 1)
        .expect("second run")
        .output;

    for output in [&first, &second] {
        assert_eq!(keys(output), keys(&sample));
        assert_eq!(output["customer"], sample["customer"]);
        assert_eq!(output["tags"], json!([]));
        assert_eq!(output["notes"], Value::Null);

        let lines = output["lines"].as_array().expect("lines");
        assert!((1..=5).contains(&lines.len()));
        for (index, line) in lines.iter().enumerate() {
            assert_eq!(keys(line), ["sku", "qty"]);
            assert_eq!(line["sku"], sample["lines"][index % 2]["sku"]);
        }
    }

    assert_ne!(first["id"], second["id"]);
    assert_ne!(first["id"], sample["id"]);
}

#[test]
fn scalar_formats_follow_the_sample() {
    let sample = load_fixture("order.sample.json");
    let output = GenerationEngine::new(seeded(3))
        .generate_from_sample(&sample, 1)
        .expect("generate")
        .output;

    let guid = Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("regex");
    let numeric = Regex::new(r"^\d{7,8}$").expect("regex");
    let kebab = Regex::new(r"^[a-z]+-[a-z]+$").expect("regex");
    let dotted = Regex::new(r"^[a-z]+/[a-z0-9]+$").expect("regex");

    assert!(guid.is_match(output["id"].as_str().expect("id")));
    assert!(numeric.is_match(output["reference"].as_str().expect("reference")));
    assert!(kebab.is_match(output["customer"]["tier"].as_str().expect("tier")));
    assert!(dotted.is_match(output["endpoint"].as_str().expect("endpoint")));
    let total = output["total"].as_f64().expect("total");
    assert!((0.1..100.0).contains(&total));
}

#[test]
fn deep_samples_collapse_to_text() {
    let sample = json!({"a": {"b": {"c": {"d": {"e": 1}}}}});
    let mut options = seeded(4);
    options.max_depth = 2;

    let output = GenerationEngine::new(options)
        .generate_from_sample(&sample, 1)
        .expect("generate")
        .output;
    assert!(output["a"]["b"].is_object());
    assert!(output["a"]["b"]["c"].is_string());
}

#[test]
fn patterns_deeper_than_the_bound_yield_the_sentinel() {
    let sample = json!({"a": {"b": {"c": true}}, "flag": false});
    let pattern = infer_pattern(&sample, "", &[] as &[&str], 0, 10);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let output = generate_from_pattern(&pattern, 1, 5, false, &mut rng);
    assert!(output["a"].is_object());
    assert_eq!(output["a"]["b"], json!("<max depth>"));
    assert!(output["flag"].is_boolean());
}

#[test]
fn short_arrays_stay_arrays() {
    let sample = json!({"empty": [], "single": ["only"], "nested": [[1]]});
    let output = GenerationEngine::new(seeded(6))
        .generate_from_sample(&sample, 1)
        .expect("generate")
        .output;

    assert_eq!(output["empty"], json!([]));
    assert!(output["single"].is_array());
    let nested = output["nested"].as_array().expect("nested");
    assert!(nested.iter().all(Value::is_array));
}

#[test]
fn anonymized_text_matches_sample_length() {
    let sample = json!({"note": "hello world"});
    let mut options = seeded(7);
    options.anonymize = true;

    let output = GenerationEngine::new(options)
        .generate_from_sample(&sample, 1)
        .expect("generate")
        .output;
    let note = output["note"].as_str().expect("note");
    assert_eq!(note.chars().count(), 11);
    assert_eq!(note.chars().nth(5), Some(' '));

    let plain = GenerationEngine::new(seeded(7))
        .with_anonymizer(None)
        .generate_from_sample(&sample, 1)
        .expect("generate")
        .output;
    assert!(!plain["note"].as_str().expect("note").contains(' '));
}

#[test]
fn seeded_runs_are_reproducible() {
    let sample = load_fixture("order.sample.json");
    let run = |parallel: bool| {
        let mut options = seeded(42);
        options.parallel = parallel;
        GenerationEngine::new(options)
            .generate_from_sample(&sample, 8)
            .expect("generate")
    };

    let sequential = run(false);
    assert_eq!(sequential.output, run(false).output);
    assert_eq!(sequential.output, run(true).output);
    assert_eq!(sequential.report.run_seed, 42);
    assert_eq!(sequential.report.items_generated, 8);
}

#[test]
fn count_controls_the_output_container() {
    let sample = json!({"n": 1});
    let engine = GenerationEngine::new(seeded(8));

    let single = engine.generate_from_sample(&sample, 1).expect("one").output;
    assert!(single.is_object());

    let none = engine.generate_from_sample(&sample, 0).expect("zero").output;
    assert_eq!(none, json!([]));

    let many = engine.generate_from_sample(&sample, 3).expect("three").output;
    assert_eq!(many.as_array().map(Vec::len), Some(3));
}

#[test]
fn free_function_applies_preserve_rules() {
    let sample = json!({"user": {"id": 7, "name": "Ada"}, "score": 10});
    let output = generate_from_sample(&sample, 2, 3, false, &["user.id"]).expect("generate");

    for item in output.as_array().expect("array") {
        assert_eq!(item["user"]["id"], json!(7));
        assert!(item["score"].is_i64());
    }
}

#[test]
fn zero_array_bound_is_rejected() {
    let err = generate_from_sample(&json!({"a": [1]}), 1, 0, false, &[] as &[&str])
        .expect_err("invalid options");
    assert!(matches!(err, GenerationError::InvalidOptions(_)));
}
