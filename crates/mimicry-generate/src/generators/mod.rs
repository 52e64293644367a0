//! Scalar value strategies shared by both generation pipelines.

pub mod field;
pub mod sample;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use rand::{Rng, RngCore};
use serde_json::{Number, Value};

pub use field::FieldGenerator;
pub use sample::{SampleGenerator, generate_from_pattern};

/// Value placed where sample generation runs past the depth bound.
pub const DEPTH_EXCEEDED_SENTINEL: &str = "<max depth>";

/// Rendering of every generated datetime.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const TEXT_WORDS: [&str; 8] = [
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
];
const KEBAB_WORDS: [&str; 7] = ["alpha", "beta", "gamma", "delta", "omega", "sigma", "theta"];
const DOTTED_PREFIXES: [&str; 8] = ["api", "app", "web", "data", "user", "admin", "auth", "core"];
const DOTTED_SUFFIXES: [&str; 8] = [
    "v1", "v2", "main", "config", "service", "client", "server", "utils",
];

const DATETIME_SPREAD_SECONDS: i64 = 365 * 86_400;

pub(crate) const DEFAULT_INT_RANGE: (i64, i64) = (1, 1_001);
pub(crate) const DEFAULT_LONG_RANGE: (i64, i64) = (1, 1_000_001);

fn pick<'a>(words: &[&'a str], rng: &mut dyn RngCore) -> &'a str {
    words[rng.random_range(0..words.len())]
}

/// Datetime uniformly within a year on either side of `reference`.
pub fn random_datetime(reference: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    let offset = rng.random_range(-DATETIME_SPREAD_SECONDS..=DATETIME_SPREAD_SECONDS);
    reference
        .checked_add_signed(Duration::seconds(offset))
        .unwrap_or(reference)
}

pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Parse an ISO-8601 seed value; offsets are normalized to UTC.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn random_guid(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

/// Seven or eight digit numeral.
pub fn random_numeric_string(rng: &mut dyn RngCore) -> String {
    rng.random_range(1_000_000_u32..100_000_000).to_string()
}

pub fn random_kebab(rng: &mut dyn RngCore) -> String {
    let first = pick(&KEBAB_WORDS, rng);
    let second = pick(&KEBAB_WORDS, rng);
    format!("{first}-{second}")
}

pub fn random_dotted(rng: &mut dyn RngCore) -> String {
    let prefix = pick(&DOTTED_PREFIXES, rng);
    let suffix = pick(&DOTTED_SUFFIXES, rng);
    format!("{prefix}/{suffix}")
}

pub fn random_word(rng: &mut dyn RngCore) -> String {
    pick(&TEXT_WORDS, rng).to_string()
}

/// Uniform draw from the half-open range `[min, max)`.
pub fn random_int(min: i64, max: i64, rng: &mut dyn RngCore) -> i64 {
    if min >= max {
        return min;
    }
    rng.random_range(min..max)
}

pub fn random_double(rng: &mut dyn RngCore) -> f64 {
    rng.random_range(0.1..100.0)
}

pub fn random_bool(rng: &mut dyn RngCore) -> bool {
    rng.random_bool(0.5)
}

/// Filler of exactly `length` characters, fed to the anonymizer.
pub fn placeholder_text(length: usize) -> String {
    TEXT_WORDS
        .iter()
        .flat_map(|word| word.chars().chain(std::iter::once(' ')))
        .cycle()
        .take(length)
        .collect()
}

/// JSON number for a float; non-finite values become null.
pub(crate) fn float_value(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}
