use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, RngCore};

/// Scalar transforms backing the `Anonymize` action.
///
/// Each transform keeps the shape of its input (length, magnitude, rough
/// date) while changing the value. When the engine runs without an
/// anonymizer, anonymize requests fall back to fresh vocabulary values.
pub trait Anonymizer: Send + Sync + fmt::Debug {
    /// Length-matched replacement for `text`.
    fn scramble_text(&self, text: &str, rng: &mut dyn RngCore) -> String;

    /// Integer near `value`, never equal to it.
    fn offset_integer(&self, value: i64, rng: &mut dyn RngCore) -> i64;

    /// Float in the neighborhood of `value`.
    fn offset_float(&self, value: f64, rng: &mut dyn RngCore) -> f64;

    /// Datetime near `value`, never equal to it.
    fn jitter_datetime(&self, value: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc>;
}

/// Shape-preserving anonymizer bundled with the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeAnonymizer;

const INTEGER_OFFSET: i64 = 100;
const FLOAT_JITTER: f64 = 0.1;
const MIN_FLOAT_JITTER: f64 = 0.01;
const DATETIME_JITTER_DAYS: i64 = 30;

impl Anonymizer for ShapeAnonymizer {
    fn scramble_text(&self, text: &str, rng: &mut dyn RngCore) -> String {
        text.chars()
            .map(|ch| {
                if ch.is_ascii_lowercase() {
                    char::from(rng.random_range(b'a'..=b'z'))
                } else if ch.is_ascii_uppercase() {
                    char::from(rng.random_range(b'A'..=b'Z'))
                } else if ch.is_ascii_digit() {
                    char::from(rng.random_range(b'0'..=b'9'))
                } else if ch.is_alphabetic() {
                    char::from(rng.random_range(b'a'..=b'z'))
                } else {
                    ch
                }
            })
            .collect()
    }

    fn offset_integer(&self, value: i64, rng: &mut dyn RngCore) -> i64 {
        let magnitude = rng.random_range(1..=INTEGER_OFFSET);
        let offset = if rng.random_bool(0.5) {
            magnitude
        } else {
            -magnitude
        };
        match value.checked_add(offset) {
            Some(shifted) => shifted,
            None => value.saturating_sub(offset),
        }
    }

    fn offset_float(&self, value: f64, rng: &mut dyn RngCore) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        // Zero has no relative neighborhood; shift it by a small absolute step.
        if value == 0.0 {
            return sign * rng.random_range(MIN_FLOAT_JITTER..=1.0);
        }
        let factor = sign * rng.random_range(MIN_FLOAT_JITTER..=FLOAT_JITTER);
        value + value * factor
    }

    fn jitter_datetime(&self, value: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
        let days = rng.random_range(1..=DATETIME_JITTER_DAYS);
        let days = if rng.random_bool(0.5) { days } else { -days };
        value
            .checked_add_signed(Duration::days(days))
            .or_else(|| value.checked_sub_signed(Duration::days(days)))
            .unwrap_or(value)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn scrambled_text_keeps_character_classes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let input = "Order-42 ready";
        let output = ShapeAnonymizer.scramble_text(input, &mut rng);

        assert_eq!(output.chars().count(), input.chars().count());
        for (original, scrambled) in input.chars().zip(output.chars()) {
            if original.is_ascii_uppercase() {
                assert!(scrambled.is_ascii_uppercase());
            } else if original.is_ascii_lowercase() {
                assert!(scrambled.is_ascii_lowercase());
            } else if original.is_ascii_digit() {
                assert!(scrambled.is_ascii_digit());
            } else {
                assert_eq!(original, scrambled);
            }
        }
    }

    #[test]
    fn integers_move_within_the_neighborhood() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let shifted = ShapeAnonymizer.offset_integer(30, &mut rng);
            assert_ne!(shifted, 30);
            assert!((-70..=130).contains(&shifted));
        }
        let edge = ShapeAnonymizer.offset_integer(i64::MAX, &mut rng);
        assert_ne!(edge, i64::MAX);
    }

    #[test]
    fn floats_stay_within_ten_percent() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let shifted = ShapeAnonymizer.offset_float(50.0, &mut rng);
            assert!((45.0..=55.0).contains(&shifted), "{shifted}");
            assert_ne!(shifted, 50.0);
        }
    }

    #[test]
    fn zero_floats_still_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..200 {
            let shifted = ShapeAnonymizer.offset_float(0.0, &mut rng);
            assert_ne!(shifted, 0.0);
            assert!(shifted.abs() <= 1.0, "{shifted}");
        }
    }

    #[test]
    fn datetimes_shift_by_whole_days() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let base = Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap();
        for _ in 0..100 {
            let shifted = ShapeAnonymizer.jitter_datetime(base, &mut rng);
            let days = (shifted - base).num_days();
            assert_ne!(days, 0);
            assert!(days.abs() <= DATETIME_JITTER_DAYS);
            assert_eq!((shifted - base).num_seconds() % 86_400, 0);
        }
    }
}
