//! Numeric helpers centralizing safe casts and guarded rate math.
//!
//! Every percentage and average in a report flows through here so that all
//! render surfaces see identical rounding.

use num_traits::cast::cast;

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert a count to f64 for use as a denominator or numerator.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}

/// Round to one decimal place, returning 0.0 for non-finite values.
///
/// Reports quote rates and averages at one decimal; rounding once at
/// aggregation time keeps every surface byte-identical.
#[must_use]
pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}

/// Round a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Percentage of `part` in `whole`, guarded to 0.0 when `whole` is zero.
#[must_use]
pub fn guarded_rate(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(u32_to_f64(part) / u32_to_f64(whole) * 100.0)
}

/// Complement percentage, guarded to 100.0 when `whole` is zero.
///
/// Used for compliance: an empty population has nothing out of compliance.
#[must_use]
pub fn guarded_complement_rate(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 100.0;
    }
    round1(u32_to_f64(whole - part.min(whole)) / u32_to_f64(whole) * 100.0)
}

/// Average of an i64 total over a count, guarded to 0.0 for empty counts.
#[must_use]
pub fn guarded_avg(total: i64, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round1(i64_to_f64(total) / u32_to_f64(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round1_handles_non_finite() {
        assert!((round1(f64::NAN)).abs() < f64::EPSILON);
        assert!((round1(26_470.588) - 26_470.6).abs() < 1e-9);
    }

    #[test]
    fn rounder_clamps_and_handles_nan() {
        assert_eq!(round_f64_to_i64(1.6), 2);
        assert_eq!(round_f64_to_i64(f64::NAN), 0);
        assert_eq!(round_f64_to_i64(f64::INFINITY), 0);
    }

    #[test]
    fn rates_guard_zero_denominators() {
        assert!((guarded_rate(3, 0)).abs() < f64::EPSILON);
        assert!((guarded_rate(8, 10) - 80.0).abs() < f64::EPSILON);
        assert!((guarded_complement_rate(0, 0) - 100.0).abs() < f64::EPSILON);
        assert!((guarded_complement_rate(2, 10) - 80.0).abs() < f64::EPSILON);
        assert!((guarded_complement_rate(0, 7) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn averages_guard_and_round() {
        assert!((guarded_avg(222_000, 0)).abs() < f64::EPSILON);
        assert!((guarded_avg(100_000, 3) - 33_333.3).abs() < 1e-9);
    }
}
