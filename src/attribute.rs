//! The logarithmic skill curve every probabilistic check builds on.
//!
//! A single formula turns a rating (or a rating differential) into a small
//! signed multiplier: zero when the input is at baseline, growing with
//! diminishing returns as it moves away in either direction. Skill checks
//! in [`crate::skill`] add `modifier(...) ` terms straight onto a base
//! probability rather than re-deriving a curve per check.

/// Default baseline a single rating is compared against when no explicit
/// differential is supplied.
pub const DEFAULT_BASELINE: f64 = 50.0;

/// Clamp applied to the input magnitude before taking the log, so that a
/// pathological caller-supplied differential can't overflow or produce
/// `NaN`/`inf`.
const MAX_INPUT_MAGNITUDE: f64 = 1000.0;

const MODIFIER_SCALE: f64 = 0.15;
const LOG_DIVISOR: f64 = 10.0;

/// `sign(rating - baseline) * log(1 + |rating - baseline| / 10) * 0.15`.
///
/// Zero at `rating == baseline`; symmetric and monotonic in the
/// differential; bounded for any finite input because the magnitude is
/// clamped to `[-1000, 1000]` before the log.
///
/// ### Example
/// ```
/// use gridiron_sim_core::attribute::modifier;
///
/// assert!((modifier(50.0, 50.0) - 0.0).abs() < 1e-9);
/// assert!(modifier(70.0, 50.0) > 0.0);
/// assert!(modifier(30.0, 50.0) < 0.0);
/// ```
pub fn modifier(rating: f64, baseline: f64) -> f64 {
    modifier_diff(rating - baseline)
}

/// Same curve, applied directly to a differential rather than a
/// rating/baseline pair.
///
/// ### Example
/// ```
/// use gridiron_sim_core::attribute::modifier_diff;
///
/// assert!((modifier_diff(0.0) - 0.0).abs() < 1e-9);
/// assert!(modifier_diff(-20.0) < 0.0);
/// ```
pub fn modifier_diff(differential: f64) -> f64 {
    let clamped = differential.clamp(-MAX_INPUT_MAGNITUDE, MAX_INPUT_MAGNITUDE);
    clamped.signum() * (1.0 + (clamped.abs() / LOG_DIVISOR)).ln() * MODIFIER_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn reference_table_at_baseline_50() {
        let table = [
            (30.0, -0.165),
            (50.0, 0.0),
            (70.0, 0.165),
            (90.0, 0.241),
            (99.0, 0.266),
        ];
        for (rating, expected) in table {
            let got = modifier(rating, DEFAULT_BASELINE);
            assert!(close(got, expected), "modifier({rating}) = {got}, expected ~{expected}");
        }
    }

    #[test]
    fn zero_at_baseline() {
        assert_eq!(modifier(50.0, 50.0), 0.0);
        assert_eq!(modifier_diff(0.0), 0.0);
    }

    #[test]
    fn symmetric_about_baseline() {
        let above = modifier(80.0, 50.0);
        let below = modifier(20.0, 50.0);
        assert!(close(above, -below));
    }

    #[test]
    fn monotonic_increasing() {
        let ratings = [0.0, 10.0, 25.0, 40.0, 50.0, 60.0, 75.0, 90.0, 100.0];
        let mut last = f64::NEG_INFINITY;
        for r in ratings {
            let m = modifier(r, DEFAULT_BASELINE);
            assert!(m > last);
            last = m;
        }
    }

    #[test]
    fn extreme_inputs_do_not_overflow() {
        assert!(modifier_diff(1e12).is_finite());
        assert!(modifier_diff(-1e12).is_finite());
        assert!(modifier_diff(f64::MAX).is_finite());
        assert!(modifier_diff(f64::MIN).is_finite());
    }
}
