//! Pure probabilistic skill checks.
//!
//! Every function here takes `&mut impl RandomSource` plus a handful of
//! ratings/context values and returns a bool or a typed outcome — no
//! mutation of `Game` or `Play` happens in this module. Mechanics
//! ([`crate::game::mechanic`]) call these in a fixed order and write the
//! results into a `Play`; that fixed order, not anything about the checks
//! themselves, is what makes two runs from the same seed identical.

use crate::attribute::modifier_diff;
use crate::rng::RandomSource;

fn roll(rng: &mut impl RandomSource) -> f64 {
    rng.next_double()
}

/// Whether a thrown pass is completed.
///
/// `base 0.60 - 0.20 * pressure + (passing - coverage) / 250`, clamped to
/// `[0.25, 0.85]`.
pub fn pass_completion(rng: &mut impl RandomSource, passing: u8, coverage: u8, under_pressure: bool) -> bool {
    let pressure_penalty = if under_pressure { 0.20 } else { 0.0 };
    let prob = (0.60 - pressure_penalty + (passing as f64 - coverage as f64) / 250.0).clamp(0.25, 0.85);
    roll(rng) < prob
}

/// Whether an incomplete pass is instead intercepted. Only rolled when
/// [`pass_completion`] has already failed — an interception can't occur on
/// a pass that was completed.
///
/// `base 0.035 + 0.02 * pressure + modifier(coverage, passing) * 0.5`,
/// clamped to `[0.01, 0.15]`.
pub fn interception_occurred(rng: &mut impl RandomSource, passing: u8, coverage: u8, under_pressure: bool) -> bool {
    let pressure_bonus = if under_pressure { 0.02 } else { 0.0 };
    let prob = (0.035 + pressure_bonus + modifier_diff(coverage as f64 - passing as f64) * 0.5).clamp(0.01, 0.15);
    roll(rng) < prob
}

/// Whether the pass rush gets to the quarterback before the throw.
///
/// `base 0.30 + (rush - protection) / 250`, clamped to `[0.10, 0.60]`.
pub fn qb_pressure(rng: &mut impl RandomSource, rush: u8, protection: u8) -> bool {
    let prob = (0.30 + (rush as f64 - protection as f64) / 250.0).clamp(0.10, 0.60);
    roll(rng) < prob
}

/// Whether pass protection holds, plus the margin (in percentage points)
/// by which it held or failed — positive margins mean the block won
/// comfortably, used by mechanics to scale sack severity.
///
/// `base 0.75 + (protection - rush) / 200`, clamped to `[0.40, 0.95]`;
/// `margin = (prob - roll) * 100`.
pub fn pass_protection(rng: &mut impl RandomSource, protection: u8, rush: u8) -> (bool, f64) {
    let prob = (0.75 + (protection as f64 - rush as f64) / 200.0).clamp(0.40, 0.95);
    let r = roll(rng);
    ((r < prob), (prob - r) * 100.0)
}

/// Result of the yards-after-catch opportunity and breakaway rolls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct YardsAfterCatchRoll {
    pub opportunity: bool,
    pub breakaway_bonus: Option<i32>,
}

/// Whether the receiver gets extra room after the catch, and whether that
/// room turns into a breakaway gain.
///
/// Opportunity: `base 0.35 + (catching - 70) / 400`, clamped to `[0.15,
/// 0.55]`. If `speed >= 85`, a separate 0.05 breakaway roll adds a bonus of
/// 10 to 30 yards (uniform). Consumes one draw for the opportunity roll,
/// plus one more for the breakaway roll when speed qualifies, plus one
/// more for the bonus magnitude when the breakaway roll hits.
pub fn yards_after_catch(rng: &mut impl RandomSource, catching: u8, speed: u8) -> YardsAfterCatchRoll {
    let opportunity_prob = (0.35 + (catching as f64 - 70.0) / 400.0).clamp(0.15, 0.55);
    let opportunity = roll(rng) < opportunity_prob;

    let breakaway_bonus = if speed >= 85 {
        if roll(rng) < 0.05 {
            let span = rng.next_double();
            Some(10 + (span * 20.0).round() as i32)
        } else {
            None
        }
    } else {
        None
    };

    YardsAfterCatchRoll { opportunity, breakaway_bonus }
}

/// Whether a running back breaks off a long gain before contact.
///
/// `base 0.08 + modifier(speed, 70)`, clamped to `[0.03, 0.15]`.
pub fn big_run(rng: &mut impl RandomSource, speed: u8) -> bool {
    let prob = (0.08 + modifier_diff(speed as f64 - 70.0)).clamp(0.03, 0.15);
    roll(rng) < prob
}

/// Whether the ball carrier breaks an arm tackle.
///
/// `base 0.25 + (carrier - tackler) / 250`, clamped to `[0.05, 0.50]`.
pub fn tackle_break(rng: &mut impl RandomSource, carrier: u8, tackler: u8) -> bool {
    let prob = (0.25 + (carrier as f64 - tackler as f64) / 250.0).clamp(0.05, 0.50);
    roll(rng) < prob
}

/// Whether a block is won by the offense.
///
/// `base 0.50 + modifier(blocking, defense)`, clamped to `[0.20, 0.80]`.
pub fn blocking_success(rng: &mut impl RandomSource, blocking: u8, defense: u8) -> bool {
    let prob = (0.50 + modifier_diff(blocking as f64 - defense as f64)).clamp(0.20, 0.80);
    roll(rng) < prob
}

/// The situational context a fumble check is evaluated in, since the base
/// rate depends heavily on what kind of contact produced it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FumbleContext {
    Sack,
    Return,
    Carry,
}

/// Whether the ball carrier coughs up the ball.
///
/// Base rate by context (sack 0.12, return 0.025, else 0.015), scaled by
/// `(1 - modifier(awareness, 50))`, then by `(1 + modifier(pressure, 50))`,
/// then by a gang-tackle multiplier (1.30 for 3+ tacklers, 1.15 for 2),
/// clamped to `[0.003, 0.25]`.
pub fn fumble_occurred(
    rng: &mut impl RandomSource,
    context: FumbleContext,
    awareness: u8,
    pressure: u8,
    tackler_count: u32,
) -> bool {
    let base = match context {
        FumbleContext::Sack => 0.12,
        FumbleContext::Return => 0.025,
        FumbleContext::Carry => 0.015,
    };
    let awareness_factor = 1.0 - modifier_diff(awareness as f64 - 50.0);
    let pressure_factor = 1.0 + modifier_diff(pressure as f64 - 50.0);
    let gang_tackle_factor = if tackler_count >= 3 {
        1.30
    } else if tackler_count == 2 {
        1.15
    } else {
        1.0
    };
    let prob = (base * awareness_factor * pressure_factor * gang_tackle_factor).clamp(0.003, 0.25);
    roll(rng) < prob
}

/// Which way a loose ball bounced, fixing the base recovery probability
/// for the fumbling team.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FumbleBounceDirection {
    Backward,
    Forward,
    Sideways,
}

impl FumbleBounceDirection {
    /// Pick a bounce direction. Consumes one draw: below 1/3 backward,
    /// below 2/3 forward, otherwise sideways.
    fn sample(rng: &mut impl RandomSource) -> FumbleBounceDirection {
        let r = roll(rng);
        if r < 1.0 / 3.0 {
            FumbleBounceDirection::Backward
        } else if r < 2.0 / 3.0 {
            FumbleBounceDirection::Forward
        } else {
            FumbleBounceDirection::Sideways
        }
    }
}

/// Outcome of resolving a loose ball, including the direction it bounced
/// (`None` when it went out of bounds, since no bounce-direction roll
/// happens in that case).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FumbleRecoveryOutcome {
    pub went_out_of_bounds: bool,
    pub bounce_direction: Option<FumbleBounceDirection>,
    pub possession_changed: bool,
}

/// Resolve a loose ball: whether it goes out of bounds, which way it
/// bounces, and which side ends up recovering it.
///
/// Consumes one draw for the out-of-bounds roll (0.12); if it didn't go
/// out, one more for the bounce direction, then one more for the
/// recovery roll — three draws in the worst case, one in the best. A
/// ball that goes out of bounds is always recovered by the team that
/// fumbled it (standard out-of-bounds possession rule), so no
/// possession change is possible on that branch. Otherwise the bounce
/// direction sets a base recovery probability for the *fumbling* team —
/// backward 0.50, forward 0.70, sideways 0.60 — adjusted by the
/// awareness differential between the fumbling and recovering sides and
/// clamped to `[0.30, 0.80]`.
pub fn fumble_possession_change(
    rng: &mut impl RandomSource,
    fumbling_team_awareness: u8,
    recovering_team_awareness: u8,
) -> FumbleRecoveryOutcome {
    if roll(rng) < 0.12 {
        return FumbleRecoveryOutcome {
            went_out_of_bounds: true,
            bounce_direction: None,
            possession_changed: false,
        };
    }
    let direction = FumbleBounceDirection::sample(rng);
    let base = match direction {
        FumbleBounceDirection::Backward => 0.50,
        FumbleBounceDirection::Forward => 0.70,
        FumbleBounceDirection::Sideways => 0.60,
    };
    let fumbling_team_recovers =
        roll(rng) < (base + modifier_diff(fumbling_team_awareness as f64 - recovering_team_awareness as f64)).clamp(0.30, 0.80);
    FumbleRecoveryOutcome {
        went_out_of_bounds: false,
        bounce_direction: Some(direction),
        possession_changed: !fumbling_team_recovers,
    }
}

/// Whether the snap from center is botched.
///
/// `base 0.05 - blocking / 100 * 0.04`.
pub fn bad_snap(rng: &mut impl RandomSource, snapper_blocking: u8) -> bool {
    let prob = 0.05 - (snapper_blocking as f64 / 100.0) * 0.04;
    roll(rng) < prob.max(0.0)
}

/// Whether a catchable punt or kickoff is muffed by the returner.
///
/// `base 0.05 - catching / 100 * 0.04`, plus 0.02 if hang time exceeds 4.5
/// seconds and a further 0.01 if it exceeds 4.0 (both bonuses stack).
pub fn muffed_catch(rng: &mut impl RandomSource, catching: u8, hang_time: f64) -> bool {
    let mut prob = 0.05 - (catching as f64 / 100.0) * 0.04;
    if hang_time > 4.5 {
        prob += 0.02;
    }
    if hang_time > 4.0 {
        prob += 0.01;
    }
    roll(rng) < prob.max(0.0)
}

/// Whether a punt sails out of bounds.
///
/// `base 0.12`, +0.08 if the punt lands inside the opponent's 10-yard
/// line, +0.05 if inside the 15 (the two bonuses are mutually exclusive:
/// inside-the-10 is the tighter band and takes precedence).
pub fn punt_out_of_bounds(rng: &mut impl RandomSource, landing_yards_to_goal: u8) -> bool {
    let mut prob = 0.12;
    if landing_yards_to_goal <= 10 {
        prob += 0.08;
    } else if landing_yards_to_goal <= 15 {
        prob += 0.05;
    }
    roll(rng) < prob
}

/// Whether a field goal attempt is blocked.
///
/// Base rate by distance tier (≤30: 0.015, ≤45: 0.025, ≤55: 0.040, else
/// 0.065), multiplied by 10 on a bad snap, scaled by `(1 - kicker / 300)`,
/// plus `modifier(rusher, blocker / 2)`, clamped to `[0.005, 0.25]`.
pub fn field_goal_block(
    rng: &mut impl RandomSource,
    distance: u8,
    snap_was_bad: bool,
    kicker: u8,
    rusher: u8,
    blocker: u8,
) -> bool {
    let base = if distance <= 30 {
        0.015
    } else if distance <= 45 {
        0.025
    } else if distance <= 55 {
        0.040
    } else {
        0.065
    };
    let snap_factor = if snap_was_bad { 10.0 } else { 1.0 };
    let kicker_factor = 1.0 - (kicker as f64 / 300.0);
    let prob =
        (base * snap_factor * kicker_factor + modifier_diff(rusher as f64 - blocker as f64 / 2.0)).clamp(0.005, 0.25);
    roll(rng) < prob
}

/// Whether a punt attempt is blocked.
///
/// Base rate by snap quality (good snap 0.01, bad snap 0.20), scaled
/// toward the punter and adjusted by the rusher/blocker skill
/// differential: `prob = base * (1 - punter / 200) + (rusher - blocker) /
/// 10 * 0.005`, clamped to `[0.002, 0.30]`.
pub fn punt_block(rng: &mut impl RandomSource, good_snap: bool, punter: u8, rusher: u8, blocker: u8) -> bool {
    let base = if good_snap { 0.01 } else { 0.20 };
    let prob =
        (base * (1.0 - punter as f64 / 200.0) + (rusher as f64 - blocker as f64) / 10.0 * 0.005).clamp(0.002, 0.30);
    roll(rng) < prob
}
