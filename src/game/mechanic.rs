//! Play mechanics: the impure orchestrators that run a fixed sequence of
//! skill checks and write the result into a [`Play`].
//!
//! Each function here takes the ratings and situational inputs a single
//! play needs — not a whole [`crate::team::Team`] — so the fixed
//! RNG-consumption order is visible in one place without chasing through
//! personnel lookups. [`crate::game::progression`] is responsible for
//! picking which players' ratings go into these inputs.

use crate::attribute::modifier_diff;
use crate::distributions::{normal, pass_air_yards, run_yards, sack_yards, tfl_yards, PassDepth};
use crate::game::decision::{FairCatchContext, FairCatchDecisionEngine, KickoffCall, OnsideKickContext, OnsideKickDecisionEngine};
use crate::game::play_record::{
    Down, FieldGoalMiss, FieldGoalPlay, Fumble, KickoffOutcome, KickoffPlay, PassPlay, PassSegment, PlayCommon,
    PlayType, PuntOutcome, PuntPlay, RunPlay,
};
use crate::game::Possession;
use crate::rng::RandomSource;
use crate::game::skill;

fn clamp_field_position(raw: i32) -> u8 {
    raw.clamp(0, 100) as u8
}

/// Ratings the run mechanic needs from the ball carrier and the box.
#[derive(Clone, Copy, Debug)]
pub struct RunInput {
    pub possession: Possession,
    pub down: Down,
    pub start_field_position: u8,
    pub is_kneel: bool,
    pub carrier_rushing: u8,
    pub carrier_strength: u8,
    pub carrier_speed: u8,
    pub carrier_awareness: u8,
    pub run_blocking: u8,
    pub run_defense: u8,
    pub tackler_tackling: u8,
    pub tackler_awareness: u8,
}

/// Run the fixed run-play pipeline: snap, kneel short-circuit,
/// blocking, base yards, optional tackle-break and breakaway bonus,
/// fumble check, and — on a fumble — recovery.
pub fn run(rng: &mut impl RandomSource, input: &RunInput) -> RunPlay {
    let mut common = PlayCommon::new(input.possession, input.down, PlayType::Run, input.start_field_position);

    if input.is_kneel {
        common.yards_gained = -1;
        common.elapsed_time = 40.0;
        common.clock_stopped = false;
        let end = clamp_field_position(input.start_field_position as i32 - 1);
        common.end_field_position = end;
        common.is_safety = end == 0;
        return RunPlay { common, is_kneel: true };
    }

    let blocked = skill::blocking_success(rng, input.run_blocking, input.run_defense);
    // A blown blocking assignment can blow the play up for a clear loss
    // before the carrier ever gets going, the run-game counterpart of a
    // sack: a distinct negative-yardage event rather than the tail of the
    // general yardage curve.
    let stuffed_in_backfield = !blocked && rng.next_double() < 0.2;
    let effective_defense = if blocked {
        input.run_defense.saturating_sub(10)
    } else {
        input.run_defense.saturating_add(10).min(100)
    };
    let skill_modifier = modifier_diff(input.carrier_rushing as f64 - effective_defense as f64);
    let mut yards = if stuffed_in_backfield {
        tfl_yards(rng)
    } else {
        run_yards(rng, skill_modifier)
    };

    let mut breakaway = false;
    if yards > -3 {
        let broke_tackle = skill::tackle_break(rng, input.carrier_strength, input.tackler_tackling);
        if broke_tackle {
            yards += 3 + (rng.next_double() * 5.0).round() as i32;
        }
        if skill::big_run(rng, input.carrier_speed) {
            breakaway = true;
            yards += 15 + (rng.next_double() * 25.0).round() as i32;
        }
    }

    common.elapsed_time = normal(rng, 5.0, if breakaway { 4.0 } else { 3.0 }).clamp(2.0, 12.0);
    common.yards_gained = yards;
    let raw_end = input.start_field_position as i32 + yards;
    common.end_field_position = clamp_field_position(raw_end);
    common.is_touchdown = raw_end >= 100;
    common.is_safety = raw_end <= 0;

    let tackler_count = if breakaway { 1 } else { 2 };
    if !common.is_touchdown
        && skill::fumble_occurred(rng, skill::FumbleContext::Carry, input.carrier_awareness, input.tackler_tackling, tackler_count)
    {
        let outcome = skill::fumble_possession_change(rng, input.carrier_awareness, input.tackler_awareness);
        common.fumbles.push(Fumble {
            lost: outcome.possession_changed,
            recovered_by: if outcome.possession_changed {
                input.possession.flip()
            } else {
                input.possession
            },
            return_yards: 0,
        });
        common.possession_change = outcome.possession_changed;
    }

    RunPlay { common, is_kneel: false }
}

/// Ratings the pass mechanic needs from the passer, protection, pass
/// rush, and the targeted receiver/coverage.
#[derive(Clone, Copy, Debug)]
pub struct PassInput {
    pub possession: Possession,
    pub down: Down,
    pub start_field_position: u8,
    pub is_spike: bool,
    pub passing: u8,
    pub pass_protection: u8,
    pub pass_rush: u8,
    pub coverage: u8,
    pub receiver_catching: u8,
    pub receiver_speed: u8,
    pub passer_awareness: u8,
}

/// Run the fixed pass-play pipeline: snap, spike short-circuit,
/// pressure, protection/sack, depth selection, completion, and either
/// YAC or an interception roll.
pub fn pass(rng: &mut impl RandomSource, input: &PassInput) -> PassPlay {
    let mut common = PlayCommon::new(input.possession, input.down, PlayType::Pass, input.start_field_position);

    if input.is_spike {
        common.elapsed_time = 3.0;
        common.clock_stopped = true;
        return PassPlay { common, is_spike: true, segment: PassSegment::Incomplete };
    }

    let under_pressure = skill::qb_pressure(rng, input.pass_rush, input.pass_protection);
    let (protection_held, _margin) = skill::pass_protection(rng, input.pass_protection, input.pass_rush);

    if !protection_held {
        let yards = sack_yards(rng);
        common.yards_gained = yards;
        common.end_field_position = clamp_field_position(input.start_field_position as i32 + yards);
        common.is_safety = input.start_field_position as i32 + yards <= 0;
        common.elapsed_time = normal(rng, 4.0, 1.5).clamp(1.0, 8.0);
        if skill::fumble_occurred(rng, skill::FumbleContext::Sack, input.passer_awareness, input.pass_rush, 1) {
            let outcome = skill::fumble_possession_change(rng, input.passer_awareness, input.pass_rush);
            common.fumbles.push(Fumble {
                lost: outcome.possession_changed,
                recovered_by: if outcome.possession_changed { input.possession.flip() } else { input.possession },
                return_yards: 0,
            });
            common.possession_change = outcome.possession_changed;
        }
        return PassPlay { common, is_spike: false, segment: PassSegment::Sacked { yards_lost: yards } };
    }

    let depth = PassDepth::sample(rng);
    let completed = skill::pass_completion(rng, input.passing, input.coverage, under_pressure);
    common.elapsed_time = normal(rng, 5.0, 1.5).clamp(2.0, 9.0);

    if completed {
        let skill_modifier = modifier_diff(input.passing as f64 - input.coverage as f64);
        let air_yards = pass_air_yards(rng, depth, skill_modifier);
        let yac_roll = skill::yards_after_catch(rng, input.receiver_catching, input.receiver_speed);
        let mut yac = if yac_roll.opportunity { 3 } else { 0 };
        yac += yac_roll.breakaway_bonus.unwrap_or(0);

        let total_yards = air_yards + yac;
        common.yards_gained = total_yards;
        let raw_end = input.start_field_position as i32 + total_yards;
        common.end_field_position = clamp_field_position(raw_end);
        common.is_touchdown = raw_end >= 100;

        if !common.is_touchdown
            && skill::fumble_occurred(rng, skill::FumbleContext::Carry, input.receiver_catching, input.coverage, 1)
        {
            let outcome = skill::fumble_possession_change(rng, input.receiver_catching, input.coverage);
            common.fumbles.push(Fumble {
                lost: outcome.possession_changed,
                recovered_by: if outcome.possession_changed { input.possession.flip() } else { input.possession },
                return_yards: 0,
            });
            common.possession_change = outcome.possession_changed;
        }

        PassPlay {
            common,
            is_spike: false,
            segment: PassSegment::Complete { air_yards, yards_after_catch: yac },
        }
    } else {
        let intercepted = skill::interception_occurred(rng, input.passing, input.coverage, under_pressure);
        if intercepted {
            common.interception = true;
            common.possession_change = true;
            let return_yards = (rng.next_double() * 15.0).round() as i32;
            common.end_field_position = clamp_field_position(100 - input.start_field_position as i32 + return_yards);
            PassPlay { common, is_spike: false, segment: PassSegment::Intercepted { return_yards } }
        } else {
            PassPlay { common, is_spike: false, segment: PassSegment::Incomplete }
        }
    }
}

/// Ratings the field goal mechanic needs.
#[derive(Clone, Copy, Debug)]
pub struct FieldGoalInput {
    pub possession: Possession,
    pub down: Down,
    pub start_field_position: u8,
    pub distance: u8,
    pub kicking: u8,
    pub snapper_blocking: u8,
    pub rusher: u8,
    pub blocker: u8,
}

fn field_goal_make_probability(distance: u8, kicking: u8) -> f64 {
    let d = distance as f64;
    let base = if d <= 30.0 {
        0.98
    } else if d <= 40.0 {
        0.90 - 0.010 * (d - 30.0)
    } else if d <= 50.0 {
        0.80 - 0.015 * (d - 40.0)
    } else if d <= 60.0 {
        0.65 - 0.025 * (d - 50.0)
    } else {
        0.40 - 0.030 * (d - 60.0)
    };
    (base + kicking as f64 / 200.0).clamp(0.05, 0.99)
}

/// Run the fixed field-goal pipeline: snap, block check, and — absent a
/// block — the make/miss roll with a distance-tiered decay curve.
pub fn field_goal(rng: &mut impl RandomSource, input: &FieldGoalInput) -> FieldGoalPlay {
    let mut common = PlayCommon::new(input.possession, input.down, PlayType::FieldGoal, input.start_field_position);
    let bad_snap = skill::bad_snap(rng, input.snapper_blocking);
    common.good_snap = !bad_snap;
    common.elapsed_time = 5.0;
    common.clock_stopped = true;

    let blocked = skill::field_goal_block(rng, input.distance, bad_snap, input.kicking, input.rusher, input.blocker);
    if blocked {
        let defense_recovers = rng.next_double() < 0.50;
        common.possession_change = defense_recovers;
        return FieldGoalPlay { common, distance: input.distance, blocked: true, made: false, miss: None };
    }

    let made = rng.next_double() < field_goal_make_probability(input.distance, input.kicking);
    if made {
        common.is_touchdown = false;
        common.end_field_position = 100;
        FieldGoalPlay { common, distance: input.distance, blocked: false, made: true, miss: None }
    } else {
        common.possession_change = true;
        let r = rng.next_double();
        let miss = if r < 0.4 {
            FieldGoalMiss::WideRight
        } else if r < 0.8 {
            FieldGoalMiss::WideLeft
        } else {
            FieldGoalMiss::Short
        };
        FieldGoalPlay { common, distance: input.distance, blocked: false, made: false, miss: Some(miss) }
    }
}

/// Ratings the punt mechanic needs.
#[derive(Clone, Copy, Debug)]
pub struct PuntInput {
    pub possession: Possession,
    pub down: Down,
    pub start_field_position: u8,
    pub punter_kicking: u8,
    pub snapper_blocking: u8,
    pub rusher: u8,
    pub blocker: u8,
    pub returner_catching: u8,
}

/// Run the fixed punt pipeline: snap, block check, distance/hang time,
/// landing spot, then out-of-bounds, fair catch, downed, muffed, or
/// returned in that order.
pub fn punt(rng: &mut impl RandomSource, input: &PuntInput) -> PuntPlay {
    let mut common = PlayCommon::new(input.possession, input.down, PlayType::Punt, input.start_field_position);
    common.possession_change = true;

    let bad_snap = skill::bad_snap(rng, input.snapper_blocking);
    common.good_snap = !bad_snap;

    let blocked = skill::punt_block(rng, !bad_snap, input.punter_kicking, input.rusher, input.blocker);
    common.elapsed_time = 6.0;
    if blocked {
        common.possession_change = rng.next_double() < 0.60;
        return PuntPlay { common, outcome: PuntOutcome::Blocked };
    }

    let distance = (normal(rng, 42.0, 8.0) + input.punter_kicking as f64 / 10.0).clamp(15.0, 70.0);
    let hang_time = (normal(rng, 4.3, 0.5) + input.punter_kicking as f64 / 300.0).clamp(2.5, 6.0);
    let landing_yards_to_goal = (100 - input.start_field_position as i32 - distance.round() as i32).max(0) as u8;

    if landing_yards_to_goal == 0 {
        common.end_field_position = 20;
        return PuntPlay { common, outcome: PuntOutcome::Touchback };
    }

    if skill::punt_out_of_bounds(rng, landing_yards_to_goal) {
        common.end_field_position = clamp_field_position(100 - landing_yards_to_goal as i32);
        return PuntPlay { common, outcome: PuntOutcome::OutOfBounds };
    }

    let fair_catch = FairCatchDecisionEngine::call(
        rng,
        &FairCatchContext { hang_time_seconds: hang_time, landing_yards_to_own_goal: landing_yards_to_goal, is_kickoff: false },
    );
    if fair_catch {
        common.end_field_position = clamp_field_position(100 - landing_yards_to_goal as i32);
        return PuntPlay { common, outcome: PuntOutcome::FairCatch };
    }

    let downed_probability = if landing_yards_to_goal <= 5 {
        0.50
    } else if landing_yards_to_goal <= 10 {
        0.35
    } else if landing_yards_to_goal <= 15 {
        0.20
    } else {
        0.08
    };
    if rng.next_double() < downed_probability {
        common.end_field_position = clamp_field_position(100 - landing_yards_to_goal as i32);
        return PuntPlay { common, outcome: PuntOutcome::Downed };
    }

    if skill::muffed_catch(rng, input.returner_catching, hang_time) {
        let return_yards = (rng.next_double() * 8.0).round() as i32;
        common.possession_change = rng.next_double() < 0.50;
        common.end_field_position = clamp_field_position(100 - landing_yards_to_goal as i32 + return_yards);
        return PuntPlay { common, outcome: PuntOutcome::Muffed { return_yards } };
    }

    let return_yards = (normal(rng, 8.0, 6.0).max(0.0)).round() as i32;
    common.end_field_position = clamp_field_position(100 - landing_yards_to_goal as i32 + return_yards);
    PuntPlay { common, outcome: PuntOutcome::Returned { return_yards } }
}

/// Ratings the kickoff mechanic needs.
#[derive(Clone, Copy, Debug)]
pub struct KickoffInput {
    pub possession: Possession,
    pub start_field_position: u8,
    pub kicker_kicking: u8,
    pub returner_catching: u8,
    pub returner_speed: u8,
    pub score_differential: i32,
}

/// Run the fixed kickoff pipeline: onside decision, distance, then
/// touchback, fair catch, muffed catch, out-of-bounds, or returned.
pub fn kickoff(rng: &mut impl RandomSource, input: &KickoffInput) -> KickoffPlay {
    let mut common = PlayCommon::new(input.possession, Down::None, PlayType::Kickoff, input.start_field_position);
    common.possession_change = true;
    common.elapsed_time = 5.0;

    let onside_call = OnsideKickDecisionEngine::call(rng, &OnsideKickContext { score_differential: input.score_differential });
    let onside = onside_call == KickoffCall::OnsideKick;

    if onside {
        let recovery_probability = 0.20 + (input.kicker_kicking as f64 / 100.0) * 0.10;
        let kicking_team_recovers = rng.next_double() < recovery_probability;
        common.possession_change = !kicking_team_recovers;
        common.end_field_position = clamp_field_position(input.start_field_position as i32 + 10);
        let outcome = if kicking_team_recovers {
            KickoffOutcome::OnsideRecoveredByKickingTeam
        } else {
            KickoffOutcome::OnsideRecoveredByReceivingTeam
        };
        return KickoffPlay { common, onside: true, outcome };
    }

    let distance = (normal(rng, 62.0, 5.0) + input.kicker_kicking as f64 / 20.0).clamp(45.0, 75.0);
    let landing_field_position = input.start_field_position as i32 + distance.round() as i32;
    let landing_yards_to_goal = (100 - landing_field_position).max(0) as u8;

    if landing_field_position >= 100 {
        common.end_field_position = 25;
        return KickoffPlay { common, onside: false, outcome: KickoffOutcome::Touchback };
    }

    let fair_catch = FairCatchDecisionEngine::call(
        rng,
        &FairCatchContext { hang_time_seconds: 4.2, landing_yards_to_own_goal: landing_yards_to_goal, is_kickoff: true },
    );
    if fair_catch {
        common.end_field_position = clamp_field_position(100 - landing_yards_to_goal as i32);
        return KickoffPlay { common, onside: false, outcome: KickoffOutcome::FairCatch };
    }

    if skill::muffed_catch(rng, input.returner_catching, 4.2) {
        let return_yards = (rng.next_double() * 10.0).round() as i32;
        common.possession_change = rng.next_double() < 0.50;
        common.end_field_position = clamp_field_position(100 - landing_yards_to_goal as i32 + return_yards);
        return KickoffPlay { common, onside: false, outcome: KickoffOutcome::Muffed { return_yards } };
    }

    if rng.next_double() < 0.03 {
        common.end_field_position = clamp_field_position(100 - landing_yards_to_goal as i32);
        return KickoffPlay { common, onside: false, outcome: KickoffOutcome::OutOfBounds };
    }

    let big_return = skill::big_run(rng, input.returner_speed);
    let mut return_yards = (normal(rng, 22.0, 8.0).max(0.0)).round() as i32;
    if big_return {
        return_yards += 20 + (rng.next_double() * 40.0).round() as i32;
    }
    let raw_end = 100 - landing_yards_to_goal as i32 + return_yards;
    common.end_field_position = clamp_field_position(raw_end);
    common.is_touchdown = raw_end >= 100;
    KickoffPlay { common, onside: false, outcome: KickoffOutcome::Returned { return_yards } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GameRng;

    fn run_input() -> RunInput {
        RunInput {
            possession: Possession::Home,
            down: Down::First,
            start_field_position: 50,
            is_kneel: false,
            carrier_rushing: 80,
            carrier_strength: 70,
            carrier_speed: 75,
            carrier_awareness: 70,
            run_blocking: 70,
            run_defense: 60,
            tackler_tackling: 65,
            tackler_awareness: 60,
        }
    }

    #[test]
    fn kneel_loses_one_yard_and_burns_clock() {
        let mut rng = GameRng::from_seed(1);
        let mut input = run_input();
        input.is_kneel = true;
        let play = run(&mut rng, &input);
        assert_eq!(play.common.yards_gained, -1);
        assert_eq!(play.common.elapsed_time, 40.0);
        assert!(!play.common.clock_stopped);
    }

    #[test]
    fn kneel_at_the_one_is_a_safety() {
        let mut rng = GameRng::from_seed(2);
        let mut input = run_input();
        input.is_kneel = true;
        input.start_field_position = 1;
        let play = run(&mut rng, &input);
        assert!(play.common.is_safety);
        assert_eq!(play.common.end_field_position, 0);
    }

    #[test]
    fn stuffed_runs_land_in_the_tfl_yards_clamp() {
        // Blown blocking assignments are rare at these ratings, so sweep
        // seeds until enough stuffed plays show up to check the clamp.
        let mut input = run_input();
        input.run_blocking = 20;
        input.run_defense = 95;
        let mut stuffed = 0;
        for seed in 0..2000u32 {
            let mut rng = GameRng::from_seed(seed);
            let play = run(&mut rng, &input);
            if play.common.yards_gained <= -1 && play.common.yards_gained >= -5 && play.common.fumbles.is_empty() {
                stuffed += 1;
            }
        }
        assert!(stuffed > 0, "expected at least one stuffed-in-the-backfield run across 2000 seeds");
    }

    #[test]
    fn run_end_field_position_always_in_bounds() {
        let mut rng = GameRng::from_seed(3);
        let input = run_input();
        for _ in 0..200 {
            let play = run(&mut rng, &input);
            assert!(play.common.end_field_position <= 100);
        }
    }

    #[test]
    fn spike_sets_fixed_elapsed_time_and_stops_clock() {
        let mut rng = GameRng::from_seed(4);
        let input = PassInput {
            possession: Possession::Away,
            down: Down::Second,
            start_field_position: 40,
            is_spike: true,
            passing: 70,
            pass_protection: 70,
            pass_rush: 60,
            coverage: 60,
            receiver_catching: 70,
            receiver_speed: 70,
            passer_awareness: 70,
        };
        let play = pass(&mut rng, &input);
        assert_eq!(play.common.elapsed_time, 3.0);
        assert!(play.common.clock_stopped);
        assert!(matches!(play.segment, PassSegment::Incomplete));
    }

    #[test]
    fn field_goal_end_position_is_touchback_spot_when_made() {
        let mut rng = GameRng::from_seed(5);
        let input = FieldGoalInput {
            possession: Possession::Home,
            down: Down::Fourth,
            start_field_position: 80,
            distance: 37,
            kicking: 90,
            snapper_blocking: 80,
            rusher: 40,
            blocker: 80,
        };
        for _ in 0..50 {
            let play = field_goal(&mut rng, &input);
            if play.made {
                assert_eq!(play.common.end_field_position, 100);
            }
        }
    }

    #[test]
    fn kickoff_touchback_lands_at_the_25() {
        let mut rng = GameRng::from_seed(6);
        let input = KickoffInput {
            possession: Possession::Home,
            start_field_position: 35,
            kicker_kicking: 95,
            returner_catching: 70,
            returner_speed: 70,
            score_differential: 0,
        };
        let mut saw_touchback = false;
        for _ in 0..500 {
            let play = kickoff(&mut rng, &input);
            if matches!(play.outcome, KickoffOutcome::Touchback) {
                saw_touchback = true;
                assert_eq!(play.common.end_field_position, 25);
            }
        }
        assert!(saw_touchback, "expected at least one touchback over 500 kickoffs at this power");
    }
}
