//! Concrete boundary and statistical scenarios from SPEC_FULL §8 that
//! don't need a full `simulate_game` run to exercise.

use gridiron_sim_core::game::decision::{
    FourthDownContext, FourthDownDecisionEngine, KickoffCall, OnsideKickContext, OnsideKickDecisionEngine,
};
use gridiron_sim_core::game::mechanic::{self, PassInput, RunInput};
use gridiron_sim_core::game::play_record::Down;
use gridiron_sim_core::game::{simulate_game, Possession, SimulationOptions};
use gridiron_sim_core::player::{Player, Position, Ratings};
use gridiron_sim_core::rng::GameRng;
use gridiron_sim_core::team::TeamRaw;

fn full_roster_team(city: &str, name: &str) -> gridiron_sim_core::team::Team {
    let roster = vec![
        Player::new("Joe", "Passer", Position::Qb, Ratings { passing: 80, ..Ratings::average() }),
        Player::new("Gus", "Runner", Position::Rb, Ratings { rushing: 75, ..Ratings::average() }),
        Player::new("Will", "Catch", Position::Wr, Ratings { catching: 75, speed: 80, ..Ratings::average() }),
        Player::new("Tom", "Block", Position::T, Ratings::average()),
        Player::new("Deshaun", "Stop", Position::Lb, Ratings { tackling: 75, ..Ratings::average() }),
        Player::new("Cory", "Back", Position::Cb, Ratings { coverage: 70, ..Ratings::average() }),
        Player::new("Kyle", "Boot", Position::K, Ratings { kicking: 85, ..Ratings::average() }),
        Player::new("Pat", "Punt", Position::P, Ratings { kicking: 70, ..Ratings::average() }),
    ];
    TeamRaw { city: city.to_string(), name: name.to_string(), short_name: "TST".into(), roster }
        .try_into()
        .unwrap()
}

fn input_at(start_field_position: u8, is_kneel: bool) -> RunInput {
    RunInput {
        possession: Possession::Home,
        down: Down::First,
        start_field_position,
        is_kneel,
        carrier_rushing: 60,
        carrier_strength: 60,
        carrier_speed: 60,
        carrier_awareness: 60,
        run_blocking: 50,
        run_defense: 50,
        tackler_tackling: 50,
        tackler_awareness: 50,
    }
}

#[test]
fn kneel_at_own_one_is_a_safety() {
    let mut rng = GameRng::from_seed(1);
    let play = mechanic::run(&mut rng, &input_at(1, true));
    assert!(play.common.is_safety);
    assert_eq!(play.common.yards_gained, -1);
    assert_eq!(play.common.end_field_position, 0);
}

#[test]
fn kneel_sets_elapsed_time_and_leaves_clock_running() {
    let mut rng = GameRng::from_seed(2);
    let play = mechanic::run(&mut rng, &input_at(50, true));
    assert_eq!(play.common.elapsed_time, 40.0);
    assert_eq!(play.common.yards_gained, -1);
    assert!(!play.common.clock_stopped);
}

#[test]
fn spike_sets_elapsed_time_and_stops_the_clock() {
    let mut rng = GameRng::from_seed(3);
    let input = PassInput {
        possession: Possession::Home,
        down: Down::Second,
        start_field_position: 50,
        is_spike: true,
        passing: 70,
        pass_protection: 50,
        pass_rush: 50,
        coverage: 50,
        receiver_catching: 50,
        receiver_speed: 50,
        passer_awareness: 70,
    };
    let play = mechanic::pass(&mut rng, &input);
    assert_eq!(play.common.elapsed_time, 3.0);
    assert!(play.common.clock_stopped);
    assert_eq!(play.common.yards_gained, 0);
}

#[test]
fn run_past_goal_line_becomes_touchdown() {
    // Breakaway yardage is probabilistic; sweep seeds from the goal line
    // until one play crosses it, then check the boundary rule the
    // mechanic applies regardless of which seed produced the crossing.
    let mut hit = false;
    for seed in 0..500u32 {
        let mut rng = GameRng::from_seed(seed);
        let play = mechanic::run(&mut rng, &input_at(97, false));
        if play.common.start_field_position as i32 + play.common.yards_gained >= 100 {
            assert!(play.common.is_touchdown);
            assert_eq!(play.common.end_field_position, 100);
            hit = true;
            break;
        }
    }
    assert!(hit, "expected at least one seed in range to produce a touchdown-range run");
}

/// *Onside kick trailing by 7.* Over 1,000 seeds at `OnsideKickContext`
/// with a 7-point deficit, the count of `OnsideKick` decisions should land
/// near the documented 5% base rate — SPEC_FULL §8 asks for [20, 80] out
/// of 1,000.
#[test]
fn onside_kick_trailing_by_seven_rate() {
    let ctx = OnsideKickContext { score_differential: -7 };
    let mut onside = 0;
    for seed in 0..1000u32 {
        let mut rng = GameRng::from_seed(seed);
        if OnsideKickDecisionEngine::call(&mut rng, &ctx) == KickoffCall::OnsideKick {
            onside += 1;
        }
    }
    assert!((20..=80).contains(&onside), "onside kick count {onside} outside expected range");
}

/// *Fourth-and-1 at midfield, tied, mid-game.* Over 1,000 seeds, the
/// `GoForIt` count should be at least half.
#[test]
fn fourth_and_one_at_midfield_go_for_it_rate() {
    let ctx = FourthDownContext {
        yards_to_go: 1,
        yards_to_goal: 50,
        score_differential: 0,
        time_remaining_seconds: 900,
        quarter_number: 2,
    };
    let mut go_for_it = 0;
    for seed in 0..1000u32 {
        let mut rng = GameRng::from_seed(seed);
        if FourthDownDecisionEngine::call(&mut rng, &ctx) == gridiron_sim_core::game::decision::FourthDownCall::GoForIt {
            go_for_it += 1;
        }
    }
    assert!(go_for_it >= 500, "go-for-it count {go_for_it} below expected threshold");
}

/// *Quarter expiry and the end-of-half extension.* A full game's play log
/// should carry `quarter_expired`/`half_expired` markers on the plays that
/// actually end a quarter or half — the untimed-down extension this feeds
/// (an accepted penalty on the expiring play keeps the half alive for one
/// more down) is unit-tested directly in `game::progression` against a
/// hand-built penalty, since nothing in the mechanics layer flags a
/// penalty for a real game to hit in practice.
#[test]
fn quarter_expiry_is_flagged_on_the_play_that_ends_each_quarter() {
    let options = SimulationOptions { random_seed: Some(55), ..SimulationOptions::default() };
    let result = simulate_game(full_roster_team("Home", "Hawks"), full_roster_team("Away", "Wolves"), options).unwrap();

    let quarter_expired_count = result.plays.iter().filter(|p| p.common().quarter_expired).count();
    assert!(quarter_expired_count >= 3, "expected several quarter-ending plays, got {quarter_expired_count}");

    let half_expired_count = result.plays.iter().filter(|p| p.common().half_expired).count();
    assert!(half_expired_count >= 1, "expected at least one half-ending play");
}

#[test]
fn team_raw_rejects_roster_missing_required_positions() {
    let raw = TeamRaw {
        city: "Testville".to_string(),
        name: "Testers".to_string(),
        short_name: "TST".to_string(),
        roster: vec![Player::new("Solo", "Player", Position::Wr, Ratings::average())],
    };
    let team: Result<gridiron_sim_core::team::Team, String> = raw.try_into();
    assert!(team.is_err());
}
