//! Property tests for the invariants `simulate_game` must uphold for any
//! seed and any valid roster pair.

use gridiron_sim_core::game::clock::{Quarter, QuarterType};
use gridiron_sim_core::game::decision::{KickoffCall, OnsideKickContext, OnsideKickDecisionEngine};
use gridiron_sim_core::game::{simulate_game, Possession, SimulationOptions};
use gridiron_sim_core::player::{Player, Position, Ratings};
use gridiron_sim_core::rng::GameRng;
use gridiron_sim_core::team::{Team, TeamRaw};
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

fn full_roster_team(city: &str, name: &str, offset: u8) -> Team {
    let bump = |base: u8| base.saturating_add(offset % 20).min(99);
    let roster = vec![
        Player::new("Joe", "Passer", Position::Qb, Ratings { passing: bump(70), ..Ratings::average() }),
        Player::new("Gus", "Runner", Position::Rb, Ratings { rushing: bump(65), speed: bump(70), ..Ratings::average() }),
        Player::new("Will", "Catch", Position::Wr, Ratings { catching: bump(65), speed: bump(75), ..Ratings::average() }),
        Player::new("Tom", "Block", Position::T, Ratings::average()),
        Player::new("Deshaun", "Stop", Position::Lb, Ratings { tackling: bump(65), ..Ratings::average() }),
        Player::new("Cory", "Back", Position::Cb, Ratings { coverage: bump(60), ..Ratings::average() }),
        Player::new("Kyle", "Boot", Position::K, Ratings { kicking: bump(75), ..Ratings::average() }),
        Player::new("Pat", "Punt", Position::P, Ratings { kicking: bump(60), ..Ratings::average() }),
        Player::new("Sam", "Snap", Position::Ls, Ratings::average()),
    ];
    TeamRaw { city: city.to_string(), name: name.to_string(), short_name: "TST".into(), roster }
        .try_into()
        .unwrap()
}

fn options(seed: u32) -> SimulationOptions {
    SimulationOptions {
        random_seed: Some(seed),
        ..SimulationOptions::default()
    }
}

proptest! {
    /// Invariant 1 (SPEC_FULL §8): same seed, same rosters ⇒ identical play
    /// sequence and identical final score.
    #[test]
    fn simulate_game_is_deterministic(seed in any::<u32>(), offset in 0u8..20) {
        let home_a = full_roster_team("Home", "Hawks", offset);
        let away_a = full_roster_team("Away", "Wolves", offset.wrapping_add(5));
        let result_a = simulate_game(home_a, away_a, options(seed)).unwrap();

        let home_b = full_roster_team("Home", "Hawks", offset);
        let away_b = full_roster_team("Away", "Wolves", offset.wrapping_add(5));
        let result_b = simulate_game(home_b, away_b, options(seed)).unwrap();

        prop_assert_eq!(result_a.home_score, result_b.home_score);
        prop_assert_eq!(result_a.away_score, result_b.away_score);
        prop_assert_eq!(result_a.plays.len(), result_b.plays.len());
        for (a, b) in result_a.plays.iter().zip(result_b.plays.iter()) {
            prop_assert_eq!(a.common().end_field_position, b.common().end_field_position);
            prop_assert_eq!(a.common().yards_gained, b.common().yards_gained);
        }
    }

    /// Invariant 2: every committed play leaves field position in [0, 100]
    /// and both scores non-negative (scores are unsigned, so only the
    /// field-position half is worth asserting directly).
    #[test]
    fn field_position_always_in_bounds(seed in any::<u32>()) {
        let home = full_roster_team("Home", "Hawks", 0);
        let away = full_roster_team("Away", "Wolves", 3);
        let result = simulate_game(home, away, options(seed)).unwrap();
        for play in &result.plays {
            prop_assert!(play.common().end_field_position <= 100);
            prop_assert!(play.common().start_field_position <= 100);
        }
    }

    /// Invariant 4: under the no-ties playoff ruleset, the game never ends
    /// level.
    #[test]
    fn nfl_playoff_never_ties(seed in any::<u32>()) {
        let home = full_roster_team("Home", "Hawks", 1);
        let away = full_roster_team("Away", "Wolves", 2);
        let result = simulate_game(
            home,
            away,
            SimulationOptions {
                random_seed: Some(seed),
                overtime_rules: "NFL_PLAYOFF".to_string(),
                ..SimulationOptions::default()
            },
        )
        .unwrap();
        prop_assert!(!result.is_tie);
        prop_assert_ne!(result.home_score, result.away_score);
        prop_assert!(matches!(result.winner, Some(Possession::Home) | Some(Possession::Away)));
    }

    /// Invariant 3: summing the elapsed time `Quarter::elapse` is handed
    /// across an arbitrary sequence of plays must equal the clock's actual
    /// start-to-end delta — the bug this guards against was `elapse`
    /// rounding its `seconds` argument before subtracting, which drifted
    /// the two apart over a full quarter of plays.
    #[test]
    fn quarter_elapse_sum_matches_clock_delta(plays in prop_vec(0.1f64..90.0, 1..80)) {
        // Give the quarter enough duration that no play's elapsed time is
        // ever clipped by hitting zero, so the sum of what's handed to
        // `elapse` must equal the clock's exact start-to-end delta.
        let max_duration = plays.iter().sum::<f64>().ceil() as u32 + 10;
        let mut quarter = Quarter::new(QuarterType::First, max_duration);
        let start = quarter.time_remaining();
        for seconds in &plays {
            quarter.elapse(*seconds);
        }
        let end = quarter.time_remaining();
        let delta = (start - end) as f64;
        let sum_elapsed: f64 = plays.iter().sum();
        prop_assert!((sum_elapsed - delta).abs() < 1.0, "sum_elapsed={sum_elapsed} delta={delta}");
    }

    /// Invariant 5: the two-minute warning latch fires at most once per
    /// quarter, however many plays cross (or re-cross, via a frozen-clock
    /// untimed down) the 120-second mark.
    #[test]
    fn two_minute_warning_fires_at_most_once_per_quarter(
        plays in prop_vec(0.0f64..200.0, 1..80),
    ) {
        let mut quarter = Quarter::new(QuarterType::Second, 900);
        let mut fires = 0;
        for seconds in &plays {
            let before = quarter.time_remaining();
            quarter.elapse(*seconds);
            if !quarter.two_minute_warning_called() && quarter.crossed_two_minutes(before) {
                quarter.mark_two_minute_warning_called();
                fires += 1;
            }
        }
        prop_assert!(fires <= 1, "two-minute warning fired {fires} times in one quarter");
    }

    /// Invariant 6: `OnsideKickDecisionEngine` must not draw from the RNG
    /// at all when the trailing precondition fails.
    #[test]
    fn onside_kick_does_not_consume_rng_unless_trailing(seed in any::<u32>(), diff in -6i32..=20) {
        let mut rng = GameRng::from_seed(seed);
        let ctx = OnsideKickContext { score_differential: diff };
        let call = OnsideKickDecisionEngine::call(&mut rng, &ctx);

        prop_assert_eq!(call, KickoffCall::NormalKickoff);
        prop_assert_eq!(rng, GameRng::from_seed(seed));
    }
}
