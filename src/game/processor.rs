//! The play-result processor: commits a finished [`Play`] onto a [`Game`].
//!
//! Mechanics never touch `Game` directly — they only build a `Play`. This
//! module is the single place where field position, score, possession,
//! down/distance, and penalty enforcement are applied, which keeps the
//! mutation surface to one function per concern instead of scattering
//! `Game` writes across every mechanic.

use crate::game::decision::{PenaltyCall, PenaltyDecisionContext, PenaltyDecisionEngine};
use crate::game::play_record::{Down, Play};
use crate::game::{assert_invariant, Game};

fn clamp_field_position(raw: i32) -> u8 {
    raw.clamp(0, 100) as u8
}

fn next_down(down: Down) -> Down {
    match down {
        Down::First => Down::Second,
        Down::Second => Down::Third,
        Down::Third => Down::Fourth,
        Down::Fourth | Down::None => Down::First,
    }
}

/// Resolve every penalty flagged on the play: ask the
/// [`PenaltyDecisionEngine`] to accept or decline each, then fold the
/// accepted ones into the play's net yardage and touchdown/safety flags
/// before the scoring/possession commit runs.
///
/// Offensive penalties move the spot back toward the offense's own goal
/// (relative to `pre_distance`, i.e. away from the line to gain);
/// defensive penalties move it toward the opponent's goal. Enforcement
/// that pushes the spot to or past the goal line credits a touchdown;
/// past the offense's own goal line credits a safety.
fn enforce_penalties(play: &mut Play, pre_distance: u8) {
    let common = play.common_mut();
    if common.penalties.is_empty() {
        return;
    }

    let mut automatic_first_down = false;
    let mut net_spot = common.end_field_position as i32;

    for penalty in common.penalties.iter_mut() {
        let yards = penalty.name.yards() as i32;
        let moved_forward_for_offense = net_spot - common.start_field_position as i32 >= pre_distance as i32;
        let ctx = PenaltyDecisionContext {
            is_automatic_first_down: penalty.name.is_automatic_first_down(),
            is_offensive_penalty: penalty.name.is_offensive(),
            penalty_yards: penalty.name.yards(),
            play_yards_gained: common.yards_gained,
            play_resulted_in_first_down: moved_forward_for_offense,
            play_resulted_in_score: common.is_touchdown,
            declining_yields_turnover_on_downs: false,
        };
        let call = PenaltyDecisionEngine::call(&ctx);
        penalty.accepted = Some(call == PenaltyCall::Accept);
        if call != PenaltyCall::Accept {
            continue;
        }
        if penalty.name.is_automatic_first_down() {
            automatic_first_down = true;
        }
        if penalty.name.is_offensive() {
            net_spot -= yards;
        } else {
            net_spot += yards;
        }
    }

    common.end_field_position = clamp_field_position(net_spot);
    common.is_touchdown = net_spot >= 100;
    common.is_safety = net_spot <= 0;
    common.automatic_first_down = automatic_first_down;
}

/// Commit a finished play onto `game`: score, possession, field
/// position, and down/distance, then push the play onto the log.
///
/// Penalty enforcement runs first, since an accepted penalty can turn a
/// non-scoring play into a touchdown or safety before the rest of this
/// function ever looks at `is_touchdown`/`is_safety`.
pub fn commit_play(game: &mut Game, mut play: Play) {
    let pre_down = game.down();
    let pre_distance = game.distance();
    enforce_penalties(&mut play, pre_distance);

    let common = play.common().clone();
    let offense = common.possession;

    if let Play::FieldGoal(ref fg) = play {
        if fg.made {
            game.add_score(offense, 3);
            game.set_possession(offense.flip());
            game.set_down(Down::None);
            game.set_distance(0);
            game.set_field_position(35);
            game.push_play(play);
            game.check_invariants();
            return;
        }
    }

    if common.is_touchdown {
        let scoring_team = if common.possession_change { offense.flip() } else { offense };
        game.add_score(scoring_team, 6);
        game.set_possession(scoring_team.flip());
        game.set_down(Down::None);
        game.set_distance(0);
        game.set_field_position(35);
    } else if common.is_safety {
        let scoring_team = offense.flip();
        game.add_score(scoring_team, 2);
        game.set_possession(scoring_team);
        game.set_down(Down::None);
        game.set_distance(0);
        game.set_field_position(40);
    } else if common.possession_change {
        let new_field_position = clamp_field_position(100 - common.end_field_position as i32);
        game.set_possession(offense.flip());
        let yards_to_goal = 100 - new_field_position as i32;
        let distance = yards_to_goal.clamp(1, 10) as u8;
        game.set_down(Down::First);
        game.set_distance(distance);
        game.set_field_position(new_field_position);
    } else {
        let net_yards = common.end_field_position as i32 - common.start_field_position as i32;
        game.set_field_position(common.end_field_position);
        if common.automatic_first_down || net_yards >= pre_distance as i32 {
            let yards_to_goal = 100 - common.end_field_position as i32;
            game.set_down(Down::First);
            game.set_distance(yards_to_goal.clamp(1, 10) as u8);
        } else if pre_down == Down::Fourth {
            // Turnover on downs: the defense takes over at the spot.
            let new_field_position = clamp_field_position(100 - common.end_field_position as i32);
            game.set_possession(offense.flip());
            let yards_to_goal = 100 - new_field_position as i32;
            game.set_down(Down::First);
            game.set_distance(yards_to_goal.clamp(1, 10) as u8);
            game.set_field_position(new_field_position);
        } else {
            game.set_down(next_down(pre_down));
            let remaining = (pre_distance as i32 - net_yards.max(0)).max(1);
            game.set_distance(remaining as u8);
        }
    }

    assert_invariant!(
        game.field_position() <= 100,
        "play-result processor produced an out-of-range field position"
    );
    game.push_play(play);
    game.check_invariants();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::play_record::{PenaltyName, PenaltyTiming, PlayCommon, PlayType, RunPlay};
    use crate::game::Possession;
    use crate::player::{Position, Ratings};
    use crate::team::Team;

    fn sample_team(city: &str, name: &str) -> Team {
        crate::team::TeamRaw {
            city: city.to_string(),
            name: name.to_string(),
            short_name: name.chars().take(3).collect(),
            roster: vec![
                crate::player::Player::new("Joe", "Starter", Position::Qb, Ratings::average()),
                crate::player::Player::new("Kyle", "Boot", Position::K, Ratings::average()),
                crate::player::Player::new("Pat", "Punt", Position::P, Ratings::average()),
            ],
        }
        .try_into()
        .unwrap()
    }

    fn fresh_game() -> Game {
        Game::new(sample_team("Home", "Hawks"), sample_team("Away", "Wolves"), 1, true)
    }

    fn run_play(possession: Possession, start: u8, yards: i32) -> Play {
        let mut common = PlayCommon::new(possession, Down::First, PlayType::Run, start);
        common.yards_gained = yards;
        common.end_field_position = (start as i32 + yards).clamp(0, 100) as u8;
        Play::Run(RunPlay { common, is_kneel: false })
    }

    #[test]
    fn first_down_gained_resets_down_and_distance() {
        let mut game = fresh_game();
        game.set_field_position(50);
        game.set_down(Down::First);
        game.set_distance(10);
        commit_play(&mut game, run_play(Possession::Home, 50, 12));
        assert_eq!(game.down(), Down::First);
        assert_eq!(game.distance(), 10);
        assert_eq!(game.field_position(), 62);
    }

    #[test]
    fn short_gain_advances_down_and_shrinks_distance() {
        let mut game = fresh_game();
        game.set_field_position(50);
        game.set_down(Down::Second);
        game.set_distance(7);
        commit_play(&mut game, run_play(Possession::Home, 50, 3));
        assert_eq!(game.down(), Down::Third);
        assert_eq!(game.distance(), 4);
    }

    #[test]
    fn touchdown_scores_six_and_flips_possession() {
        let mut game = fresh_game();
        let mut play = run_play(Possession::Home, 95, 10);
        play.common_mut().is_touchdown = true;
        game.set_possession(Possession::Home);
        commit_play(&mut game, play);
        assert_eq!(game.score(Possession::Home), 6);
        assert_eq!(game.possession(), Possession::Away);
    }

    #[test]
    fn fourth_down_failure_turns_ball_over_at_the_spot() {
        let mut game = fresh_game();
        game.set_field_position(50);
        game.set_down(Down::Fourth);
        game.set_distance(5);
        commit_play(&mut game, run_play(Possession::Home, 50, 1));
        assert_eq!(game.possession(), Possession::Away);
        assert_eq!(game.field_position(), 49);
        assert_eq!(game.down(), Down::First);
    }

    #[test]
    fn accepted_defensive_penalty_grants_automatic_first_down() {
        let mut game = fresh_game();
        game.set_field_position(50);
        game.set_down(Down::Third);
        game.set_distance(8);
        let mut play = run_play(Possession::Home, 50, 1);
        play.common_mut().penalties.push(crate::game::play_record::Penalty::new(
            PenaltyName::DefensiveHolding,
            Possession::Away,
            PenaltyTiming::During,
        ));
        commit_play(&mut game, play);
        assert_eq!(game.down(), Down::First);
        assert_eq!(game.distance(), 10);
    }
}
