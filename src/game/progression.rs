//! The outer game-progression state machine: drives a [`Game`] from
//! kickoff to final whistle one play at a time, and the public
//! [`simulate_game`] entry point that wraps it.

use std::panic;

use log::debug;

use crate::error::ConfigError;
use crate::game::clock::{Quarter, QuarterType};
use crate::game::decision::{
    ConversionCall, FourthDownCall, FourthDownContext, FourthDownDecisionEngine, PlayCall, PlayCallContext,
    PlayCallDecisionEngine,
};
use crate::game::mechanic::{self, FieldGoalInput, KickoffInput, PassInput, PuntInput, RunInput};
use crate::game::play_record::{Down, Play};
use crate::game::processor;
use crate::game::ruleset::{
    self, EndOfHalfRules, NextPossessionAction, OvertimeOutcome, OvertimeRules, OvertimeState,
    PossessionChangeReason, ScoreType, TwoMinuteWarningRules,
};
use crate::game::{Game, Possession, REQUIRED_POSITIONS};
use crate::player::Player;
use crate::rng::{GameRng, RandomSource};
use crate::team::Team;

/// Append-only sink for human-readable play-by-play text.
///
/// The engine never inspects what `record` does with a line; a logger
/// that panics is caught and ignored (see [`simulate_game`]) so a buggy
/// or unavailable sink can never affect the simulated game itself.
pub trait PlayByPlayLogger {
    fn record(&self, line: &str);
}

fn log_play(logger: Option<&dyn PlayByPlayLogger>, line: String) {
    if let Some(logger) = logger {
        let _ = panic::catch_unwind(panic::AssertUnwindSafe(|| logger.record(&line)));
    }
}

/// Caller-supplied knobs for a single simulated game.
pub struct SimulationOptions {
    /// 32-bit seed driving every random draw in the game. Drawn from OS
    /// entropy when absent; the seed actually used is always returned on
    /// [`GameResult`] so the game can be replayed exactly.
    pub random_seed: Option<u32>,
    pub logger: Option<Box<dyn PlayByPlayLogger>>,
    /// One of `"NFL"`, `"NFL_PLAYOFF"`, `"NCAA"`. Defaults to `"NFL"`.
    pub overtime_rules: String,
    /// One of `"NFL"`, `"NCAA"`. Defaults to `"NFL"`.
    pub two_minute_warning_rules: String,
    /// One of `"NFL"`, `"NCAA"`. Defaults to `"NFL"`.
    pub end_of_half_rules: String,
}

impl Default for SimulationOptions {
    fn default() -> SimulationOptions {
        SimulationOptions {
            random_seed: None,
            logger: None,
            overtime_rules: "NFL".to_string(),
            two_minute_warning_rules: "NFL".to_string(),
            end_of_half_rules: "NFL".to_string(),
        }
    }
}

/// The final result of a simulated game.
///
/// Carries the two teams back out (with every [`crate::player::Player`]'s
/// [`crate::player::PlayerStats`] updated in place) rather than a
/// separately-keyed stats table, so a caller already holding a `&Player`
/// from before the call can simply re-read its `stats()`.
pub struct GameResult {
    pub home: Team,
    pub away: Team,
    pub home_score: u32,
    pub away_score: u32,
    pub winner: Option<Possession>,
    pub is_tie: bool,
    pub plays: Vec<Play>,
    pub random_seed: u32,
}

fn validate_roster(team: &Team, label: &'static str) -> Result<(), ConfigError> {
    if team.roster().is_empty() {
        return Err(ConfigError::EmptyRoster { team: label });
    }
    for (position, name) in REQUIRED_POSITIONS {
        if !team.roster().iter().any(|p| p.position() == position) {
            return Err(ConfigError::MissingPosition { team: label, position: name });
        }
    }
    Ok(())
}

/// Simulate a full game between `home` and `away` and return the final
/// result.
///
/// Deterministic in `options.random_seed`: two calls with the same seed,
/// the same rosters, and the same ruleset identifiers produce the same
/// sequence of plays and the same final score.
pub fn simulate_game(home: Team, away: Team, options: SimulationOptions) -> Result<GameResult, ConfigError> {
    validate_roster(&home, "home")?;
    validate_roster(&away, "away")?;

    let overtime_rules = ruleset::overtime_rules_by_name(&options.overtime_rules)?;
    let two_minute_rules = ruleset::two_minute_warning_rules_by_name(&options.two_minute_warning_rules)?;
    let end_of_half_rules = ruleset::end_of_half_rules_by_name(&options.end_of_half_rules)?;

    let seed = options.random_seed.unwrap_or_else(rand::random::<u32>);
    debug!("starting simulation with seed {seed}");
    let mut rng = GameRng::from_seed(seed);

    let home_receives_opening_kickoff = rng.next_double() < 0.5;
    let mut game = Game::new(home, away, seed, home_receives_opening_kickoff);
    let logger = options.logger.as_deref();

    log_play(
        logger,
        format!(
            "Coin toss: {} receive the opening kickoff",
            if home_receives_opening_kickoff { "home" } else { "away" }
        ),
    );

    kickoff_to_start_half(&mut game, &mut rng, logger);

    let mut iterations = 0u32;
    while !game.is_game_over() {
        iterations += 1;
        assert!(iterations < 5_000, "progression loop failed to terminate");

        let clock_applies = game.quarter().quarter_type() != QuarterType::Overtime || overtime_rules.overtime_period_duration() > 0;
        if clock_applies && game.quarter().expired() {
            advance_past_quarter(&mut game, &mut rng, overtime_rules.as_ref(), logger);
            continue;
        }

        play_one_down(
            &mut game,
            &mut rng,
            two_minute_rules.as_ref(),
            overtime_rules.as_ref(),
            end_of_half_rules.as_ref(),
            logger,
        );
    }

    let winner = if game.score(Possession::Home) > game.score(Possession::Away) {
        Some(Possession::Home)
    } else if game.score(Possession::Away) > game.score(Possession::Home) {
        Some(Possession::Away)
    } else {
        None
    };

    Ok(GameResult {
        home_score: game.score(Possession::Home),
        away_score: game.score(Possession::Away),
        winner,
        is_tie: winner.is_none(),
        plays: game.plays().to_vec(),
        random_seed: seed,
        home: game.home().clone(),
        away: game.away().clone(),
    })
}

/// Move past an expired quarter clock: advance to the next quarter,
/// flip for halftime, end regulation, or progress overtime.
fn advance_past_quarter(game: &mut Game, rng: &mut GameRng, overtime_rules: &dyn OvertimeRules, logger: Option<&dyn PlayByPlayLogger>) {
    match game.quarter().quarter_type() {
        QuarterType::First | QuarterType::Third => game.advance_quarter(),
        QuarterType::Second => {
            game.advance_quarter();
            log_play(logger, "Halftime.".to_string());
            game.flip_direction();
            kickoff_to_start_half(game, rng, logger);
        }
        QuarterType::Fourth => {
            if game.score(Possession::Home) != game.score(Possession::Away) {
                game.set_game_over();
            } else {
                log_play(logger, "End of regulation, tied. Overtime.".to_string());
                start_overtime(game, rng, overtime_rules, logger);
            }
        }
        QuarterType::Overtime => {
            let state = game.overtime().expect("overtime quarter always carries overtime state").clone();
            let action = overtime_rules.get_next_possession_action(&state, PossessionChangeReason::PeriodExpired);
            match action {
                NextPossessionAction::NewPeriod => start_new_overtime_period(game, rng, overtime_rules, logger),
                _ => game.set_game_over(),
            }
        }
        QuarterType::GameOver => game.set_game_over(),
    }
}

fn start_overtime(game: &mut Game, rng: &mut GameRng, overtime_rules: &dyn OvertimeRules, logger: Option<&dyn PlayByPlayLogger>) {
    let first_possession_team = if rng.next_double() < 0.5 { Possession::Home } else { Possession::Away };
    let state = OvertimeState::new(first_possession_team, overtime_rules.timeouts_per_team());
    *game.overtime_mut() = Some(state);
    game.reset_timeouts();
    *game.quarter_mut() = Quarter::new(QuarterType::Overtime, overtime_rules.overtime_period_duration());
    log_play(logger, "Overtime period begins.".to_string());
    setup_overtime_possession(game, rng, overtime_rules, logger);
}

/// Start a subsequent overtime period (playoff/collegiate formats only):
/// alternates which team gets first possession and resets the clock.
fn start_new_overtime_period(game: &mut Game, rng: &mut GameRng, overtime_rules: &dyn OvertimeRules, logger: Option<&dyn PlayByPlayLogger>) {
    let previous = game.overtime().expect("new period only starts from an existing overtime state").clone();
    let next_first = previous.first_possession_team.flip();
    let mut state = OvertimeState::new(next_first, overtime_rules.timeouts_per_team());
    state.current_period = previous.current_period + 1;
    *game.overtime_mut() = Some(state);
    game.reset_timeouts();
    *game.quarter_mut() = Quarter::new(QuarterType::Overtime, overtime_rules.overtime_period_duration());
    log_play(logger, format!("Overtime period {} begins.", previous.current_period + 1));
    setup_overtime_possession(game, rng, overtime_rules, logger);
}

fn setup_overtime_possession(game: &mut Game, rng: &mut GameRng, overtime_rules: &dyn OvertimeRules, logger: Option<&dyn PlayByPlayLogger>) {
    let state = game.overtime().expect("overtime possession setup requires overtime state").clone();
    let (down, distance) = overtime_rules.starting_down_and_distance(&state);
    if let Some(spot) = overtime_rules.fixed_starting_field_position(&state) {
        game.set_possession(state.current_possession_team);
        game.set_field_position(spot);
        game.set_down(down);
        game.set_distance(distance);
    } else {
        game.set_possession(state.current_possession_team);
        kickoff_to_start_half(game, rng, logger);
    }
}

fn kickoff_to_start_half(game: &mut Game, rng: &mut GameRng, logger: Option<&dyn PlayByPlayLogger>) {
    let receiving_team = game.possession();
    let kicking_team = receiving_team.flip();
    let kicker = game.team(kicking_team).kicker().ratings().kicking;
    let returner = game
        .team(receiving_team)
        .featured_rusher()
        .or_else(|| game.team(receiving_team).top_receiver())
        .map(|p| (p.ratings().catching, p.ratings().speed))
        .unwrap_or((50, 50));

    let input = KickoffInput {
        possession: kicking_team,
        start_field_position: 35,
        kicker_kicking: kicker,
        returner_catching: returner.0,
        returner_speed: returner.1,
        score_differential: score_differential(game, kicking_team),
    };
    let play = mechanic::kickoff(rng, &input);
    let elapsed = play.common.elapsed_time;
    log_play(logger, format!("Kickoff: {:?}", play.outcome));
    processor::commit_play(game, Play::Kickoff(play));
    game.quarter_mut().elapse(elapsed);
}

fn score_differential(game: &Game, possession: Possession) -> i32 {
    game.score(possession) as i32 - game.score(possession.flip()) as i32
}

fn require<'a>(player: Option<&'a Player>, what: &'static str) -> &'a Player {
    player.unwrap_or_else(|| panic!("roster has no {what} to run this play; an unvalidated roster reached the progression loop"))
}

/// Run a live down, and as many untimed downs as an accepted penalty
/// chains onto it.
///
/// A quarter that expires mid-play doesn't necessarily end: if the play
/// carries an accepted penalty the ruleset doesn't allow a half to end
/// on, one more down is replayed with the clock frozen at zero instead
/// of handing control back to [`simulate_game`]'s quarter-advance check.
/// Capped well above anything a real penalty chain would produce, as a
/// backstop against a pathological run of repeated flags.
fn play_one_down(
    game: &mut Game,
    rng: &mut GameRng,
    two_minute_rules: &dyn TwoMinuteWarningRules,
    overtime_rules: &dyn OvertimeRules,
    end_of_half_rules: &dyn EndOfHalfRules,
    logger: Option<&dyn PlayByPlayLogger>,
) {
    for _ in 0..10 {
        let untimed_down_follows = play_single_down(game, rng, two_minute_rules, overtime_rules, end_of_half_rules, logger);
        if !untimed_down_follows || game.is_game_over() {
            break;
        }
    }
}

/// Run exactly one snap: call the play, run its mechanic, commit the
/// result, and run post-play bookkeeping (two-minute warning, scoring
/// kickoffs, overtime progress). Returns whether the quarter expired on
/// this play but an accepted penalty forces an untimed down to follow.
fn play_single_down(
    game: &mut Game,
    rng: &mut GameRng,
    two_minute_rules: &dyn TwoMinuteWarningRules,
    overtime_rules: &dyn OvertimeRules,
    end_of_half_rules: &dyn EndOfHalfRules,
    logger: Option<&dyn PlayByPlayLogger>,
) -> bool {
    let offense = game.possession();
    let defense = offense.flip();
    let down = game.down();
    let distance = game.distance();
    let field_position = game.field_position();
    let yards_to_goal = 100 - field_position;

    let play = if down == Down::Fourth {
        let ctx = FourthDownContext {
            yards_to_go: distance,
            yards_to_goal,
            score_differential: score_differential(game, offense),
            time_remaining_seconds: game.quarter().time_remaining(),
            quarter_number: game.quarter_number(),
        };
        match FourthDownDecisionEngine::call(rng, &ctx) {
            FourthDownCall::Punt => run_punt(game, rng, offense),
            FourthDownCall::AttemptFieldGoal => run_field_goal(game, rng, offense, yards_to_goal),
            FourthDownCall::GoForIt => {
                let call = if rng.next_double() < 0.5 { PlayCall::Run } else { PlayCall::Pass };
                run_offensive_play(game, rng, offense, down, field_position, call)
            }
        }
    } else {
        let ctx = PlayCallContext {
            quarter_number: game.quarter_number(),
            down,
            time_remaining_seconds: game.quarter().time_remaining(),
            offense_leading: score_differential(game, offense) > 0,
            offense_trailing: score_differential(game, offense) < 0,
            offense_timeouts: game.timeouts(offense),
            clock_running: true,
        };
        let call = PlayCallDecisionEngine::call(rng, &ctx);
        match call {
            PlayCall::Kneel => run_kneel(game, rng, offense, down, field_position),
            PlayCall::Spike => run_spike(game, rng, offense, down, field_position),
            PlayCall::Run | PlayCall::Pass => run_offensive_play(game, rng, offense, down, field_position, call),
        }
    };

    let before = game.quarter().time_remaining();
    log_play(logger, format!("{:?} by {:?}: {} yards", play.play_type(), offense, play.common().yards_gained));
    let elapsed = play.common().elapsed_time;
    accumulate_stats(game, &play, offense, defense);
    processor::commit_play(game, play);
    game.quarter_mut().elapse(elapsed);

    if two_minute_rules.fires_on_crossing(game.quarter_number())
        && !game.quarter().two_minute_warning_called()
        && game.quarter().crossed_two_minutes(before)
    {
        game.quarter_mut().mark_two_minute_warning_called();
        log_play(logger, "Two-minute warning.".to_string());
    }

    let ends_a_half = matches!(game.quarter().quarter_type(), QuarterType::Second | QuarterType::Fourth);
    let mut untimed_down_follows = false;
    if game.quarter().expired() {
        let triggering_play = game.plays().last().expect("a play was just committed");
        untimed_down_follows = blocks_half_from_ending(triggering_play, end_of_half_rules, ends_a_half);

        let triggering_play = game.plays_mut().last_mut().expect("a play was just committed");
        if untimed_down_follows {
            log_play(logger, "Untimed down: accepted penalty keeps the half alive.".to_string());
        } else {
            triggering_play.common_mut().quarter_expired = true;
            triggering_play.common_mut().half_expired = ends_a_half;
        }
    }

    let last = game.plays().last().expect("a play was just committed").clone();
    let is_made_field_goal = matches!(&last, Play::FieldGoal(fg) if fg.made);
    let possession_after_play = game.possession();

    if last.common().is_touchdown {
        let scoring_team = if last.common().possession_change { offense.flip() } else { offense };
        run_conversion(game, rng, scoring_team, logger);
        kickoff_to_start_half(game, rng, logger);
    } else if is_made_field_goal {
        kickoff_to_start_half(game, rng, logger);
    }

    if game.overtime().is_some() {
        let score_type = if last.common().is_touchdown {
            ScoreType::Touchdown
        } else if is_made_field_goal {
            ScoreType::FieldGoal
        } else if last.common().is_safety {
            ScoreType::Safety
        } else {
            ScoreType::None
        };
        let scoring_team = if last.common().possession_change { offense.flip() } else { offense };
        let drive_ended = score_type != ScoreType::None || possession_after_play != offense;
        check_overtime_progress(game, rng, overtime_rules, logger, drive_ended, score_type, scoring_team);
    }

    untimed_down_follows
}

fn run_kneel(game: &mut Game, rng: &mut GameRng, offense: Possession, down: Down, field_position: u8) -> Play {
    let qb = game.team(offense).starting_quarterback();
    let input = RunInput {
        possession: offense,
        down,
        start_field_position: field_position,
        is_kneel: true,
        carrier_rushing: qb.ratings().rushing,
        carrier_strength: qb.ratings().strength,
        carrier_speed: qb.ratings().speed,
        carrier_awareness: qb.ratings().awareness,
        run_blocking: 50,
        run_defense: 50,
        tackler_tackling: 50,
        tackler_awareness: 50,
    };
    Play::Run(mechanic::run(rng, &input))
}

fn run_spike(game: &mut Game, rng: &mut GameRng, offense: Possession, down: Down, field_position: u8) -> Play {
    let qb = game.team(offense).starting_quarterback();
    let input = PassInput {
        possession: offense,
        down,
        start_field_position: field_position,
        is_spike: true,
        passing: qb.ratings().passing,
        pass_protection: 50,
        pass_rush: 50,
        coverage: 50,
        receiver_catching: 50,
        receiver_speed: 50,
        passer_awareness: qb.ratings().awareness,
    };
    Play::Pass(mechanic::pass(rng, &input))
}

fn run_offensive_play(game: &mut Game, rng: &mut GameRng, offense: Possession, down: Down, field_position: u8, call: PlayCall) -> Play {
    match call {
        PlayCall::Pass => throw_the_ball(game, rng, offense, down, field_position),
        _ => run_the_ball(game, rng, offense, down, field_position),
    }
}

fn run_the_ball(game: &mut Game, rng: &mut GameRng, offense: Possession, down: Down, field_position: u8) -> Play {
    let defense = offense.flip();
    let carrier = require(game.team(offense).featured_rusher(), "running back");
    let run_stopper = require(game.team(defense).run_stopper(), "run-stopping defender");
    let input = RunInput {
        possession: offense,
        down,
        start_field_position: field_position,
        is_kneel: false,
        carrier_rushing: carrier.ratings().rushing,
        carrier_strength: carrier.ratings().strength,
        carrier_speed: carrier.ratings().speed,
        carrier_awareness: carrier.ratings().awareness,
        run_blocking: 50,
        run_defense: run_stopper.ratings().tackling,
        tackler_tackling: run_stopper.ratings().tackling,
        tackler_awareness: run_stopper.ratings().awareness,
    };
    Play::Run(mechanic::run(rng, &input))
}

fn throw_the_ball(game: &mut Game, rng: &mut GameRng, offense: Possession, down: Down, field_position: u8) -> Play {
    let defense = offense.flip();
    let qb = game.team(offense).starting_quarterback();
    let receiver = require(game.team(offense).top_receiver(), "receiver");
    let corner = require(game.team(defense).top_cornerback(), "cornerback");
    let rusher = require(game.team(defense).run_stopper(), "pass rusher");
    let input = PassInput {
        possession: offense,
        down,
        start_field_position: field_position,
        is_spike: false,
        passing: qb.ratings().passing,
        pass_protection: 50,
        pass_rush: rusher.ratings().tackling,
        coverage: corner.ratings().coverage,
        receiver_catching: receiver.ratings().catching,
        receiver_speed: receiver.ratings().speed,
        passer_awareness: qb.ratings().awareness,
    };
    Play::Pass(mechanic::pass(rng, &input))
}

fn run_field_goal(game: &mut Game, rng: &mut GameRng, offense: Possession, yards_to_goal: u8) -> Play {
    let defense = offense.flip();
    let kicker = game.team(offense).kicker();
    let snapper = game.team(offense).long_snapper().map(|p| p.ratings().blocking).unwrap_or(50);
    let rusher = game.team(defense).run_stopper().map(|p| p.ratings().tackling).unwrap_or(50);
    let input = FieldGoalInput {
        possession: offense,
        down: Down::Fourth,
        start_field_position: 100 - yards_to_goal,
        distance: yards_to_goal + 17,
        kicking: kicker.ratings().kicking,
        snapper_blocking: snapper,
        rusher,
        blocker: 50,
    };
    Play::FieldGoal(mechanic::field_goal(rng, &input))
}

fn run_punt(game: &mut Game, rng: &mut GameRng, offense: Possession) -> Play {
    let defense = offense.flip();
    let punter = game.team(offense).punter();
    let snapper = game.team(offense).long_snapper().map(|p| p.ratings().blocking).unwrap_or(50);
    let rusher = game.team(defense).run_stopper().map(|p| p.ratings().tackling).unwrap_or(50);
    let returner = game
        .team(defense)
        .featured_rusher()
        .or_else(|| game.team(defense).top_receiver())
        .map(|p| p.ratings().catching)
        .unwrap_or(50);
    let input = PuntInput {
        possession: offense,
        down: Down::Fourth,
        start_field_position: game.field_position(),
        punter_kicking: punter.ratings().kicking,
        snapper_blocking: snapper,
        rusher,
        blocker: 50,
        returner_catching: returner,
    };
    Play::Punt(mechanic::punt(rng, &input))
}

fn run_conversion(game: &mut Game, rng: &mut GameRng, scoring_team: Possession, logger: Option<&dyn PlayByPlayLogger>) {
    game.set_possession(scoring_team);
    match PlayCallDecisionEngine::decide_conversion(rng) {
        ConversionCall::ExtraPoint => {
            let kicker = game.team(scoring_team).kicker();
            let input = FieldGoalInput {
                possession: scoring_team,
                down: Down::None,
                start_field_position: 98,
                distance: 20,
                kicking: kicker.ratings().kicking,
                snapper_blocking: 50,
                rusher: 50,
                blocker: 50,
            };
            let play = mechanic::field_goal(rng, &input);
            if play.made {
                game.add_score(scoring_team, 1);
            }
            log_play(logger, format!("Extra point {}", if play.made { "good" } else { "no good" }));
        }
        ConversionCall::TwoPointConversion => {
            let call = PlayCallDecisionEngine::call_two_point_play(rng);
            let play = run_offensive_play(game, rng, scoring_team, Down::None, 98, call);
            if play.common().end_field_position >= 100 {
                game.add_score(scoring_team, 2);
            }
            log_play(logger, "Two-point conversion attempt".to_string());
        }
    }
    game.set_down(Down::None);
    game.set_distance(0);
}

/// Fold one overtime possession's outcome into the live [`OvertimeState`]
/// and act on what the [`OvertimeRules`] provider says happens next.
///
/// `should_game_end` is always asked before this possession's completion
/// is folded into `state` — its first/second-possession branches are
/// distinguished by whether the *previous* possession(s) already
/// completed, not this one.
fn check_overtime_progress(
    game: &mut Game,
    rng: &mut GameRng,
    overtime_rules: &dyn OvertimeRules,
    logger: Option<&dyn PlayByPlayLogger>,
    drive_ended: bool,
    score_type: ScoreType,
    scoring_team: Possession,
) {
    if !drive_ended {
        return;
    }

    let mut state = game.overtime().expect("overtime progress checked only during overtime").clone();
    let outcome = overtime_rules.should_game_end(&state, score_type, scoring_team);

    if !state.first_possession_complete {
        state.first_possession_complete = true;
        if score_type != ScoreType::None && scoring_team == state.first_possession_team {
            state.first_team_period_score += score_type_points(score_type);
        }
        state.current_possession_team = state.first_possession_team.flip();
    } else if !state.second_possession_complete {
        state.second_possession_complete = true;
        if score_type != ScoreType::None && scoring_team != state.first_possession_team {
            state.second_team_period_score += score_type_points(score_type);
        }
    }

    let mut start_new_period = false;
    match outcome {
        OvertimeOutcome::GameOver | OvertimeOutcome::TieGame => game.set_game_over(),
        OvertimeOutcome::PeriodOver => {
            match overtime_rules.get_next_possession_action(&state, PossessionChangeReason::SecondPossessionEnded) {
                NextPossessionAction::NewPeriod => start_new_period = true,
                NextPossessionAction::GameOver => game.set_game_over(),
                _ => {}
            }
        }
        OvertimeOutcome::Continue => {
            if state.second_possession_complete
                && overtime_rules.get_next_possession_action(&state, PossessionChangeReason::SecondPossessionEnded)
                    == NextPossessionAction::SuddenDeath
            {
                state.is_sudden_death = true;
            }
        }
    }

    log_play(logger, format!("Overtime state: {outcome:?}"));
    *game.overtime_mut() = Some(state);

    if start_new_period && !game.is_game_over() {
        start_new_overtime_period(game, rng, overtime_rules, logger);
    }
}

/// Whether an accepted penalty on `play` keeps a half-ending quarter
/// alive for one more, untimed, down.
fn blocks_half_from_ending(play: &Play, end_of_half_rules: &dyn EndOfHalfRules, ends_a_half: bool) -> bool {
    if !ends_a_half {
        return false;
    }
    let accepted_defensive_penalty = play.common().penalties.iter().any(|p| p.accepted == Some(true) && !p.name.is_offensive());
    let accepted_offensive_penalty = play.common().penalties.iter().any(|p| p.accepted == Some(true) && p.name.is_offensive());
    (accepted_defensive_penalty && !end_of_half_rules.allows_half_to_end_on_defensive_penalty())
        || (accepted_offensive_penalty && !end_of_half_rules.allows_half_to_end_on_offensive_penalty())
}

fn score_type_points(score_type: ScoreType) -> u32 {
    match score_type {
        ScoreType::Touchdown => 6,
        ScoreType::FieldGoal => 3,
        ScoreType::Safety => 2,
        ScoreType::None => 0,
    }
}

/// Increment the relevant participants' [`crate::player::PlayerStats`]
/// counters for a completed play. Looked up by matching ratings back to
/// roster position, since `Player` carries no stable id of its own.
fn accumulate_stats(game: &mut Game, play: &Play, offense: Possession, defense: Possession) {
    match play {
        Play::Run(run) => {
            if run.is_kneel {
                return;
            }
            if let Some(idx) = game.team(offense).featured_rusher().and_then(|p| roster_index(game.team(offense), p)) {
                let stats = game.team_mut(offense).roster_mut()[idx].stats_mut();
                stats.rush_attempts += 1;
                stats.rush_yards += run.common.yards_gained;
                if run.common.is_touchdown {
                    stats.rush_touchdowns += 1;
                }
                if run.common.fumbles.iter().any(|f| f.lost) {
                    stats.fumbles += 1;
                    stats.fumbles_lost += 1;
                } else if !run.common.fumbles.is_empty() {
                    stats.fumbles += 1;
                }
            }
        }
        Play::Pass(pass) => {
            if pass.is_spike {
                return;
            }
            if let Some(idx) = roster_index(game.team(offense), game.team(offense).starting_quarterback()) {
                let stats = game.team_mut(offense).roster_mut()[idx].stats_mut();
                stats.pass_attempts += 1;
                match &pass.segment {
                    crate::game::play_record::PassSegment::Complete { .. } => {
                        stats.pass_completions += 1;
                        stats.pass_yards += pass.common.yards_gained;
                        if pass.common.is_touchdown {
                            stats.pass_touchdowns += 1;
                        }
                    }
                    crate::game::play_record::PassSegment::Intercepted { .. } => {
                        stats.interceptions_thrown += 1;
                    }
                    crate::game::play_record::PassSegment::Sacked { .. } => {
                        stats.sacks_taken += 1;
                    }
                    crate::game::play_record::PassSegment::Incomplete | crate::game::play_record::PassSegment::Spiked => {}
                }
            }
            if matches!(&pass.segment, crate::game::play_record::PassSegment::Complete { .. }) {
                if let Some(idx) = game.team(offense).top_receiver().and_then(|p| roster_index(game.team(offense), p)) {
                    let stats = game.team_mut(offense).roster_mut()[idx].stats_mut();
                    stats.targets += 1;
                    stats.receptions += 1;
                    stats.receiving_yards += pass.common.yards_gained;
                    if pass.common.is_touchdown {
                        stats.receiving_touchdowns += 1;
                    }
                }
            }
        }
        Play::FieldGoal(fg) => {
            if let Some(idx) = roster_index(game.team(offense), game.team(offense).kicker()) {
                let stats = game.team_mut(offense).roster_mut()[idx].stats_mut();
                stats.field_goals_attempted += 1;
                if fg.made {
                    stats.field_goals_made += 1;
                }
            }
        }
        Play::Punt(punt) => {
            if let Some(idx) = roster_index(game.team(offense), game.team(offense).punter()) {
                let stats = game.team_mut(offense).roster_mut()[idx].stats_mut();
                stats.punts += 1;
                stats.punt_yards += punt.common.yards_gained;
            }
            if let crate::game::play_record::PuntOutcome::Returned { return_yards } = punt.outcome {
                let returner = game.team(defense).featured_rusher().or_else(|| game.team(defense).top_receiver());
                if let Some(idx) = returner.and_then(|p| roster_index(game.team(defense), p)) {
                    game.team_mut(defense).roster_mut()[idx].stats_mut().punt_return_yards += return_yards;
                }
            }
        }
        Play::Kickoff(kick) => {
            if let crate::game::play_record::KickoffOutcome::Returned { return_yards } = kick.outcome {
                let returner = game.team(defense).featured_rusher().or_else(|| game.team(defense).top_receiver());
                if let Some(idx) = returner.and_then(|p| roster_index(game.team(defense), p)) {
                    game.team_mut(defense).roster_mut()[idx].stats_mut().kick_return_yards += return_yards;
                }
            }
        }
    }
}

fn roster_index(team: &Team, target: &Player) -> Option<usize> {
    team.roster().iter().position(|p| std::ptr::eq(p, target))
}
