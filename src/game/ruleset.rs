//! Pluggable ruleset policies: overtime format, two-minute warning, and
//! end-of-half penalty extension.
//!
//! Each family is a small trait with a closed set of concrete variants —
//! no open extension mechanism, no dynamic registry. Selecting a variant
//! by name happens once, at [`crate::simulate_game`] entry, via the
//! `*_by_name` constructors below.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::play_record::Down;
use crate::game::Possession;

/// A single overtime possession's record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct OvertimePossession {
    pub period: u32,
    pub team: Possession,
    pub starting_field_position: u8,
    pub points_scored: u32,
}

/// Live state of an overtime period, once the game has entered one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OvertimeState {
    pub current_period: u32,
    pub first_possession_team: Possession,
    pub current_possession_team: Possession,
    pub first_possession_complete: bool,
    pub second_possession_complete: bool,
    pub is_sudden_death: bool,
    pub first_team_period_score: u32,
    pub second_team_period_score: u32,
    pub possessions_in_current_period: u32,
    pub possessions: Vec<OvertimePossession>,
    pub home_timeouts_remaining: u8,
    pub away_timeouts_remaining: u8,
}

impl OvertimeState {
    pub fn new(first_possession_team: Possession, timeouts_per_team: u8) -> OvertimeState {
        OvertimeState {
            current_period: 1,
            first_possession_team,
            current_possession_team: first_possession_team,
            first_possession_complete: false,
            second_possession_complete: false,
            is_sudden_death: false,
            first_team_period_score: 0,
            second_team_period_score: 0,
            possessions_in_current_period: 0,
            possessions: Vec::new(),
            home_timeouts_remaining: timeouts_per_team,
            away_timeouts_remaining: timeouts_per_team,
        }
    }
}

/// What happened at the end of a scoring play, for `ShouldGameEnd`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScoreType {
    Touchdown,
    FieldGoal,
    Safety,
    None,
}

/// `ShouldGameEnd`'s verdict.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OvertimeOutcome {
    Continue,
    GameOver,
    PeriodOver,
    TieGame,
}

/// Why possession is changing, for `GetNextPossessionAction`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PossessionChangeReason {
    FirstPossessionEnded,
    SecondPossessionEnded,
    PeriodExpired,
}

/// What happens to the ball next, per `GetNextPossessionAction`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NextPossessionAction {
    OtherTeamGetsBall,
    SuddenDeath,
    NewPeriod,
    GameOver,
}

/// A pluggable overtime format.
pub trait OvertimeRules {
    fn overtime_period_duration(&self) -> u32;
    fn timeouts_per_team(&self) -> u8;
    fn allows_ties(&self) -> bool;
    /// `0` means unlimited.
    fn max_overtime_periods(&self) -> u32;
    fn has_overtime_coin_toss(&self) -> bool;
    fn uses_kickoff(&self, state: &OvertimeState) -> bool;
    /// `Some(field_position)` if this format starts every possession at a
    /// fixed spot instead of via kickoff.
    fn fixed_starting_field_position(&self, state: &OvertimeState) -> Option<u8>;
    fn starting_down_and_distance(&self, state: &OvertimeState) -> (Down, u8);
    fn should_start_new_period(&self, state: &OvertimeState) -> bool;
    fn should_game_end(
        &self,
        state: &OvertimeState,
        score_type: ScoreType,
        scoring_team: Possession,
    ) -> OvertimeOutcome;
    fn get_next_possession_action(
        &self,
        state: &OvertimeState,
        reason: PossessionChangeReason,
    ) -> NextPossessionAction;
}

/// NFL regular-season overtime: one 10-minute period, first-possession TD
/// wins outright, first-possession FG guarantees the other team a
/// matching chance, ties are allowed.
pub struct NflOvertime;

impl OvertimeRules for NflOvertime {
    fn overtime_period_duration(&self) -> u32 {
        600
    }

    fn timeouts_per_team(&self) -> u8 {
        2
    }

    fn allows_ties(&self) -> bool {
        true
    }

    fn max_overtime_periods(&self) -> u32 {
        1
    }

    fn has_overtime_coin_toss(&self) -> bool {
        true
    }

    fn uses_kickoff(&self, _state: &OvertimeState) -> bool {
        true
    }

    fn fixed_starting_field_position(&self, _state: &OvertimeState) -> Option<u8> {
        None
    }

    fn starting_down_and_distance(&self, _state: &OvertimeState) -> (Down, u8) {
        (Down::First, 10)
    }

    fn should_start_new_period(&self, _state: &OvertimeState) -> bool {
        false
    }

    fn should_game_end(
        &self,
        state: &OvertimeState,
        score_type: ScoreType,
        scoring_team: Possession,
    ) -> OvertimeOutcome {
        if state.is_sudden_death {
            return if score_type == ScoreType::None {
                OvertimeOutcome::Continue
            } else {
                OvertimeOutcome::GameOver
            };
        }
        if !state.first_possession_complete {
            // First possession just ended; a touchdown wins immediately.
            if scoring_team == state.first_possession_team && score_type == ScoreType::Touchdown {
                return OvertimeOutcome::GameOver;
            }
            return OvertimeOutcome::Continue;
        }
        // Second possession just ended.
        if state.first_team_period_score != state.second_team_period_score {
            OvertimeOutcome::GameOver
        } else {
            OvertimeOutcome::Continue
        }
    }

    fn get_next_possession_action(
        &self,
        state: &OvertimeState,
        reason: PossessionChangeReason,
    ) -> NextPossessionAction {
        match reason {
            PossessionChangeReason::FirstPossessionEnded => NextPossessionAction::OtherTeamGetsBall,
            PossessionChangeReason::SecondPossessionEnded => {
                if state.first_team_period_score == state.second_team_period_score {
                    NextPossessionAction::SuddenDeath
                } else {
                    NextPossessionAction::GameOver
                }
            }
            PossessionChangeReason::PeriodExpired => NextPossessionAction::GameOver,
        }
    }
}

/// NFL playoff overtime: same possession rules as regular season, but
/// unlimited 15-minute periods and no ties permitted.
pub struct NflPlayoffOvertime;

impl OvertimeRules for NflPlayoffOvertime {
    fn overtime_period_duration(&self) -> u32 {
        900
    }

    fn timeouts_per_team(&self) -> u8 {
        3
    }

    fn allows_ties(&self) -> bool {
        false
    }

    fn max_overtime_periods(&self) -> u32 {
        0
    }

    fn has_overtime_coin_toss(&self) -> bool {
        true
    }

    fn uses_kickoff(&self, _state: &OvertimeState) -> bool {
        true
    }

    fn fixed_starting_field_position(&self, _state: &OvertimeState) -> Option<u8> {
        None
    }

    fn starting_down_and_distance(&self, _state: &OvertimeState) -> (Down, u8) {
        (Down::First, 10)
    }

    fn should_start_new_period(&self, state: &OvertimeState) -> bool {
        state.first_possession_complete && state.second_possession_complete
    }

    fn should_game_end(
        &self,
        state: &OvertimeState,
        score_type: ScoreType,
        scoring_team: Possession,
    ) -> OvertimeOutcome {
        if state.is_sudden_death {
            return if score_type == ScoreType::None {
                OvertimeOutcome::Continue
            } else {
                OvertimeOutcome::GameOver
            };
        }
        if !state.first_possession_complete {
            if scoring_team == state.first_possession_team && score_type == ScoreType::Touchdown {
                return OvertimeOutcome::GameOver;
            }
            return OvertimeOutcome::Continue;
        }
        if state.first_team_period_score != state.second_team_period_score {
            OvertimeOutcome::GameOver
        } else {
            OvertimeOutcome::PeriodOver
        }
    }

    fn get_next_possession_action(
        &self,
        state: &OvertimeState,
        reason: PossessionChangeReason,
    ) -> NextPossessionAction {
        match reason {
            PossessionChangeReason::FirstPossessionEnded => NextPossessionAction::OtherTeamGetsBall,
            PossessionChangeReason::SecondPossessionEnded => {
                if state.first_team_period_score == state.second_team_period_score {
                    NextPossessionAction::NewPeriod
                } else {
                    NextPossessionAction::GameOver
                }
            }
            PossessionChangeReason::PeriodExpired => NextPossessionAction::NewPeriod,
        }
    }
}

/// Collegiate-style overtime: no kickoff between possessions, every
/// possession starts at a fixed spot (the opponent 25), alternating
/// possessions each form a "period," and the team leading after both
/// teams have had an equal number of possessions wins.
///
/// Not wired into the default ruleset registry's old behavior — it is
/// registered explicitly under `"NCAA"` alongside `"NFL"`/`"NFL_PLAYOFF"`.
pub struct CollegiateOvertime;

const COLLEGIATE_STARTING_FIELD_POSITION: u8 = 75;

impl OvertimeRules for CollegiateOvertime {
    fn overtime_period_duration(&self) -> u32 {
        0
    }

    fn timeouts_per_team(&self) -> u8 {
        3
    }

    fn allows_ties(&self) -> bool {
        false
    }

    fn max_overtime_periods(&self) -> u32 {
        0
    }

    fn has_overtime_coin_toss(&self) -> bool {
        true
    }

    fn uses_kickoff(&self, _state: &OvertimeState) -> bool {
        false
    }

    fn fixed_starting_field_position(&self, _state: &OvertimeState) -> Option<u8> {
        Some(COLLEGIATE_STARTING_FIELD_POSITION)
    }

    fn starting_down_and_distance(&self, _state: &OvertimeState) -> (Down, u8) {
        (Down::First, 10)
    }

    fn should_start_new_period(&self, state: &OvertimeState) -> bool {
        state.first_possession_complete && state.second_possession_complete
    }

    fn should_game_end(
        &self,
        state: &OvertimeState,
        score_type: ScoreType,
        scoring_team: Possession,
    ) -> OvertimeOutcome {
        let _ = scoring_team;
        if !state.second_possession_complete {
            return OvertimeOutcome::Continue;
        }
        if score_type == ScoreType::None && state.first_team_period_score == state.second_team_period_score {
            return OvertimeOutcome::TieGame;
        }
        if state.first_team_period_score == state.second_team_period_score {
            OvertimeOutcome::PeriodOver
        } else {
            OvertimeOutcome::GameOver
        }
    }

    fn get_next_possession_action(
        &self,
        state: &OvertimeState,
        reason: PossessionChangeReason,
    ) -> NextPossessionAction {
        match reason {
            PossessionChangeReason::FirstPossessionEnded => NextPossessionAction::OtherTeamGetsBall,
            PossessionChangeReason::SecondPossessionEnded => {
                if state.first_team_period_score == state.second_team_period_score {
                    NextPossessionAction::NewPeriod
                } else {
                    NextPossessionAction::GameOver
                }
            }
            PossessionChangeReason::PeriodExpired => NextPossessionAction::NewPeriod,
        }
    }
}

/// Build the requested overtime ruleset, or reject an unknown identifier.
pub fn overtime_rules_by_name(name: &str) -> Result<Box<dyn OvertimeRules + Send + Sync>, ConfigError> {
    match name {
        "NFL" => Ok(Box::new(NflOvertime)),
        "NFL_PLAYOFF" => Ok(Box::new(NflPlayoffOvertime)),
        "NCAA" => Ok(Box::new(CollegiateOvertime)),
        other => Err(ConfigError::UnknownRuleset {
            family: "overtime_rules",
            identifier: other.to_string(),
        }),
    }
}

/// Two-minute-warning provider: decides whether a clock crossing from
/// above 120 seconds to at-or-below it fires the warning, once per
/// eligible quarter.
pub trait TwoMinuteWarningRules {
    fn fires_on_crossing(&self, quarter_number: u8) -> bool;
}

pub struct ProfessionalTwoMinuteWarning;

impl TwoMinuteWarningRules for ProfessionalTwoMinuteWarning {
    fn fires_on_crossing(&self, quarter_number: u8) -> bool {
        quarter_number == 2 || quarter_number == 4
    }
}

pub struct CollegiateTwoMinuteWarning;

impl TwoMinuteWarningRules for CollegiateTwoMinuteWarning {
    fn fires_on_crossing(&self, _quarter_number: u8) -> bool {
        false
    }
}

pub fn two_minute_warning_rules_by_name(
    name: &str,
) -> Result<Box<dyn TwoMinuteWarningRules + Send + Sync>, ConfigError> {
    match name {
        "NFL" => Ok(Box::new(ProfessionalTwoMinuteWarning)),
        "NCAA" => Ok(Box::new(CollegiateTwoMinuteWarning)),
        other => Err(ConfigError::UnknownRuleset {
            family: "two_minute_warning_rules",
            identifier: other.to_string(),
        }),
    }
}

/// End-of-half penalty-extension policy.
pub trait EndOfHalfRules {
    fn allows_half_to_end_on_defensive_penalty(&self) -> bool;
    fn allows_half_to_end_on_offensive_penalty(&self) -> bool;
}

pub struct ProfessionalEndOfHalf;

impl EndOfHalfRules for ProfessionalEndOfHalf {
    fn allows_half_to_end_on_defensive_penalty(&self) -> bool {
        false
    }

    fn allows_half_to_end_on_offensive_penalty(&self) -> bool {
        true
    }
}

pub struct CollegiateEndOfHalf;

impl EndOfHalfRules for CollegiateEndOfHalf {
    fn allows_half_to_end_on_defensive_penalty(&self) -> bool {
        false
    }

    fn allows_half_to_end_on_offensive_penalty(&self) -> bool {
        true
    }
}

pub fn end_of_half_rules_by_name(name: &str) -> Result<Box<dyn EndOfHalfRules + Send + Sync>, ConfigError> {
    match name {
        "NFL" => Ok(Box::new(ProfessionalEndOfHalf)),
        "NCAA" => Ok(Box::new(CollegiateEndOfHalf)),
        other => Err(ConfigError::UnknownRuleset {
            family: "end_of_half_rules",
            identifier: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_overtime_identifier_rejected() {
        assert!(overtime_rules_by_name("XFL").is_err());
    }

    #[test]
    fn nfl_overtime_sudden_death_after_matching_field_goals() {
        let rules = NflOvertime;
        let mut state = OvertimeState::new(Possession::Home, 2);
        state.first_possession_complete = true;
        state.first_team_period_score = 3;
        state.second_team_period_score = 3;
        let outcome = rules.should_game_end(&state, ScoreType::FieldGoal, Possession::Away);
        assert_eq!(outcome, OvertimeOutcome::Continue);
        let action =
            rules.get_next_possession_action(&state, PossessionChangeReason::SecondPossessionEnded);
        assert_eq!(action, NextPossessionAction::SuddenDeath);
    }

    #[test]
    fn collegiate_overtime_uses_fixed_field_position_not_kickoff() {
        let rules = CollegiateOvertime;
        let state = OvertimeState::new(Possession::Home, 3);
        assert!(!rules.uses_kickoff(&state));
        assert_eq!(
            rules.fixed_starting_field_position(&state),
            Some(COLLEGIATE_STARTING_FIELD_POSITION)
        );
    }
}
