//! The `Play` record: a tagged sum type rather than a class hierarchy, so
//! mechanics and the play-result processor dispatch on the tag instead of
//! on virtual dispatch.

use serde::{Deserialize, Serialize};

use crate::game::Possession;

/// Down at the time a play was run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Down {
    First,
    Second,
    Third,
    Fourth,
    None,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayType {
    Run,
    Pass,
    FieldGoal,
    Punt,
    Kickoff,
    Spike,
    Kneel,
}

/// The closed set of penalties the engine knows how to enforce.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PenaltyName {
    DefensiveHolding,
    RoughingThePasser,
    PassInterference,
    RoughingTheKicker,
    OffensiveHolding,
    FalseStart,
    DelayOfGame,
    Unsportsmanlike,
}

impl PenaltyName {
    /// Defensive penalties in this fixed enumeration that always carry an
    /// automatic first down for the offense when accepted.
    pub fn is_automatic_first_down(self) -> bool {
        matches!(
            self,
            PenaltyName::DefensiveHolding
                | PenaltyName::RoughingThePasser
                | PenaltyName::PassInterference
                | PenaltyName::RoughingTheKicker
        )
    }

    pub fn yards(self) -> u8 {
        match self {
            PenaltyName::DefensiveHolding => 5,
            PenaltyName::RoughingThePasser => 15,
            PenaltyName::PassInterference => 15,
            PenaltyName::RoughingTheKicker => 15,
            PenaltyName::OffensiveHolding => 10,
            PenaltyName::FalseStart => 5,
            PenaltyName::DelayOfGame => 5,
            PenaltyName::Unsportsmanlike => 15,
        }
    }

    /// Whether this is flagged against the offense (vs. the defense).
    pub fn is_offensive(self) -> bool {
        matches!(
            self,
            PenaltyName::OffensiveHolding
                | PenaltyName::FalseStart
                | PenaltyName::DelayOfGame
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PenaltyTiming {
    Before,
    During,
    After,
}

/// A penalty flagged on a play, pending the `PenaltyDecisionEngine`'s
/// accept/decline call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Penalty {
    pub name: PenaltyName,
    pub called_on: Possession,
    pub occurred_when: PenaltyTiming,
    pub accepted: Option<bool>,
}

impl Penalty {
    pub fn new(name: PenaltyName, called_on: Possession, occurred_when: PenaltyTiming) -> Penalty {
        Penalty {
            name,
            called_on,
            occurred_when,
            accepted: None,
        }
    }
}

/// A fumble that occurred during a play.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Fumble {
    pub lost: bool,
    pub recovered_by: Possession,
    pub return_yards: i32,
}

/// How a completed, intercepted, sacked, or spiked pass resolved.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum PassSegment {
    Complete { air_yards: i32, yards_after_catch: i32 },
    Incomplete,
    Intercepted { return_yards: i32 },
    Sacked { yards_lost: i32 },
    Spiked,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum FieldGoalMiss {
    WideRight,
    WideLeft,
    Short,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum PuntOutcome {
    Blocked,
    OutOfBounds,
    FairCatch,
    Downed,
    Muffed { return_yards: i32 },
    Returned { return_yards: i32 },
    Touchback,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum KickoffOutcome {
    Touchback,
    OutOfBounds,
    FairCatch,
    Muffed { return_yards: i32 },
    Returned { return_yards: i32 },
    OnsideRecoveredByKickingTeam,
    OnsideRecoveredByReceivingTeam,
}

/// Fields every play variant carries regardless of type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayCommon {
    pub possession: Possession,
    pub down: Down,
    pub play_type: PlayType,
    pub yards_gained: i32,
    pub start_field_position: u8,
    pub end_field_position: u8,
    pub elapsed_time: f64,
    pub good_snap: bool,
    pub clock_stopped: bool,
    pub possession_change: bool,
    pub is_touchdown: bool,
    pub is_safety: bool,
    pub is_two_point_conversion: bool,
    pub interception: bool,
    pub penalties: Vec<Penalty>,
    pub fumbles: Vec<Fumble>,
    /// Always empty: injury generation is out of scope for this engine.
    /// The field exists so a future extension can populate it without an
    /// API break.
    pub injuries: Vec<()>,
    pub quarter_expired: bool,
    pub half_expired: bool,
    /// Set by penalty enforcement when an accepted penalty grants the
    /// offense a first down regardless of yards gained.
    pub automatic_first_down: bool,
}

impl PlayCommon {
    pub fn new(possession: Possession, down: Down, play_type: PlayType, start_field_position: u8) -> PlayCommon {
        PlayCommon {
            possession,
            down,
            play_type,
            yards_gained: 0,
            start_field_position,
            end_field_position: start_field_position,
            elapsed_time: 0.0,
            good_snap: true,
            clock_stopped: false,
            possession_change: false,
            is_touchdown: false,
            is_safety: false,
            is_two_point_conversion: false,
            interception: false,
            penalties: Vec::new(),
            fumbles: Vec::new(),
            injuries: Vec::new(),
            quarter_expired: false,
            half_expired: false,
            automatic_first_down: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunPlay {
    pub common: PlayCommon,
    pub is_kneel: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PassPlay {
    pub common: PlayCommon,
    pub is_spike: bool,
    pub segment: PassSegment,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldGoalPlay {
    pub common: PlayCommon,
    pub distance: u8,
    pub blocked: bool,
    pub made: bool,
    pub miss: Option<FieldGoalMiss>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuntPlay {
    pub common: PlayCommon,
    pub outcome: PuntOutcome,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KickoffPlay {
    pub common: PlayCommon,
    pub onside: bool,
    pub outcome: KickoffOutcome,
}

/// A single down's worth of action.
///
/// Variants carry only the fields their play type needs; mechanics and the
/// play-result processor dispatch on the tag rather than on a shared base
/// class.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Play {
    Run(RunPlay),
    Pass(PassPlay),
    FieldGoal(FieldGoalPlay),
    Punt(PuntPlay),
    Kickoff(KickoffPlay),
}

impl Play {
    pub fn common(&self) -> &PlayCommon {
        match self {
            Play::Run(p) => &p.common,
            Play::Pass(p) => &p.common,
            Play::FieldGoal(p) => &p.common,
            Play::Punt(p) => &p.common,
            Play::Kickoff(p) => &p.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut PlayCommon {
        match self {
            Play::Run(p) => &mut p.common,
            Play::Pass(p) => &mut p.common,
            Play::FieldGoal(p) => &mut p.common,
            Play::Punt(p) => &mut p.common,
            Play::Kickoff(p) => &mut p.common,
        }
    }

    pub fn play_type(&self) -> PlayType {
        self.common().play_type
    }
}
