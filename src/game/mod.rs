//! The game-progression engine: the deterministic state machine that
//! advances a football game one play at a time.

pub mod clock;
pub mod decision;
pub mod mechanic;
pub mod play_record;
pub mod processor;
pub mod progression;
pub mod ruleset;
pub mod skill;

use serde::{Deserialize, Serialize};

use crate::game::clock::{HalfType, Quarter, QuarterType, DEFAULT_QUARTER_SECONDS};
use crate::game::play_record::{Down, Play};
use crate::game::ruleset::OvertimeState;
use crate::player::Position;
use crate::team::Team;

pub use progression::{simulate_game, GameResult, PlayByPlayLogger, SimulationOptions};

/// Which team currently has the ball.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Possession {
    Home,
    Away,
}

impl Possession {
    pub fn flip(self) -> Possession {
        match self {
            Possession::Home => Possession::Away,
            Possession::Away => Possession::Home,
        }
    }
}

/// Panics with a message describing the violated invariant and the
/// offending state. Always runs, in debug and release builds alike — an
/// invariant violation is an engine bug, never something a caller can
/// recover from by inspecting a `Result`.
macro_rules! assert_invariant {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            panic!($($arg)*);
        }
    };
}
pub(crate) use assert_invariant;

/// The state of a single football game in progress (or finished).
///
/// Owns both teams, the full play log, and the clock/score/possession
/// state a play mechanic or decision engine needs to act. `Game` never
/// spawns threads or touches the filesystem; every method here is a plain
/// synchronous state transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    home: Team,
    away: Team,
    plays: Vec<Play>,
    field_position: u8,
    down: Down,
    distance: u8,
    possession: Possession,
    home_score: u32,
    away_score: u32,
    home_timeouts: u8,
    away_timeouts: u8,
    seed: u32,
    quarter: Quarter,
    quarter_number: u8,
    half: HalfType,
    home_positive_direction: bool,
    home_received_opening_kickoff: bool,
    overtime: Option<OvertimeState>,
    game_over: bool,
}

impl Game {
    pub fn new(home: Team, away: Team, seed: u32, home_receives_opening_kickoff: bool) -> Game {
        Game {
            home,
            away,
            plays: Vec::new(),
            field_position: 35,
            down: Down::None,
            distance: 10,
            possession: if home_receives_opening_kickoff {
                Possession::Home
            } else {
                Possession::Away
            },
            home_score: 0,
            away_score: 0,
            home_timeouts: 3,
            away_timeouts: 3,
            seed,
            quarter: Quarter::new(QuarterType::First, DEFAULT_QUARTER_SECONDS),
            quarter_number: 1,
            half: HalfType::First,
            home_positive_direction: true,
            home_received_opening_kickoff: home_receives_opening_kickoff,
            overtime: None,
            game_over: false,
        }
    }

    pub fn home(&self) -> &Team {
        &self.home
    }

    pub fn away(&self) -> &Team {
        &self.away
    }

    pub fn home_mut(&mut self) -> &mut Team {
        &mut self.home
    }

    pub fn away_mut(&mut self) -> &mut Team {
        &mut self.away
    }

    pub fn team(&self, possession: Possession) -> &Team {
        match possession {
            Possession::Home => &self.home,
            Possession::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, possession: Possession) -> &mut Team {
        match possession {
            Possession::Home => &mut self.home,
            Possession::Away => &mut self.away,
        }
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn plays_mut(&mut self) -> &mut [Play] {
        &mut self.plays
    }

    pub fn push_play(&mut self, play: Play) {
        self.plays.push(play);
    }

    pub fn field_position(&self) -> u8 {
        self.field_position
    }

    pub fn set_field_position(&mut self, field_position: u8) {
        assert_invariant!(
            field_position <= 100,
            "field position out of bounds: {field_position}"
        );
        self.field_position = field_position;
    }

    pub fn down(&self) -> Down {
        self.down
    }

    pub fn set_down(&mut self, down: Down) {
        self.down = down;
    }

    pub fn distance(&self) -> u8 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: u8) {
        assert_invariant!(
            self.down == Down::None || distance >= 1,
            "yards to go must be >= 1 when a down is live: {distance}"
        );
        self.distance = distance;
    }

    pub fn possession(&self) -> Possession {
        self.possession
    }

    pub fn set_possession(&mut self, possession: Possession) {
        self.possession = possession;
    }

    pub fn score(&self, possession: Possession) -> u32 {
        match possession {
            Possession::Home => self.home_score,
            Possession::Away => self.away_score,
        }
    }

    pub fn add_score(&mut self, possession: Possession, points: u32) {
        match possession {
            Possession::Home => self.home_score += points,
            Possession::Away => self.away_score += points,
        }
        assert_invariant!(self.home_score < 500 && self.away_score < 500, "implausible score growth");
    }

    pub fn timeouts(&self, possession: Possession) -> u8 {
        match possession {
            Possession::Home => self.home_timeouts,
            Possession::Away => self.away_timeouts,
        }
    }

    pub fn use_timeout(&mut self, possession: Possession) {
        match possession {
            Possession::Home => self.home_timeouts = self.home_timeouts.saturating_sub(1),
            Possession::Away => self.away_timeouts = self.away_timeouts.saturating_sub(1),
        }
    }

    pub fn reset_timeouts(&mut self) {
        self.home_timeouts = 3;
        self.away_timeouts = 3;
    }

    pub fn quarter(&self) -> &Quarter {
        &self.quarter
    }

    pub fn quarter_mut(&mut self) -> &mut Quarter {
        &mut self.quarter
    }

    pub fn quarter_number(&self) -> u8 {
        self.quarter_number
    }

    pub fn half(&self) -> HalfType {
        self.half
    }

    pub fn set_half(&mut self, half: HalfType) {
        self.half = half;
        if half == HalfType::GameOver {
            self.game_over = true;
        }
    }

    /// Advance to the next quarter/half/overtime period. Resets timeouts
    /// at halftime, as the rulebook requires.
    pub fn advance_quarter(&mut self) {
        let next_number = self.quarter_number + 1;
        let (quarter_type, duration, half) = match next_number {
            2 => (QuarterType::Second, DEFAULT_QUARTER_SECONDS, HalfType::First),
            3 => (QuarterType::Third, DEFAULT_QUARTER_SECONDS, HalfType::Second),
            4 => (QuarterType::Fourth, DEFAULT_QUARTER_SECONDS, HalfType::Second),
            _ => {
                self.game_over = true;
                self.half = HalfType::GameOver;
                self.quarter = Quarter::new(QuarterType::GameOver, 0);
                self.quarter_number = next_number;
                return;
            }
        };
        if half == HalfType::First && self.half == HalfType::Second {
            // shouldn't happen; halves only move forward
        }
        if next_number == 3 {
            self.reset_timeouts();
        }
        self.quarter_number = next_number;
        self.half = half;
        self.quarter = Quarter::new(quarter_type, duration);
    }

    pub fn home_positive_direction(&self) -> bool {
        self.home_positive_direction
    }

    pub fn flip_direction(&mut self) {
        self.home_positive_direction = !self.home_positive_direction;
    }

    pub fn home_received_opening_kickoff(&self) -> bool {
        self.home_received_opening_kickoff
    }

    pub fn overtime(&self) -> Option<&OvertimeState> {
        self.overtime.as_ref()
    }

    pub fn overtime_mut(&mut self) -> &mut Option<OvertimeState> {
        &mut self.overtime
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn set_game_over(&mut self) {
        self.game_over = true;
        self.half = HalfType::GameOver;
    }

    /// Yards to the possessing team's opponent's goal line, i.e. `100 -
    /// field_position`. Used throughout decision engines and mechanics as
    /// "distance to the end zone."
    pub fn yards_to_goal(&self) -> u8 {
        100 - self.field_position
    }

    fn run_invariants(&self) {
        assert_invariant!(self.field_position <= 100, "field position out of [0, 100]");
        assert_invariant!(
            self.down == Down::None || self.distance >= 1,
            "yards to go < 1 with a live down"
        );
    }

    /// Validate every documented `Game` invariant. Called by the
    /// progression loop after every committed play.
    pub fn check_invariants(&self) {
        self.run_invariants();
    }
}

/// Roster requirements a team must satisfy before a game can start.
pub(crate) const REQUIRED_POSITIONS: [(Position, &str); 3] =
    [(Position::Qb, "QB"), (Position::K, "K"), (Position::P, "P")];
