//! Players, their attribute ratings, and the statistics bag the engine
//! mutates as a game is played out.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Closed set of position codes a [`Player`] may carry.
///
/// Play mechanics and personnel lookups (see [`crate::team::Team`]) match
/// on this enum rather than a free-form string, so a roster built by a
/// caller can never name a position the engine doesn't know how to use.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Position {
    Qb,
    Rb,
    Fb,
    Wr,
    Te,
    C,
    G,
    T,
    Dt,
    De,
    Lb,
    Olb,
    Cb,
    S,
    Fs,
    K,
    P,
    Ls,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Fb => "FB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::C => "C",
            Position::G => "G",
            Position::T => "T",
            Position::Dt => "DT",
            Position::De => "DE",
            Position::Lb => "LB",
            Position::Olb => "OLB",
            Position::Cb => "CB",
            Position::S => "S",
            Position::Fs => "FS",
            Position::K => "K",
            Position::P => "P",
            Position::Ls => "LS",
        };
        f.write_str(code)
    }
}

/// A player's attribute ratings, each an integer in the canonical range
/// `0..=100`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    pub speed: u8,
    pub strength: u8,
    pub agility: u8,
    pub awareness: u8,
    pub catching: u8,
    pub passing: u8,
    pub rushing: u8,
    pub blocking: u8,
    pub tackling: u8,
    pub coverage: u8,
    pub kicking: u8,
}

impl Ratings {
    /// All ratings set to the league-average baseline (50).
    ///
    /// ### Example
    /// ```
    /// use gridiron_sim_core::player::Ratings;
    ///
    /// let r = Ratings::average();
    /// assert_eq!(r.speed, 50);
    /// ```
    pub fn average() -> Ratings {
        Ratings {
            speed: 50,
            strength: 50,
            agility: 50,
            awareness: 50,
            catching: 50,
            passing: 50,
            rushing: 50,
            blocking: 50,
            tackling: 50,
            coverage: 50,
            kicking: 50,
        }
    }

    fn validate(&self) -> Result<(), String> {
        // All fields are u8 so the upper bound of 100 is the only thing to
        // check; the type system already rules out negatives.
        let fields: [(&str, u8); 11] = [
            ("speed", self.speed),
            ("strength", self.strength),
            ("agility", self.agility),
            ("awareness", self.awareness),
            ("catching", self.catching),
            ("passing", self.passing),
            ("rushing", self.rushing),
            ("blocking", self.blocking),
            ("tackling", self.tackling),
            ("coverage", self.coverage),
            ("kicking", self.kicking),
        ];
        for (name, value) in fields {
            if value > 100 {
                return Err(format!("{name} rating is out of range [0, 100]: {value}"));
            }
        }
        Ok(())
    }
}

/// Per-player counters the stats accumulator increments after each play.
///
/// Mirrors the shape of a drive/game-level `PassingStats`/`RushingStats`/
/// `ReceivingStats` split, but kept per player rather than per team, since
/// this is individual statistics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub pass_attempts: u32,
    pub pass_completions: u32,
    pub pass_yards: i32,
    pub pass_touchdowns: u32,
    pub interceptions_thrown: u32,
    pub sacks_taken: u32,
    pub rush_attempts: u32,
    pub rush_yards: i32,
    pub rush_touchdowns: u32,
    pub receptions: u32,
    pub targets: u32,
    pub receiving_yards: i32,
    pub receiving_touchdowns: u32,
    pub fumbles: u32,
    pub fumbles_lost: u32,
    pub tackles: u32,
    pub sacks_made: u32,
    pub interceptions_made: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub extra_points_made: u32,
    pub extra_points_attempted: u32,
    pub punts: u32,
    pub punt_yards: i32,
    pub kick_return_yards: i32,
    pub punt_return_yards: i32,
    pub injuries: u32,
}

/// `Player` before its ratings have been validated.
///
/// Exists purely as the `Deserialize` target so that invalid wire data is
/// rejected at the serde boundary instead of producing a `Player` with an
/// out-of-range rating that skill checks would then silently misbehave on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRaw {
    pub first_name: String,
    pub last_name: String,
    pub position: Position,
    pub ratings: Ratings,
}

impl PlayerRaw {
    pub fn validate(&self) -> Result<(), String> {
        self.ratings.validate()
    }
}

/// A player on a team's roster.
///
/// Created once from roster input and never destroyed during a game; the
/// only mutation that happens to a `Player` over a game's lifetime is to
/// its [`PlayerStats`] bag, via the stats accumulator.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    first_name: String,
    last_name: String,
    position: Position,
    ratings: Ratings,
    stats: PlayerStats,
}

impl TryFrom<PlayerRaw> for Player {
    type Error = String;

    fn try_from(raw: PlayerRaw) -> Result<Self, Self::Error> {
        raw.validate()?;
        Ok(Player {
            first_name: raw.first_name,
            last_name: raw.last_name,
            position: raw.position,
            ratings: raw.ratings,
            stats: PlayerStats::default(),
        })
    }
}

impl<'de> Deserialize<'de> for Player {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = PlayerRaw::deserialize(deserializer)?;
        Player::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Player {
    /// Construct a player directly from validated parts, bypassing the
    /// `Raw`/`TryFrom` boundary.
    ///
    /// ### Example
    /// ```
    /// use gridiron_sim_core::player::{Player, Position, Ratings};
    ///
    /// let qb = Player::new("Tom", "Brady", Position::Qb, Ratings::average());
    /// assert_eq!(qb.position(), Position::Qb);
    /// ```
    pub fn new(first_name: &str, last_name: &str, position: Position, ratings: Ratings) -> Player {
        Player {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            position,
            ratings,
            stats: PlayerStats::default(),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn ratings(&self) -> &Ratings {
        &self.ratings
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// Mutably borrow the stats bag; used exclusively by the stats
    /// accumulator (see [`crate::stat`]).
    pub fn stats_mut(&mut self) -> &mut PlayerStats {
        &mut self.stats
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name(), self.position)
    }
}
