//! Teams and the roster-derived personnel lookups mechanics use to decide
//! which player's ratings drive a given skill check.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::player::{Player, Position};

/// Highest-rated player in `players`, first-listed wins a tie.
///
/// `Iterator::max_by_key` keeps the *last* maximum on a tie, the opposite
/// of what roster-order tie-breaking needs, so personnel lookups go
/// through this instead.
fn best_by<'a>(players: impl Iterator<Item = &'a Player>, rating: impl Fn(&Player) -> u8) -> Option<&'a Player> {
    let mut best: Option<(&Player, u8)> = None;
    for player in players {
        let score = rating(player);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((player, score));
        }
    }
    best.map(|(player, _)| player)
}

/// `Team` before its roster has been validated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamRaw {
    pub city: String,
    pub name: String,
    pub short_name: String,
    pub roster: Vec<Player>,
}

impl TeamRaw {
    pub fn validate(&self) -> Result<(), String> {
        if self.short_name.len() > 4 {
            return Err(format!(
                "team short name is longer than 4 characters: {}",
                self.short_name
            ));
        }
        if self.roster.is_empty() {
            return Err(format!("{} roster is empty", self.name));
        }
        for position in [Position::Qb, Position::K, Position::P] {
            if !self.roster.iter().any(|p| p.position() == position) {
                return Err(format!(
                    "{} roster has no player at position {}",
                    self.name, position
                ));
            }
        }
        Ok(())
    }
}

/// A football team: identity plus an ordered roster.
///
/// `Team` carries no aggregate offense/defense ratings of its own — every
/// skill check that needs "the team's passing ability" or similar instead
/// asks `Team` for the specific player who'd be on the field for that
/// check (see [`Team::starting_quarterback`] and friends) and reads that
/// player's [`crate::player::Ratings`] directly. The lookups below are
/// pure functions of roster order; they never cache or mutate anything.
#[derive(Clone, Debug, Serialize)]
pub struct Team {
    city: String,
    name: String,
    short_name: String,
    roster: Vec<Player>,
}

impl TryFrom<TeamRaw> for Team {
    type Error = String;

    fn try_from(raw: TeamRaw) -> Result<Self, Self::Error> {
        raw.validate()?;
        Ok(Team {
            city: raw.city,
            name: raw.name,
            short_name: raw.short_name,
            roster: raw.roster,
        })
    }
}

impl<'de> Deserialize<'de> for Team {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = TeamRaw::deserialize(deserializer)?;
        Team::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Team {
    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.name)
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Vec<Player> {
        &mut self.roster
    }

    /// Players at a given position, in roster order.
    pub fn players_at(&self, position: Position) -> Vec<&Player> {
        self.roster
            .iter()
            .filter(|p| p.position() == position)
            .collect()
    }

    /// Best-rated player at `position`, roster order breaking ties so the
    /// first-listed player wins rather than the last.
    fn best_at(&self, position: Position, rating: impl Fn(&Player) -> u8) -> Option<&Player> {
        best_by(self.players_at(position).into_iter(), rating)
    }

    /// First quarterback on the roster ranked by passing rating; this is
    /// the player every pass play and play-calling decision is attributed
    /// to.
    ///
    /// Panics if the roster has no quarterback — a roster without one
    /// should never have passed validation when the `Team` was built.
    pub fn starting_quarterback(&self) -> &Player {
        self.best_at(Position::Qb, |p| p.ratings().passing)
            .expect("validated roster always has a quarterback")
    }

    /// Best rushing back on the roster (running back or fullback).
    pub fn featured_rusher(&self) -> Option<&Player> {
        best_by(
            self.roster.iter().filter(|p| matches!(p.position(), Position::Rb | Position::Fb)),
            |p| p.ratings().rushing,
        )
    }

    /// Best-catching eligible receiver (wide receiver, tight end, or back).
    pub fn top_receiver(&self) -> Option<&Player> {
        best_by(
            self.roster.iter().filter(|p| {
                matches!(
                    p.position(),
                    Position::Wr | Position::Te | Position::Rb | Position::Fb
                )
            }),
            |p| p.ratings().catching,
        )
    }

    /// Best cornerback on the roster, used for pass-coverage checks.
    pub fn top_cornerback(&self) -> Option<&Player> {
        self.best_at(Position::Cb, |p| p.ratings().coverage)
    }

    /// Best-tackling front-seven defender, used for run-stop checks.
    pub fn run_stopper(&self) -> Option<&Player> {
        best_by(
            self.roster
                .iter()
                .filter(|p| matches!(p.position(), Position::Dt | Position::De | Position::Lb | Position::Olb)),
            |p| p.ratings().tackling,
        )
    }

    /// The kicker on the roster.
    ///
    /// Panics if the roster has no kicker, which validation rules out.
    pub fn kicker(&self) -> &Player {
        self.best_at(Position::K, |p| p.ratings().kicking)
            .expect("validated roster always has a kicker")
    }

    /// The punter on the roster.
    ///
    /// Panics if the roster has no punter, which validation rules out.
    pub fn punter(&self) -> &Player {
        self.best_at(Position::P, |p| p.ratings().kicking)
            .expect("validated roster always has a punter")
    }

    /// The long snapper, if the roster carries one as a dedicated
    /// position; otherwise the best-blocking center stands in.
    pub fn long_snapper(&self) -> Option<&Player> {
        self.best_at(Position::Ls, |p| p.ratings().awareness)
            .or_else(|| self.best_at(Position::C, |p| p.ratings().blocking))
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name(), self.short_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Ratings;

    fn sample_team() -> Team {
        let roster = vec![
            Player::new("Joe", "Quarterback", Position::Qb, Ratings::average()),
            Player::new("Ray", "Kicker", Position::K, Ratings::average()),
            Player::new("Pat", "Punter", Position::P, Ratings::average()),
            Player::new("Gus", "Runner", Position::Rb, Ratings::average()),
        ];
        let raw = TeamRaw {
            city: "Testville".into(),
            name: "Testers".into(),
            short_name: "TST".into(),
            roster,
        };
        Team::try_from(raw).unwrap()
    }

    #[test]
    fn rejects_roster_missing_required_position() {
        let raw = TeamRaw {
            city: "Testville".into(),
            name: "Testers".into(),
            short_name: "TST".into(),
            roster: vec![Player::new("Joe", "Qb", Position::Qb, Ratings::average())],
        };
        assert!(Team::try_from(raw).is_err());
    }

    #[test]
    fn rejects_long_short_name() {
        let mut raw = TeamRaw {
            city: "Testville".into(),
            name: "Testers".into(),
            short_name: "TOOLONG".into(),
            roster: vec![
                Player::new("Joe", "Qb", Position::Qb, Ratings::average()),
                Player::new("Ray", "K", Position::K, Ratings::average()),
                Player::new("Pat", "P", Position::P, Ratings::average()),
            ],
        };
        assert!(Team::try_from(raw.clone()).is_err());
        raw.short_name = "TST".into();
        assert!(Team::try_from(raw).is_ok());
    }

    #[test]
    fn tied_ratings_break_toward_the_first_listed_player() {
        let roster = vec![
            Player::new("Joe", "Quarterback", Position::Qb, Ratings::average()),
            Player::new("First", "Kicker", Position::K, Ratings::average()),
            Player::new("Second", "Kicker", Position::K, Ratings::average()),
            Player::new("Pat", "Punter", Position::P, Ratings::average()),
        ];
        let raw = TeamRaw {
            city: "Testville".into(),
            name: "Testers".into(),
            short_name: "TST".into(),
            roster,
        };
        let team = Team::try_from(raw).unwrap();
        assert_eq!(team.kicker().last_name(), "Kicker");
        assert_eq!(team.kicker().first_name(), "First");
    }

    #[test]
    fn personnel_lookups_find_expected_players() {
        let team = sample_team();
        assert_eq!(team.starting_quarterback().last_name(), "Quarterback");
        assert_eq!(team.kicker().last_name(), "Kicker");
        assert_eq!(team.punter().last_name(), "Punter");
        assert_eq!(team.featured_rusher().unwrap().last_name(), "Runner");
    }

    #[test]
    fn team_round_trips_through_json() {
        let team = sample_team();
        let json = serde_json::to_string(&team).unwrap();
        let restored: Team = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.full_name(), team.full_name());
        assert_eq!(restored.roster().len(), team.roster().len());
        assert_eq!(restored.kicker().last_name(), team.kicker().last_name());
    }

    #[test]
    fn json_roster_missing_a_required_position_is_rejected_at_deserialize() {
        let json = r#"{
            "city": "Testville",
            "name": "Testers",
            "short_name": "TST",
            "roster": [
                {"first_name": "Solo", "last_name": "Player", "position": "Wr", "ratings": {
                    "speed": 50, "strength": 50, "agility": 50, "awareness": 50, "catching": 50,
                    "passing": 50, "rushing": 50, "blocking": 50, "tackling": 50, "coverage": 50,
                    "kicking": 50
                }}
            ]
        }"#;
        let result: Result<Team, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
