//! Caller-facing errors raised before a simulation starts.
//!
//! Everything that can go wrong *while* a game is being simulated is an
//! engine bug, not a [`ConfigError`] — see the invariant-checking helpers in
//! [`crate::game`] for how those are reported (a panic, never a `Result`).

use thiserror::Error;

/// Reasons [`crate::simulate_game`] can refuse to start a simulation.
///
/// A `ConfigError` is always returned before a single play is simulated;
/// the caller's inputs are rejected wholesale rather than partially
/// processed.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
    /// `overtime_rules`, `two_minute_warning_rules`, or `end_of_half_rules`
    /// named an identifier outside the supported closed set.
    #[error("unknown {family} ruleset identifier: {identifier}")]
    UnknownRuleset {
        family: &'static str,
        identifier: String,
    },

    /// A team's roster had zero players.
    #[error("{team} roster is empty")]
    EmptyRoster { team: &'static str },

    /// A team's roster was missing a position required to kick off a game
    /// (at minimum a quarterback, a kicker, and a punter).
    #[error("{team} roster has no player at position {position}")]
    MissingPosition {
        team: &'static str,
        position: &'static str,
    },
}
