//! Quarter/half clock bookkeeping.

use serde::{Deserialize, Serialize};

/// Which quarter (or overtime) is currently live.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum QuarterType {
    First,
    Second,
    Third,
    Fourth,
    Overtime,
    GameOver,
}

/// Which half is currently live.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum HalfType {
    First,
    Second,
    GameOver,
}

/// Default quarter length in seconds (15 minutes).
pub const DEFAULT_QUARTER_SECONDS: u32 = 900;

/// A single quarter (or overtime period)'s game clock.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Quarter {
    quarter_type: QuarterType,
    max_duration: u32,
    time_remaining_seconds: f64,
    two_minute_warning_called: bool,
}

impl Quarter {
    pub fn new(quarter_type: QuarterType, max_duration: u32) -> Quarter {
        Quarter {
            quarter_type,
            max_duration,
            time_remaining_seconds: max_duration as f64,
            two_minute_warning_called: false,
        }
    }

    pub fn quarter_type(&self) -> QuarterType {
        self.quarter_type
    }

    pub fn max_duration(&self) -> u32 {
        self.max_duration
    }

    /// Seconds left in the quarter, rounded to the nearest whole second
    /// for display and boundary checks. [`Quarter::elapse`] accumulates
    /// the exact fractional remainder internally, so repeated calls never
    /// lose time to rounding the way decrementing a `u32` each play would.
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining_seconds.max(0.0).round() as u32
    }

    pub fn two_minute_warning_called(&self) -> bool {
        self.two_minute_warning_called
    }

    pub fn mark_two_minute_warning_called(&mut self) {
        self.two_minute_warning_called = true;
    }

    /// Decrement the clock by `seconds`, floored at zero. Returns the
    /// (rounded) clock value from *before* this play so callers can
    /// detect a two-minute-warning crossing.
    pub fn elapse(&mut self, seconds: f64) -> u32 {
        let before = self.time_remaining();
        self.time_remaining_seconds = (self.time_remaining_seconds - seconds.max(0.0)).max(0.0);
        before
    }

    pub fn expired(&self) -> bool {
        self.time_remaining_seconds <= 0.0
    }

    /// Whether this play's elapsed time crossed the 120-second mark.
    pub fn crossed_two_minutes(&self, before: u32) -> bool {
        before > 120 && self.time_remaining() <= 120
    }
}
