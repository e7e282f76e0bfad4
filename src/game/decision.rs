//! Decision engines: pure functions from an immutable context plus an RNG
//! to a tagged decision. Never mutate `Game` or `Play` — that's the
//! mechanics' job (see [`crate::game::mechanic`]). Keeping decisions and
//! mechanics in separate layers lets a test replay the same decision
//! through a different mechanic without reaching into engine internals.

use crate::game::play_record::Down;
use crate::rng::RandomSource;

/// Fraction of two-point conversion attempts that are called as a run
/// rather than a pass.
pub const TWO_POINT_RUN_PROBABILITY: f64 = 0.5;

/// Probability `decide_conversion` calls for a two-point try instead of
/// the extra point.
const TWO_POINT_CONVERSION_PROBABILITY: f64 = 0.10;

/// What a [`PlayCallDecisionEngine`] can call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayCall {
    Run,
    Pass,
    Kneel,
    Spike,
}

/// What the offense does after a touchdown.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConversionCall {
    ExtraPoint,
    TwoPointConversion,
}

/// Inputs a [`PlayCallDecisionEngine`] needs to call a play.
#[derive(Clone, Copy, Debug)]
pub struct PlayCallContext {
    pub quarter_number: u8,
    pub down: Down,
    pub time_remaining_seconds: u32,
    pub offense_leading: bool,
    pub offense_trailing: bool,
    pub offense_timeouts: u8,
    pub clock_running: bool,
}

impl PlayCallContext {
    fn downs_remaining(&self) -> u32 {
        match self.down {
            Down::First => 4,
            Down::Second => 3,
            Down::Third => 2,
            Down::Fourth => 1,
            Down::None => 4,
        }
    }
}

/// Calls the play: run, pass, kneel, or spike.
pub struct PlayCallDecisionEngine;

impl PlayCallDecisionEngine {
    /// True in the classic "victory formation" situation: fourth quarter,
    /// leading, any live down, and there isn't enough time left for the
    /// trailing team to get the ball back even if every remaining down
    /// burns the clock.
    pub fn should_kneel(ctx: &PlayCallContext) -> bool {
        ctx.quarter_number == 4
            && ctx.offense_leading
            && !matches!(ctx.down, Down::None)
            && (ctx.downs_remaining() * 40) >= ctx.time_remaining_seconds as u32
    }

    /// True when the offense needs to stop the clock without burning a
    /// timeout: fourth quarter, trailing, under two minutes, no timeouts
    /// left, and the clock is running on an early down.
    pub fn should_spike(ctx: &PlayCallContext) -> bool {
        ctx.quarter_number == 4
            && ctx.offense_trailing
            && ctx.time_remaining_seconds <= 120
            && ctx.offense_timeouts == 0
            && ctx.clock_running
            && matches!(ctx.down, Down::First | Down::Second | Down::Third)
    }

    /// Call the play for this snap.
    pub fn call(rng: &mut impl RandomSource, ctx: &PlayCallContext) -> PlayCall {
        if Self::should_kneel(ctx) {
            return PlayCall::Kneel;
        }
        if Self::should_spike(ctx) {
            return PlayCall::Spike;
        }
        if rng.next_double() < 0.5 {
            PlayCall::Run
        } else {
            PlayCall::Pass
        }
    }

    /// Decide between the extra point and a two-point try after a
    /// touchdown.
    pub fn decide_conversion(rng: &mut impl RandomSource) -> ConversionCall {
        if rng.next_double() < TWO_POINT_CONVERSION_PROBABILITY {
            ConversionCall::TwoPointConversion
        } else {
            ConversionCall::ExtraPoint
        }
    }

    /// Run vs. pass on a two-point try, per [`TWO_POINT_RUN_PROBABILITY`].
    pub fn call_two_point_play(rng: &mut impl RandomSource) -> PlayCall {
        if rng.next_double() < TWO_POINT_RUN_PROBABILITY {
            PlayCall::Run
        } else {
            PlayCall::Pass
        }
    }
}

/// What the offense does on fourth down.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FourthDownCall {
    GoForIt,
    AttemptFieldGoal,
    Punt,
}

/// Inputs a [`FourthDownDecisionEngine`] needs.
#[derive(Clone, Copy, Debug)]
pub struct FourthDownContext {
    pub yards_to_go: u8,
    pub yards_to_goal: u8,
    pub score_differential: i32,
    pub time_remaining_seconds: u32,
    pub quarter_number: u8,
}

impl FourthDownContext {
    fn is_red_zone(&self) -> bool {
        self.yards_to_goal <= 20
    }

    fn is_opponent_territory(&self) -> bool {
        self.yards_to_goal <= 50
    }

    fn is_deep_own_territory(&self) -> bool {
        self.yards_to_goal >= 80
    }

    fn is_trailing(&self) -> bool {
        self.score_differential < 0
    }

    fn is_leading(&self) -> bool {
        self.score_differential > 0
    }

    fn is_trailing_big(&self) -> bool {
        self.score_differential <= -9
    }

    fn is_leading_big(&self) -> bool {
        self.score_differential >= 9
    }

    fn is_late_game(&self) -> bool {
        self.quarter_number == 4 && self.time_remaining_seconds <= 300
    }

    fn is_field_goal_range(&self) -> bool {
        let distance = self.yards_to_goal as u32 + 17;
        distance <= 60
    }

    fn is_chip_shot(&self) -> bool {
        let distance = self.yards_to_goal as u32 + 17;
        distance <= 35
    }
}

/// Decides whether to go for it, kick a field goal, or punt on fourth
/// down.
pub struct FourthDownDecisionEngine;

impl FourthDownDecisionEngine {
    fn base_go_for_it_probability(yards_to_go: u8) -> f64 {
        match yards_to_go {
            1 => 0.65,
            2 => 0.35,
            3 => 0.20,
            4 | 5 => 0.08,
            6..=10 => 0.03,
            _ => 0.01,
        }
    }

    /// The clamped go-for-it probability after every situational modifier.
    pub fn go_for_it_probability(ctx: &FourthDownContext) -> f64 {
        let mut prob = Self::base_go_for_it_probability(ctx.yards_to_go);
        if ctx.is_red_zone() {
            prob += 0.15;
        }
        if ctx.is_opponent_territory() {
            prob += 0.08;
        }
        if ctx.is_deep_own_territory() {
            prob -= 0.15;
        }
        if ctx.is_trailing_big() {
            prob += 0.20;
        } else if ctx.is_trailing() {
            prob += 0.10;
        }
        if ctx.is_leading_big() {
            prob -= 0.15;
        }
        if ctx.is_late_game() {
            if ctx.is_trailing() {
                prob += 0.15;
            } else if ctx.is_leading() {
                prob -= 0.10;
            }
        }
        if ctx.is_chip_shot() {
            prob -= 0.25;
        }
        prob.clamp(0.0, 1.0)
    }

    fn forced_go_for_it(ctx: &FourthDownContext) -> bool {
        (ctx.time_remaining_seconds <= 120 && ctx.score_differential < -7)
            || (ctx.time_remaining_seconds <= 30 && ctx.is_trailing())
    }

    /// Make the fourth-down call.
    pub fn call(rng: &mut impl RandomSource, ctx: &FourthDownContext) -> FourthDownCall {
        if Self::forced_go_for_it(ctx) {
            return FourthDownCall::GoForIt;
        }
        let go_for_it = rng.next_double() < Self::go_for_it_probability(ctx);
        if go_for_it {
            return FourthDownCall::GoForIt;
        }
        if ctx.yards_to_goal <= 35 {
            // Too deep in opponent territory to punt; kick even from
            // outside a comfortable range rather than pin the punt.
            return FourthDownCall::AttemptFieldGoal;
        }
        if ctx.is_field_goal_range() {
            FourthDownCall::AttemptFieldGoal
        } else {
            FourthDownCall::Punt
        }
    }
}

/// What a [`TimeoutDecisionEngine`] can call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeoutCall {
    None,
    StopClock,
    IceKicker,
    AvoidDelayOfGame,
}

/// Inputs a [`TimeoutDecisionEngine`] needs.
#[derive(Clone, Copy, Debug)]
pub struct TimeoutContext {
    pub timeouts_remaining: u8,
    pub is_trailing: bool,
    pub is_leading: bool,
    pub clock_running: bool,
    pub half_time_remaining_seconds: u32,
    pub upcoming_field_goal_distance: Option<u8>,
    pub is_defense: bool,
    pub play_clock_seconds: u32,
}

/// Decides whether either side calls a timeout between plays.
pub struct TimeoutDecisionEngine;

impl TimeoutDecisionEngine {
    pub fn call(rng: &mut impl RandomSource, ctx: &TimeoutContext) -> TimeoutCall {
        if ctx.timeouts_remaining == 0 {
            return TimeoutCall::None;
        }
        if ctx.is_defense {
            if let Some(distance) = ctx.upcoming_field_goal_distance {
                if distance >= 45 && rng.next_double() < 0.30 {
                    return TimeoutCall::IceKicker;
                }
            }
        }
        if (ctx.is_defense || ctx.is_trailing)
            && ctx.clock_running
            && ctx.half_time_remaining_seconds <= 120
            && rng.next_double() < 0.85
        {
            return TimeoutCall::StopClock;
        }
        if ctx.play_clock_seconds <= 3 && rng.next_double() < 0.90 {
            return TimeoutCall::AvoidDelayOfGame;
        }
        TimeoutCall::None
    }
}

/// What the kicking team does on a kickoff.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KickoffCall {
    NormalKickoff,
    OnsideKick,
}

/// Inputs an [`OnsideKickDecisionEngine`] needs.
#[derive(Clone, Copy, Debug)]
pub struct OnsideKickContext {
    pub score_differential: i32,
}

impl OnsideKickContext {
    fn is_trailing_by_one_score(&self) -> bool {
        self.score_differential <= -7
    }
}

/// Decides whether the kicking team attempts an onside kick.
///
/// Must not consume the RNG unless the trailing precondition holds —
/// callers rely on that to keep replay deterministic when an onside kick
/// is never even a possibility for this team/score state.
pub struct OnsideKickDecisionEngine;

impl OnsideKickDecisionEngine {
    pub fn call(rng: &mut impl RandomSource, ctx: &OnsideKickContext) -> KickoffCall {
        if !ctx.is_trailing_by_one_score() {
            return KickoffCall::NormalKickoff;
        }
        if rng.next_double() < 0.05 {
            KickoffCall::OnsideKick
        } else {
            KickoffCall::NormalKickoff
        }
    }
}

/// Inputs a [`FairCatchDecisionEngine`] needs.
#[derive(Clone, Copy, Debug)]
pub struct FairCatchContext {
    pub hang_time_seconds: f64,
    pub landing_yards_to_own_goal: u8,
    pub is_kickoff: bool,
}

/// Decides whether a returner calls for a fair catch.
pub struct FairCatchDecisionEngine;

impl FairCatchDecisionEngine {
    pub fn probability(ctx: &FairCatchContext) -> f64 {
        let mut prob = 0.25;
        if ctx.hang_time_seconds > 4.5 {
            prob += 0.15;
        } else if ctx.hang_time_seconds > 4.0 {
            prob += 0.10;
        }
        if ctx.landing_yards_to_own_goal <= 10 {
            prob += 0.20;
        } else if ctx.landing_yards_to_own_goal <= 20 {
            prob += 0.10;
        }
        if ctx.is_kickoff {
            prob += 0.05;
        }
        prob.clamp(0.0, 1.0)
    }

    pub fn call(rng: &mut impl RandomSource, ctx: &FairCatchContext) -> bool {
        rng.next_double() < Self::probability(ctx)
    }
}

/// Which universe — accepting or declining a penalty — a
/// [`PenaltyDecisionEngine`] is asked to pick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PenaltyCall {
    Accept,
    Decline,
}

/// Inputs a [`PenaltyDecisionEngine`] needs to choose between accepting
/// and declining a single penalty.
#[derive(Clone, Copy, Debug)]
pub struct PenaltyDecisionContext {
    pub is_automatic_first_down: bool,
    pub is_offensive_penalty: bool,
    pub penalty_yards: u8,
    pub play_yards_gained: i32,
    pub play_resulted_in_first_down: bool,
    pub play_resulted_in_score: bool,
    pub declining_yields_turnover_on_downs: bool,
}

/// Decides whether the non-penalized team accepts or declines a called
/// penalty.
pub struct PenaltyDecisionEngine;

impl PenaltyDecisionEngine {
    pub fn call(ctx: &PenaltyDecisionContext) -> PenaltyCall {
        if ctx.is_automatic_first_down {
            return PenaltyCall::Accept;
        }
        if ctx.is_offensive_penalty {
            // The defense is the one deciding here: accept when the play
            // went the offense's way, decline when declining turns the
            // down over on downs.
            if ctx.declining_yields_turnover_on_downs {
                return PenaltyCall::Decline;
            }
            return if ctx.play_resulted_in_first_down || ctx.play_yards_gained > 0 {
                PenaltyCall::Accept
            } else {
                PenaltyCall::Decline
            };
        }
        // Defensive penalty: the offense is deciding.
        if ctx.play_resulted_in_score {
            return PenaltyCall::Decline;
        }
        if ctx.penalty_yards as i32 >= ctx.play_yards_gained || !ctx.play_resulted_in_first_down {
            PenaltyCall::Accept
        } else {
            PenaltyCall::Decline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    fn ctx() -> PlayCallContext {
        PlayCallContext {
            quarter_number: 2,
            down: Down::First,
            time_remaining_seconds: 600,
            offense_leading: false,
            offense_trailing: false,
            offense_timeouts: 3,
            clock_running: true,
        }
    }

    #[test]
    fn should_kneel_requires_fourth_quarter_and_enough_clock() {
        let mut c = ctx();
        c.quarter_number = 4;
        c.offense_leading = true;
        c.down = Down::First;
        c.time_remaining_seconds = 100;
        assert!(PlayCallDecisionEngine::should_kneel(&c));

        c.time_remaining_seconds = 500;
        assert!(!PlayCallDecisionEngine::should_kneel(&c));
    }

    #[test]
    fn should_spike_requires_no_timeouts_and_two_minutes() {
        let mut c = ctx();
        c.quarter_number = 4;
        c.offense_trailing = true;
        c.offense_timeouts = 0;
        c.time_remaining_seconds = 90;
        c.down = Down::Second;
        assert!(PlayCallDecisionEngine::should_spike(&c));

        c.offense_timeouts = 1;
        assert!(!PlayCallDecisionEngine::should_spike(&c));
    }

    #[test]
    fn onside_kick_never_rolls_rng_unless_trailing() {
        let mut rng = ScriptedRng::new(vec![]);
        let ctx = OnsideKickContext { score_differential: 0 };
        let call = OnsideKickDecisionEngine::call(&mut rng, &ctx);
        assert_eq!(call, KickoffCall::NormalKickoff);
    }

    #[test]
    fn onside_kick_rolls_when_trailing_by_a_score() {
        let mut rng = ScriptedRng::new(vec![0.01]);
        let ctx = OnsideKickContext { score_differential: -7 };
        assert_eq!(OnsideKickDecisionEngine::call(&mut rng, &ctx), KickoffCall::OnsideKick);
    }

    #[test]
    fn fourth_and_one_probability_favors_going_for_it() {
        let ctx = FourthDownContext {
            yards_to_go: 1,
            yards_to_goal: 50,
            score_differential: 0,
            time_remaining_seconds: 1500,
            quarter_number: 2,
        };
        assert!(FourthDownDecisionEngine::go_for_it_probability(&ctx) >= 0.5);
    }

    #[test]
    fn fourth_down_forced_go_for_it_when_desperate() {
        let ctx = FourthDownContext {
            yards_to_go: 10,
            yards_to_goal: 60,
            score_differential: -10,
            time_remaining_seconds: 100,
            quarter_number: 4,
        };
        let mut rng = ScriptedRng::new(vec![]);
        assert_eq!(FourthDownDecisionEngine::call(&mut rng, &ctx), FourthDownCall::GoForIt);
    }

    #[test]
    fn penalty_decision_always_accepts_automatic_first_down() {
        let ctx = PenaltyDecisionContext {
            is_automatic_first_down: true,
            is_offensive_penalty: false,
            penalty_yards: 5,
            play_yards_gained: 20,
            play_resulted_in_first_down: true,
            play_resulted_in_score: false,
            declining_yields_turnover_on_downs: false,
        };
        assert_eq!(PenaltyDecisionEngine::call(&ctx), PenaltyCall::Accept);
    }

    #[test]
    fn penalty_decision_declines_when_play_already_scored() {
        let ctx = PenaltyDecisionContext {
            is_automatic_first_down: false,
            is_offensive_penalty: false,
            penalty_yards: 5,
            play_yards_gained: 60,
            play_resulted_in_first_down: true,
            play_resulted_in_score: true,
            declining_yields_turnover_on_downs: false,
        };
        assert_eq!(PenaltyDecisionEngine::call(&ctx), PenaltyCall::Decline);
    }
}
