use core::fmt::{Display, Formatter};
use core::str::FromStr;
use anyhow::{anyhow, Result};
use crate::engine::outcome::WhyCode;

pub const MAX_BALLS: u32 = 3;
pub const MAX_STRIKES: u32 = 2;
// stored counters beyond this are garbage, not a real at-bat
pub const MAX_COUNTER: u32 = u16::MAX as u32;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StrikeKind {
    Watching,
    Swinging,
    Unsure,
    BallSwinging,
}

impl StrikeKind {
    pub const ALL: [Self; 4] = [Self::Watching, Self::Swinging, Self::Unsure, Self::BallSwinging];
}

impl Display for StrikeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match *self {
            Self::Watching => "watching",
            Self::Swinging => "swinging",
            Self::Unsure => "unsure",
            Self::BallSwinging => "ball swinging",
        })
    }
}

impl FromStr for StrikeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match &*s.trim().to_ascii_lowercase() {
            "w" | "watching" | "looking" => Self::Watching,
            "s" | "swinging" => Self::Swinging,
            "u" | "unsure" => Self::Unsure,
            "bs" | "ball-swinging" | "ball_swinging" => Self::BallSwinging,
            other => return Err(anyhow!("Invalid strike kind '{other}'")),
        })
    }
}

// strikes_total is a capped projection of the counters, refreshed by every
// mutator. pitch_count depends on the why code so it is only set by
// recompute_pitch_count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountState {
    balls: u32,
    strikes_watching: u32,
    strikes_swinging: u32,
    strikes_unsure: u32,
    ball_swinging: u32,
    strikes_total: u32,
    fouls_total: u32,
    fouls_after_two_strikes: u32,
    pitch_count: u32,
}

impl CountState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counters(balls: u32, watching: u32, swinging: u32, unsure: u32, ball_swinging: u32, fouls: u32, fouls_after_two_strikes: u32) -> Self {
        let mut count = Self {
            balls: balls.min(MAX_BALLS),
            strikes_watching: watching.min(MAX_COUNTER),
            strikes_swinging: swinging.min(MAX_COUNTER),
            strikes_unsure: unsure.min(MAX_COUNTER),
            ball_swinging: ball_swinging.min(MAX_COUNTER),
            strikes_total: 0,
            fouls_total: fouls.min(MAX_COUNTER),
            fouls_after_two_strikes: fouls_after_two_strikes.min(fouls).min(MAX_COUNTER),
            pitch_count: 0,
        };
        count.refresh();
        count
    }

    pub fn balls(&self) -> u32 {
        self.balls
    }

    pub fn strikes(&self, kind: StrikeKind) -> u32 {
        match kind {
            StrikeKind::Watching => self.strikes_watching,
            StrikeKind::Swinging => self.strikes_swinging,
            StrikeKind::Unsure => self.strikes_unsure,
            StrikeKind::BallSwinging => self.ball_swinging,
        }
    }

    pub fn strikes_total(&self) -> u32 {
        self.strikes_total
    }

    pub fn fouls_total(&self) -> u32 {
        self.fouls_total
    }

    pub fn fouls_after_two_strikes(&self) -> u32 {
        self.fouls_after_two_strikes
    }

    pub fn foul_strikes(&self) -> u32 {
        self.fouls_total - self.fouls_after_two_strikes
    }

    pub fn pitch_count(&self) -> u32 {
        self.pitch_count
    }

    pub fn increment_balls(&mut self) {
        self.balls = (self.balls + 1).min(MAX_BALLS);
    }

    pub fn decrement_balls(&mut self) {
        self.balls = self.balls.saturating_sub(1);
    }

    pub fn set_aggregate_balls(&mut self, n: u32) {
        self.balls = n.min(MAX_BALLS);
    }

    pub fn clear_balls(&mut self) {
        self.balls = 0;
    }

    // counters may exceed the cap, only the total is clamped
    pub fn increment_strike_type(&mut self, kind: StrikeKind) {
        let counter = self.counter_mut(kind);
        *counter = counter.saturating_add(1).min(MAX_COUNTER);
        self.refresh();
    }

    pub fn decrement_strike_type(&mut self, kind: StrikeKind) {
        let counter = self.counter_mut(kind);
        *counter = counter.saturating_sub(1);
        self.refresh();
    }

    /// A foul is a strike unless the batter already has two strikes.
    pub fn record_foul(&mut self) {
        if self.fouls_total >= MAX_COUNTER {
            return;
        }
        if self.strikes_total >= MAX_STRIKES {
            self.fouls_after_two_strikes += 1;
        }
        self.fouls_total += 1;
        self.refresh();
    }

    pub fn remove_foul(&mut self) {
        if self.fouls_total == 0 {
            return;
        }
        self.fouls_total -= 1;
        if self.fouls_after_two_strikes > 0 {
            self.fouls_after_two_strikes -= 1;
        }
        self.refresh();
    }

    // increases land in unsure; decreases drain unsure, swinging, watching,
    // then ball-swinging. strike-fouls are never rewritten
    pub fn set_aggregate_strikes(&mut self, n: u32) {
        let n = n.min(MAX_STRIKES);
        if n > self.strikes_total {
            self.strikes_unsure = self.strikes_unsure.saturating_add(n - self.raw_strikes()).min(MAX_COUNTER);
        } else if n < self.strikes_total {
            let mut excess = self.raw_strikes() - n;
            for kind in [StrikeKind::Unsure, StrikeKind::Swinging, StrikeKind::Watching, StrikeKind::BallSwinging] {
                if excess == 0 {
                    break;
                }
                let counter = self.counter_mut(kind);
                let taken = excess.min(*counter);
                *counter -= taken;
                excess -= taken;
            }
        }
        self.refresh();
    }

    pub fn clear_strikes(&mut self) {
        self.strikes_watching = 0;
        self.strikes_swinging = 0;
        self.strikes_unsure = 0;
        self.ball_swinging = 0;
        self.fouls_total = 0;
        self.fouls_after_two_strikes = 0;
        self.refresh();
    }

    // includes the implied pitch that ended the appearance
    pub fn pitch_count_for(&self, why: Option<WhyCode>) -> u32 {
        let seen = [self.balls, self.strikes_watching, self.strikes_swinging, self.strikes_unsure, self.ball_swinging, self.fouls_total]
            .into_iter()
            .fold(0u32, u32::saturating_add);
        let terminal = match why {
            Some(WhyCode::BB) => MAX_BALLS.saturating_sub(self.balls),
            Some(WhyCode::K | WhyCode::KK) => MAX_STRIKES.saturating_sub(self.strikes_total),
            Some(_) => 1,
            None => 0,
        };
        seen.saturating_add(terminal)
    }

    pub fn recompute_pitch_count(&mut self, why: Option<WhyCode>) -> u32 {
        self.pitch_count = self.pitch_count_for(why);
        self.pitch_count
    }

    fn raw_strikes(&self) -> u32 {
        [self.strikes_watching, self.strikes_swinging, self.strikes_unsure, self.ball_swinging, self.foul_strikes()]
            .into_iter()
            .fold(0u32, u32::saturating_add)
    }

    fn refresh(&mut self) {
        self.strikes_total = self.raw_strikes().min(MAX_STRIKES);
    }

    fn counter_mut(&mut self, kind: StrikeKind) -> &mut u32 {
        match kind {
            StrikeKind::Watching => &mut self.strikes_watching,
            StrikeKind::Swinging => &mut self.strikes_swinging,
            StrikeKind::Unsure => &mut self.strikes_unsure,
            StrikeKind::BallSwinging => &mut self.ball_swinging,
        }
    }
}

impl Display for CountState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.balls, self.strikes_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balls_clamp_to_three() {
        let mut count = CountState::new();
        for _ in 0..6 {
            count.increment_balls();
        }
        assert_eq!(count.balls(), 3);
        count.set_aggregate_balls(9);
        assert_eq!(count.balls(), 3);
        count.clear_balls();
        count.decrement_balls();
        assert_eq!(count.balls(), 0);
    }

    #[test]
    fn strike_total_is_capped_but_counters_are_not() {
        let mut count = CountState::new();
        count.increment_strike_type(StrikeKind::Watching);
        count.increment_strike_type(StrikeKind::Swinging);
        count.increment_strike_type(StrikeKind::BallSwinging);
        assert_eq!(count.strikes_total(), 2);
        assert_eq!(count.strikes(StrikeKind::BallSwinging), 1);
        count.decrement_strike_type(StrikeKind::Watching);
        assert_eq!(count.strikes_total(), 2);
        count.decrement_strike_type(StrikeKind::Swinging);
        assert_eq!(count.strikes_total(), 1);
    }

    #[test]
    fn foul_with_fewer_than_two_strikes_is_a_strike() {
        let mut count = CountState::new();
        count.record_foul();
        assert_eq!(count.strikes_total(), 1);
        assert_eq!(count.fouls_after_two_strikes(), 0);
        count.record_foul();
        assert_eq!(count.strikes_total(), 2);
        assert_eq!(count.fouls_after_two_strikes(), 0);
        count.record_foul();
        assert_eq!(count.strikes_total(), 2);
        assert_eq!(count.fouls_after_two_strikes(), 1);
        assert_eq!(count.fouls_total(), 3);
    }

    #[test]
    fn removing_fouls_drains_the_overflow_first() {
        let mut count = CountState::new();
        count.increment_strike_type(StrikeKind::Swinging);
        count.record_foul();
        count.record_foul();
        assert_eq!(count.fouls_after_two_strikes(), 1);
        count.remove_foul();
        assert_eq!(count.fouls_after_two_strikes(), 0);
        assert_eq!(count.strikes_total(), 2);
        count.remove_foul();
        assert_eq!(count.strikes_total(), 1);
        assert_eq!(count.fouls_total(), 0);
        count.remove_foul();
        assert_eq!(count.fouls_total(), 0);
        assert_eq!(count.strikes_total(), 1);
    }

    #[test]
    fn aggregate_increase_goes_to_unsure() {
        let mut count = CountState::new();
        count.increment_strike_type(StrikeKind::Watching);
        count.set_aggregate_strikes(2);
        assert_eq!(count.strikes(StrikeKind::Unsure), 1);
        assert_eq!(count.strikes(StrikeKind::Watching), 1);
        assert_eq!(count.strikes_total(), 2);
    }

    #[test]
    fn aggregate_decrease_follows_priority() {
        let mut count = CountState::from_counters(0, 1, 1, 0, 0, 0, 0);
        count.set_aggregate_strikes(1);
        assert_eq!(count.strikes(StrikeKind::Swinging), 0);
        assert_eq!(count.strikes(StrikeKind::Watching), 1);

        let mut count = CountState::from_counters(0, 1, 1, 1, 0, 0, 0);
        count.set_aggregate_strikes(0);
        assert_eq!(count.strikes_total(), 0);
        assert_eq!(count.strikes(StrikeKind::Watching), 0);
    }

    #[test]
    fn aggregate_cannot_rewrite_foul_strikes() {
        let mut count = CountState::new();
        count.record_foul();
        count.increment_strike_type(StrikeKind::Unsure);
        count.set_aggregate_strikes(0);
        assert_eq!(count.strikes(StrikeKind::Unsure), 0);
        assert_eq!(count.strikes_total(), 1);
    }

    #[test]
    fn clearing_strikes_clears_fouls() {
        let mut count = CountState::from_counters(2, 1, 1, 1, 1, 4, 2);
        count.clear_strikes();
        assert_eq!(count.strikes_total(), 0);
        assert_eq!(count.fouls_total(), 0);
        assert_eq!(count.fouls_after_two_strikes(), 0);
        assert_eq!(count.balls(), 2);
    }

    #[test]
    fn walk_pitch_count() {
        let mut count = CountState::new();
        count.increment_balls();
        count.increment_balls();
        assert_eq!(count.recompute_pitch_count(Some(WhyCode::BB)), 3);
        count.increment_balls();
        assert_eq!(count.recompute_pitch_count(Some(WhyCode::BB)), 3);
    }

    #[test]
    fn strikeout_pitch_count() {
        let mut count = CountState::new();
        count.increment_balls();
        count.increment_strike_type(StrikeKind::Watching);
        assert_eq!(count.strikes_total(), 1);
        assert_eq!(count.recompute_pitch_count(Some(WhyCode::K)), 3);
        assert_eq!(count.recompute_pitch_count(Some(WhyCode::KK)), 3);
    }

    #[test]
    fn ball_in_play_adds_one_pitch() {
        let mut count = CountState::new();
        count.increment_balls();
        count.record_foul();
        count.record_foul();
        count.record_foul();
        assert_eq!(count.recompute_pitch_count(None), 4);
        assert_eq!(count.recompute_pitch_count(Some(WhyCode::GO)), 5);
        assert_eq!(count.pitch_count(), 5);
    }

    #[test]
    fn stored_counters_are_clamped() {
        let count = CountState::from_counters(7, 0, 0, 0, 0, 1, 5);
        assert_eq!(count.balls(), 3);
        assert_eq!(count.fouls_after_two_strikes(), 1);
        assert_eq!(count.strikes_total(), 0);
    }
}
