use core::fmt::{Display, Formatter};
use anyhow::{anyhow, Result};
use crate::engine::action::ScorerAction;
use crate::engine::bases::{BaseAdvancementTracker, BaseSet};
use crate::engine::count::{CountState, StrikeKind};
use crate::engine::outcome::{classify, Category, Color, Outcome, WhyCode};
use crate::util::{base_name, position_abbreviation};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlateAppearanceKey {
    pub game_id: i64,
    pub inning: u8,
    pub top: bool,
    pub batter_seq: u32,
}

impl Display for PlateAppearanceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Self { game_id, inning, top, batter_seq } = self;
        write!(f, "game {game_id}, {half} {inning}, batter #{batter_seq}", half = if *top { "top" } else { "bot" })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlateAppearanceRecord {
    key: PlateAppearanceKey,
    player_id: Option<i64>,
    jersey: Option<String>,
    count: CountState,
    why: Option<WhyCode>,
    bases: BaseAdvancementTracker,
    hit_to: Option<u8>,
    pa_error_on: Option<u8>,
    br_error_on: Option<u8>,
    out: bool,
}

impl PlateAppearanceRecord {
    pub fn new(key: PlateAppearanceKey) -> Self {
        let mut record = Self {
            key,
            player_id: None,
            jersey: None,
            count: CountState::new(),
            why: None,
            bases: BaseAdvancementTracker::new(),
            hit_to: None,
            pa_error_on: None,
            br_error_on: None,
            out: false,
        };
        record.normalize();
        record
    }

    pub(crate) fn from_parts(key: PlateAppearanceKey, count: CountState, why: Option<WhyCode>, bases: BaseAdvancementTracker) -> Self {
        let mut record = Self { count, why, bases, ..Self::new(key) };
        record.normalize();
        record
    }

    pub fn key(&self) -> PlateAppearanceKey {
        self.key
    }

    pub fn player_id(&self) -> Option<i64> {
        self.player_id
    }

    pub fn jersey(&self) -> Option<&str> {
        self.jersey.as_deref()
    }

    pub fn count(&self) -> &CountState {
        &self.count
    }

    pub fn why(&self) -> Option<WhyCode> {
        self.why
    }

    pub fn bases(&self) -> &BaseAdvancementTracker {
        &self.bases
    }

    pub fn hit_to(&self) -> Option<u8> {
        self.hit_to
    }

    pub fn pa_error_on(&self) -> Option<u8> {
        self.pa_error_on
    }

    pub fn br_error_on(&self) -> Option<u8> {
        self.br_error_on
    }

    pub fn is_out(&self) -> bool {
        self.out
    }

    pub fn pitch_count(&self) -> u32 {
        self.count.pitch_count()
    }

    pub fn outcome(&self) -> Outcome {
        classify(self.bases.initial(), self.why, self.pa_error_on.is_some())
    }

    pub fn apply(&mut self, action: ScorerAction) {
        match action {
            ScorerAction::AddBall => self.count.increment_balls(),
            ScorerAction::RemoveBall => self.count.decrement_balls(),
            ScorerAction::SetBalls(n) => self.count.set_aggregate_balls(n),
            ScorerAction::ClearBalls => self.count.clear_balls(),
            ScorerAction::AddStrike(kind) => self.count.increment_strike_type(kind),
            ScorerAction::RemoveStrike(kind) => self.count.decrement_strike_type(kind),
            ScorerAction::SetStrikes(n) => self.count.set_aggregate_strikes(n),
            ScorerAction::ClearStrikes => self.count.clear_strikes(),
            ScorerAction::AddFoul => self.count.record_foul(),
            ScorerAction::RemoveFoul => self.count.remove_foul(),
            ScorerAction::SetWhy(why) => self.set_why(Some(why)),
            ScorerAction::ClearWhy => self.set_why(None),
            ScorerAction::SetInitialBase(base) => self.bases.set_initial_base(base),
            ScorerAction::SetFinalBase(base) => self.bases.set_final_base(base),
            ScorerAction::ClearFinalBase => self.bases.clear_final_base(),
            ScorerAction::SetOutAt(base) => self.bases.set_out_at(base),
            ScorerAction::ToggleStolenBase(base) => {
                self.bases.toggle_stolen_base(base);
            }
            ScorerAction::ToggleHitAround(base) => {
                self.bases.toggle_hit_around(base);
            }
            ScorerAction::SetHitTo(position) => self.hit_to = position.map(clamp_position),
            ScorerAction::SetPaErrorOn(position) => self.pa_error_on = position.map(clamp_position),
            ScorerAction::SetBrErrorOn(position) => self.br_error_on = position.map(clamp_position),
            ScorerAction::SetPlayer(player_id) => self.player_id = Some(player_id),
            ScorerAction::SetJersey(jersey) => self.jersey = Some(jersey.trim().to_owned()).filter(|jersey| !jersey.is_empty()),
        }
        self.normalize();
    }

    // walks put the batter on first, strikeouts leave them at the plate
    fn set_why(&mut self, why: Option<WhyCode>) {
        self.why = why;
        match why {
            Some(why) if why.is_walk() => self.bases.set_initial_base(1),
            Some(why) if why.is_strikeout() => self.bases.set_initial_base(0),
            _ => {}
        }
    }

    pub(crate) fn set_identity(&mut self, player_id: Option<i64>, jersey: Option<String>) {
        self.player_id = player_id;
        self.jersey = jersey.map(|jersey| jersey.trim().to_owned()).filter(|jersey| !jersey.is_empty());
    }

    pub(crate) fn set_positions(&mut self, hit_to: Option<u8>, pa_error_on: Option<u8>, br_error_on: Option<u8>) {
        self.hit_to = hit_to.map(clamp_position);
        self.pa_error_on = pa_error_on.map(clamp_position);
        self.br_error_on = br_error_on.map(clamp_position);
    }

    fn normalize(&mut self) {
        self.out = self.bases.is_out();
        self.count.recompute_pitch_count(self.why);
    }

    /// The only hard requirement before a save: someone has to be batting.
    pub fn validate_for_save(&self) -> Result<()> {
        if self.player_id.is_none() && self.jersey.is_none() {
            return Err(anyhow!("Plate appearance ({}) has no player or jersey number", self.key));
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        let outcome = self.outcome();
        Snapshot {
            balls: self.count.balls(),
            strikes: self.count.strikes_total(),
            strikes_watching: self.count.strikes(StrikeKind::Watching),
            strikes_swinging: self.count.strikes(StrikeKind::Swinging),
            strikes_unsure: self.count.strikes(StrikeKind::Unsure),
            ball_swinging: self.count.strikes(StrikeKind::BallSwinging),
            fouls: self.count.fouls_total(),
            fouls_after_two_strikes: self.count.fouls_after_two_strikes(),
            pitch_count: self.count.pitch_count(),
            why: self.why,
            code: outcome.code().to_owned(),
            category: outcome.category(),
            color: outcome.color(),
            initial_base: self.bases.initial(),
            final_base: self.bases.final_base(),
            out_at: self.bases.out_at(),
            stolen_bases: self.bases.stolen_bases(),
            hit_around_bases: self.bases.hit_around_bases(),
            out: self.out,
        }
    }
}

fn clamp_position(position: u8) -> u8 {
    position.clamp(1, 9)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub balls: u32,
    pub strikes: u32,
    pub strikes_watching: u32,
    pub strikes_swinging: u32,
    pub strikes_unsure: u32,
    pub ball_swinging: u32,
    pub fouls: u32,
    pub fouls_after_two_strikes: u32,
    pub pitch_count: u32,
    pub why: Option<WhyCode>,
    pub code: String,
    pub category: Category,
    pub color: Color,
    pub initial_base: u8,
    pub final_base: Option<u8>,
    pub out_at: u8,
    pub stolen_bases: BaseSet,
    pub hit_around_bases: BaseSet,
    pub out: bool,
}

impl Display for PlateAppearanceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let outcome = self.outcome();
        write!(f, "`{count}` | **{outcome}**", count = self.count)?;
        if let Some(position) = self.hit_to {
            write!(f, " to {}", position_abbreviation(position))?;
        }
        match self.bases.final_base() {
            Some(base) if base > 0 && !self.out => write!(f, " -> {}", base_name(base))?,
            _ => {}
        }
        if self.bases.out_at() > 0 {
            write!(f, " (out at {})", base_name(self.bases.out_at()))?;
        }
        if !self.bases.stolen_bases().is_empty() {
            write!(f, " [SB {}]", self.bases.stolen_bases())?;
        }
        if !self.bases.hit_around_bases().is_empty() {
            write!(f, " [HA {}]", self.bases.hit_around_bases())?;
        }
        let pitches = self.count.pitch_count();
        write!(f, " | {pitches} P")
    }
}
