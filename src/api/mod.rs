use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use crate::engine::action::ScorerAction;
use crate::engine::bases::{BaseAdvancementTracker, BaseSet};
use crate::engine::count::{CountState, StrikeKind};
use crate::engine::outcome::WhyCode;
use crate::engine::record::{PlateAppearanceKey, PlateAppearanceRecord};

pub mod client;
pub mod session;

pub fn to_payload(record: &PlateAppearanceRecord) -> Value {
    to_payload_at(record, Utc::now())
}

pub fn to_payload_at(record: &PlateAppearanceRecord, updated_at: DateTime<Utc>) -> Value {
    let PlateAppearanceKey { game_id, inning, top, batter_seq } = record.key();
    let count = record.count();
    let bases = record.bases();

    json!({
        "game_id": game_id,
        "inning": inning,
        "top": top,
        "batter_seq": batter_seq,
        "player_id": record.player_id(),
        "jersey": record.jersey(),
        "balls_before_play": count.balls(),
        "strikes_before_play": count.strikes_total(),
        "strikes_watching": count.strikes(StrikeKind::Watching),
        "strikes_swinging": count.strikes(StrikeKind::Swinging),
        "strikes_unsure": count.strikes(StrikeKind::Unsure),
        "ball_swinging": count.strikes(StrikeKind::BallSwinging),
        "fouls": count.fouls_total(),
        "fouls_after_two_strikes": count.fouls_after_two_strikes(),
        "pitch_count": count.pitch_count(),
        "pa_why": record.why().map_or("", WhyCode::as_str),
        "pa_result": bases.initial(),
        "br_result": bases.final_base(),
        "out_at": bases.out_at(),
        "br_stolen_bases": bases.stolen_bases().to_vec(),
        "base_running_hit_around": bases.hit_around_bases().to_vec(),
        "hit_to": record.hit_to(),
        "pa_error_on": record.pa_error_on(),
        "br_error_on": record.br_error_on(),
        "out": u8::from(record.is_out()),
        "updated_at": updated_at.to_rfc3339(),
    })
}

// only the slot identity is required, anything else missing or garbled loads as empty
pub fn from_payload(value: &Value) -> Result<PlateAppearanceRecord> {
    let key = PlateAppearanceKey {
        game_id: int(&value["game_id"]).context("Plate appearance didn't have a game id")?,
        inning: int(&value["inning"]).context("Plate appearance didn't have an inning")?.clamp(1, u8::MAX as i64) as u8,
        top: value["top"].as_bool().or_else(|| int(&value["top"]).map(|top| top != 0)).context("Plate appearance didn't say which half of the inning it was in")?,
        batter_seq: int(&value["batter_seq"]).context("Plate appearance didn't have a batter sequence id")?.max(0) as u32,
    };

    let count = CountState::from_counters(
        counter(&value["balls_before_play"]),
        counter(&value["strikes_watching"]),
        counter(&value["strikes_swinging"]),
        counter(&value["strikes_unsure"]),
        counter(&value["ball_swinging"]),
        counter(&value["fouls"]),
        counter(&value["fouls_after_two_strikes"]),
    );

    let why = match value["pa_why"].as_str().map(str::trim) {
        None | Some("") => None,
        Some(why) => match why.parse::<WhyCode>() {
            Ok(why) => Some(why),
            Err(e) => {
                tracing::warn!(%key, "ignoring stored why code: {e}");
                None
            }
        },
    };

    let bases = BaseAdvancementTracker::from_parts(
        base(&value["pa_result"]).unwrap_or(0),
        base(&value["br_result"]),
        base(&value["out_at"]).unwrap_or(0),
        parse_int_set(&value["br_stolen_bases"]),
        parse_int_set(&value["base_running_hit_around"]),
    );

    let mut record = PlateAppearanceRecord::from_parts(key, count, why, bases);
    record.set_identity(
        int(&value["player_id"]),
        value["jersey"].as_str().map(str::to_owned).or_else(|| value["jersey"].as_i64().map(|jersey| jersey.to_string())),
    );
    record.set_positions(position(&value["hit_to"]), position(&value["pa_error_on"]), position(&value["br_error_on"]));

    // older rows carry only the aggregate strike count
    let strikes_before_play = counter(&value["strikes_before_play"]);
    if strikes_before_play > record.count().strikes_total() {
        record.apply(ScorerAction::SetStrikes(strikes_before_play));
    }

    Ok(record)
}

pub fn parse_int_set(value: &Value) -> BaseSet {
    match value {
        Value::Null => BaseSet::new(),
        Value::Array(items) => {
            let mut set = BaseSet::new();
            for item in items {
                match int(item) {
                    Some(base) => {
                        set.insert(base.clamp(0, u8::MAX as i64) as u8);
                    }
                    None => {
                        tracing::warn!(%value, "unparseable base list");
                        return BaseSet::new();
                    }
                }
            }
            set
        }
        Value::Number(_) => int(value).map(|base| BaseSet::from_iter([base.clamp(0, u8::MAX as i64) as u8])).unwrap_or_default(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                BaseSet::new()
            } else if s.starts_with('[') {
                match serde_json::from_str::<Value>(s) {
                    Ok(inner @ Value::Array(_)) => parse_int_set(&inner),
                    _ => {
                        tracing::warn!(%value, "unparseable base list");
                        BaseSet::new()
                    }
                }
            } else {
                let bases = s.split(',').map(|base| base.trim().parse::<u8>()).collect::<Result<Vec<_>, _>>();
                match bases {
                    Ok(bases) => bases.into_iter().collect(),
                    Err(_) => {
                        tracing::warn!(%value, "unparseable base list");
                        BaseSet::new()
                    }
                }
            }
        }
        _ => {
            tracing::warn!(%value, "unparseable base list");
            BaseSet::new()
        }
    }
}

fn int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|n| n.fract() == 0.0).map(|n| n as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn counter(value: &Value) -> u32 {
    int(value).map_or(0, |n| n.clamp(0, u32::MAX as i64) as u32)
}

fn base(value: &Value) -> Option<u8> {
    int(value).map(|n| n.clamp(0, 4) as u8)
}

fn position(value: &Value) -> Option<u8> {
    int(value).filter(|n| (1..=9).contains(n)).map(|n| n as u8)
}
