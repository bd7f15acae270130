use core::str::FromStr;
use anyhow::{anyhow, Context, Result};
use crate::engine::count::StrikeKind;
use crate::engine::outcome::WhyCode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScorerAction {
    AddBall,
    RemoveBall,
    SetBalls(u32),
    ClearBalls,
    AddStrike(StrikeKind),
    RemoveStrike(StrikeKind),
    SetStrikes(u32),
    ClearStrikes,
    AddFoul,
    RemoveFoul,
    SetWhy(WhyCode),
    ClearWhy,
    SetInitialBase(u8),
    SetFinalBase(u8),
    ClearFinalBase,
    SetOutAt(u8),
    ToggleStolenBase(u8),
    ToggleHitAround(u8),
    SetHitTo(Option<u8>),
    SetPaErrorOn(Option<u8>),
    SetBrErrorOn(Option<u8>),
    SetPlayer(i64),
    SetJersey(String),
}

impl FromStr for ScorerAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (command, argument) = s.split_once(char::is_whitespace).map_or((s, ""), |(command, argument)| (command, argument.trim()));

        fn number<T: FromStr>(argument: &str, command: &str) -> Result<T> {
            argument.parse::<T>().ok().with_context(|| format!("'{command}' expects a number, got '{argument}'"))
        }

        fn position(argument: &str, command: &str) -> Result<Option<u8>> {
            if argument.is_empty() || argument == "-" {
                return Ok(None);
            }
            let position = number::<u8>(argument, command)?;
            if !(1..=9).contains(&position) {
                return Err(anyhow!("'{command}' expects a fielding position 1-9, got {position}"));
            }
            Ok(Some(position))
        }

        Ok(match &*command.to_ascii_lowercase() {
            "b+" => Self::AddBall,
            "b-" => Self::RemoveBall,
            "balls" => Self::SetBalls(number(argument, command)?),
            "clear-balls" => Self::ClearBalls,
            "s+" if argument.is_empty() => Self::AddStrike(StrikeKind::Unsure),
            "s+" => Self::AddStrike(argument.parse()?),
            "s-" if argument.is_empty() => Self::RemoveStrike(StrikeKind::Unsure),
            "s-" => Self::RemoveStrike(argument.parse()?),
            "strikes" => Self::SetStrikes(number(argument, command)?),
            "clear-strikes" => Self::ClearStrikes,
            "f+" => Self::AddFoul,
            "f-" => Self::RemoveFoul,
            "why" if argument.is_empty() || argument == "-" => Self::ClearWhy,
            "why" => Self::SetWhy(argument.parse()?),
            "init" => Self::SetInitialBase(number(argument, command)?),
            "final" if argument.is_empty() || argument == "-" => Self::ClearFinalBase,
            "final" => Self::SetFinalBase(number(argument, command)?),
            "out" => Self::SetOutAt(number(argument, command)?),
            "sb" => Self::ToggleStolenBase(number(argument, command)?),
            "ha" => Self::ToggleHitAround(number(argument, command)?),
            "hit-to" => Self::SetHitTo(position(argument, command)?),
            "pa-err" => Self::SetPaErrorOn(position(argument, command)?),
            "br-err" => Self::SetBrErrorOn(position(argument, command)?),
            "player" => Self::SetPlayer(number(argument, command)?),
            "jersey" if !argument.is_empty() => Self::SetJersey(argument.to_owned()),
            _ => return Err(anyhow!("Unknown scoring command '{s}'")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_commands() {
        assert_eq!("b+".parse::<ScorerAction>().unwrap(), ScorerAction::AddBall);
        assert_eq!("  B- ".parse::<ScorerAction>().unwrap(), ScorerAction::RemoveBall);
        assert_eq!("balls 2".parse::<ScorerAction>().unwrap(), ScorerAction::SetBalls(2));
        assert_eq!("s+".parse::<ScorerAction>().unwrap(), ScorerAction::AddStrike(StrikeKind::Unsure));
        assert_eq!("s+ w".parse::<ScorerAction>().unwrap(), ScorerAction::AddStrike(StrikeKind::Watching));
        assert_eq!("s- bs".parse::<ScorerAction>().unwrap(), ScorerAction::RemoveStrike(StrikeKind::BallSwinging));
        assert_eq!("f+".parse::<ScorerAction>().unwrap(), ScorerAction::AddFoul);
    }

    #[test]
    fn outcome_and_base_commands() {
        assert_eq!("why hbp".parse::<ScorerAction>().unwrap(), ScorerAction::SetWhy(WhyCode::HBP));
        assert_eq!("why".parse::<ScorerAction>().unwrap(), ScorerAction::ClearWhy);
        assert_eq!("final -".parse::<ScorerAction>().unwrap(), ScorerAction::ClearFinalBase);
        assert_eq!("sb 3".parse::<ScorerAction>().unwrap(), ScorerAction::ToggleStolenBase(3));
        assert_eq!("hit-to 8".parse::<ScorerAction>().unwrap(), ScorerAction::SetHitTo(Some(8)));
        assert_eq!("pa-err -".parse::<ScorerAction>().unwrap(), ScorerAction::SetPaErrorOn(None));
        assert_eq!("jersey 27".parse::<ScorerAction>().unwrap(), ScorerAction::SetJersey("27".to_owned()));
    }

    #[test]
    fn bad_commands() {
        assert!("balls two".parse::<ScorerAction>().is_err());
        assert!("why XYZ".parse::<ScorerAction>().is_err());
        assert!("hit-to 12".parse::<ScorerAction>().is_err());
        assert!("s+ sideways".parse::<ScorerAction>().is_err());
        assert!("jersey".parse::<ScorerAction>().is_err());
        assert!("dance".parse::<ScorerAction>().is_err());
    }
}
