use core::fmt::{Display, Formatter};
use core::str::FromStr;
use anyhow::{anyhow, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WhyCode {
    K,
    KK,
    GO,
    FO,
    LO,
    FB,
    SH,
    SF,
    SB,
    H,
    HH,
    S,
    GS,
    BB,
    HBP,
    E,
    FC,
    B,
}

impl WhyCode {
    pub const ALL: [Self; 18] = [
        Self::K,
        Self::KK,
        Self::GO,
        Self::FO,
        Self::LO,
        Self::FB,
        Self::SH,
        Self::SF,
        Self::SB,
        Self::H,
        Self::HH,
        Self::S,
        Self::GS,
        Self::BB,
        Self::HBP,
        Self::E,
        Self::FC,
        Self::B,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::K => "K",
            Self::KK => "KK",
            Self::GO => "GO",
            Self::FO => "FO",
            Self::LO => "LO",
            Self::FB => "FB",
            Self::SH => "SH",
            Self::SF => "SF",
            Self::SB => "SB",
            Self::H => "H",
            Self::HH => "HH",
            Self::S => "S",
            Self::GS => "GS",
            Self::BB => "BB",
            Self::HBP => "HBP",
            Self::E => "E",
            Self::FC => "FC",
            Self::B => "B",
        }
    }

    pub fn is_strikeout(self) -> bool {
        matches!(self, Self::K | Self::KK)
    }

    pub fn is_walk(self) -> bool {
        matches!(self, Self::BB | Self::HBP)
    }
}

impl Display for WhyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WhyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|why| why.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("Invalid why code '{s}'"))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Hit,
    Out,
    Walk,
    Error,
    ReachedBase,
}

impl Category {
    pub fn color(self) -> Color {
        match self {
            Self::Hit => Color::Green,
            Self::Out => Color::Red,
            Self::Walk => Color::Blue,
            Self::Error => Color::Orange,
            Self::ReachedBase => Color::Purple,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match *self {
            Self::Hit => "hit",
            Self::Out => "out",
            Self::Walk => "walk",
            Self::Error => "error",
            Self::ReachedBase => "reached base",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Green,
    Red,
    Blue,
    Orange,
    Purple,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Orange => "orange",
            Self::Purple => "purple",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const HIT_CODES: &[&str] = &["1B", "2B", "3B", "HR", "HH", "S", "GS"];
const OUT_CODES: &[WhyCode] = &[WhyCode::K, WhyCode::KK, WhyCode::GO, WhyCode::FO, WhyCode::LO, WhyCode::FB, WhyCode::SF, WhyCode::SB];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    code: String,
    hit: bool,
    out: bool,
    walk: bool,
    error: bool,
}

impl Outcome {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub fn is_out(&self) -> bool {
        self.out
    }

    pub fn is_walk(&self) -> bool {
        self.walk
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn category(&self) -> Category {
        if self.error {
            Category::Error
        } else if self.walk {
            Category::Walk
        } else if self.hit {
            Category::Hit
        } else if self.out {
            Category::Out
        } else {
            Category::ReachedBase
        }
    }

    pub fn color(&self) -> Color {
        self.category().color()
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Canonical short code for a plate appearance. The first matching rule wins.
pub fn canonical_code(initial: u8, why: Option<WhyCode>) -> String {
    match why {
        Some(why @ (WhyCode::BB | WhyCode::HBP | WhyCode::FC)) => return why.to_string(),
        // a bunt with no base recorded shows as a walk
        Some(WhyCode::B) => return if (1..=4).contains(&initial) { format!("{initial}B") } else { "BB".to_owned() },
        _ => {}
    }

    if initial == 0 {
        return match why {
            Some(why) if OUT_CODES.contains(&why) => why.to_string(),
            _ => "OUT".to_owned(),
        };
    }

    if why == Some(WhyCode::E) {
        return format!("{initial}E");
    }

    match initial {
        1..=3 => format!("{initial}B"),
        4 => if why == Some(WhyCode::GS) { "GS".to_owned() } else { "HR".to_owned() },
        _ => String::new(),
    }
}

pub fn classify(initial: u8, why: Option<WhyCode>, error_on_present: bool) -> Outcome {
    let code = canonical_code(initial, why);
    let error = why == Some(WhyCode::E) || (why.is_none() && error_on_present);
    let walk = code == "BB" || code == "HBP";
    let hit = !error && why != Some(WhyCode::B) && !code.contains('E') && HIT_CODES.contains(&&*code);
    let out = initial == 0 && !error && !walk;

    Outcome {
        code,
        hit,
        out,
        walk,
        error,
    }
}
