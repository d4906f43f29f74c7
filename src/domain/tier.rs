use crate::utils::error::{Result, StierError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest end of the display scale.
pub const MAX_SCORE: f64 = 10.0;

/// Ordinal quality bucket. Declaration order is best-first, so `Tier::SPlus < Tier::F`
/// under the derived `Ord`; use [`Tier::rank`] when "higher is better" reads clearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "S+")]
    SPlus,
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

/// Inclusive lower bound for each tier, checked top-down. F catches the rest.
const LOWER_BOUNDS: [(f64, Tier); 7] = [
    (9.5, Tier::SPlus),
    (9.0, Tier::S),
    (8.0, Tier::A),
    (7.0, Tier::B),
    (6.0, Tier::C),
    (5.0, Tier::D),
    (3.0, Tier::E),
];

impl Tier {
    /// Display order, S+ first.
    pub const ALL: [Tier; 8] = [
        Tier::SPlus,
        Tier::S,
        Tier::A,
        Tier::B,
        Tier::C,
        Tier::D,
        Tier::E,
        Tier::F,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tier::SPlus => "S+",
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::E => "E",
            Tier::F => "F",
        }
    }

    /// 7 for S+, 0 for F.
    pub fn rank(self) -> u8 {
        7 - self as u8
    }

    pub fn color(self) -> &'static str {
        tier_color(self)
    }

    /// Human-readable score band, as shown in tier list headers.
    pub fn range_label(self) -> &'static str {
        match self {
            Tier::SPlus => "9.5-10.0",
            Tier::S => "9.0-9.4",
            Tier::A => "8.0-8.9",
            Tier::B => "7.0-7.9",
            Tier::C => "6.0-6.9",
            Tier::D => "5.0-5.9",
            Tier::E => "3.0-4.9",
            Tier::F => "0.0-2.9",
        }
    }

    /// Inclusive lower bound of the band; 0.0 for F.
    pub fn min_score(self) -> f64 {
        LOWER_BOUNDS
            .iter()
            .find(|(_, tier)| *tier == self)
            .map(|(bound, _)| *bound)
            .unwrap_or(0.0)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Tier {
    type Err = StierError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Tier::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StierError::validation(format!("unknown tier label '{}'", s)))
    }
}

/// How scores outside `[0, 10]` (or NaN) are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorePolicy {
    /// NaN and negatives become F, anything above 10 becomes S+.
    #[default]
    Clamp,
    /// Out-of-range or non-finite scores are a validation error.
    Reject,
}

impl ScorePolicy {
    pub fn classify(self, score: f64) -> Result<Tier> {
        match self {
            ScorePolicy::Clamp => Ok(classify_tier(score)),
            ScorePolicy::Reject => try_classify_tier(score),
        }
    }
}

/// Maps a 0-10 score to its tier. Total: NaN and negative scores are F,
/// scores above 10 are S+.
pub fn classify_tier(score: f64) -> Tier {
    if score.is_nan() {
        return Tier::F;
    }
    LOWER_BOUNDS
        .iter()
        .find(|(bound, _)| score >= *bound)
        .map(|(_, tier)| *tier)
        .unwrap_or(Tier::F)
}

/// Strict form of [`classify_tier`].
pub fn try_classify_tier(score: f64) -> Result<Tier> {
    crate::utils::validation::validate_score_range("score", score, 0.0, MAX_SCORE)?;
    Ok(classify_tier(score))
}

pub fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::SPlus | Tier::S => "#ff7f7e",
        Tier::A => "#fbbf24",
        Tier::B => "#feff7f",
        Tier::C => "#10b981",
        Tier::D => "#60a5fa",
        Tier::E => "#a3a3a3",
        Tier::F => "#ef4444",
    }
}
