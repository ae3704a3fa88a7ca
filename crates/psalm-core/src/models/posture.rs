use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The movement a seeker brings to the Gates. Steers the query embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    LamentTrust,
    FearRefuge,
    WaitingStrength,
    RepentCleansing,
    PraiseThanks,
    #[default]
    None,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::LamentTrust,
        Mood::FearRefuge,
        Mood::WaitingStrength,
        Mood::RepentCleansing,
        Mood::PraiseThanks,
        Mood::None,
    ];

    /// Thematic phrase prepended to the query before embedding.
    pub fn query_prefix(self) -> &'static str {
        match self {
            Mood::LamentTrust => "lament and sorrow moving toward trust and surrender: ",
            Mood::FearRefuge => "fear moving toward refuge and courage in God: ",
            Mood::WaitingStrength => "patient waiting and endurance, strength renewed: ",
            Mood::RepentCleansing => "repentance, cleansing, mercy and restoration: ",
            Mood::PraiseThanks => "praise, thanksgiving, adoration, joy: ",
            Mood::None => "",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::LamentTrust => "lament_trust",
            Mood::FearRefuge => "fear_refuge",
            Mood::WaitingStrength => "waiting_strength",
            Mood::RepentCleansing => "repent_cleansing",
            Mood::PraiseThanks => "praise_thanks",
            Mood::None => "none",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| format!("unknown mood: {s}"))
    }
}

/// What the user declared at the Gates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Posture {
    pub mood: Mood,
    /// Free text carried into the reflection prompt.
    pub text: String,
}

impl Posture {
    pub fn new(mood: Mood, text: impl Into<String>) -> Self {
        Self {
            mood,
            text: text.into(),
        }
    }
}
