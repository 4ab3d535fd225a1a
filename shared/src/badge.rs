use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Badge {
    Rookie,
    Bronze,
    Silver,
    Gold,
}

impl Badge {
    pub const GOLD_THRESHOLD: i64 = 90;
    pub const SILVER_THRESHOLD: i64 = 60;
    pub const BRONZE_THRESHOLD: i64 = 30;

    pub fn classify(score: impl Into<i64>) -> Self {
        let score = score.into();
        if score >= Self::GOLD_THRESHOLD {
            Badge::Gold
        } else if score >= Self::SILVER_THRESHOLD {
            Badge::Silver
        } else if score >= Self::BRONZE_THRESHOLD {
            Badge::Bronze
        } else {
            Badge::Rookie
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Gold => "🥇 Gold",
            Badge::Silver => "🥈 Silver",
            Badge::Bronze => "🥉 Bronze",
            Badge::Rookie => "🎖️ Rookie",
        }
    }

    /// Fill colour used when the badge is drawn.
    pub fn color(&self) -> &'static str {
        match self {
            Badge::Gold => "#D4AF37",
            Badge::Silver => "#A8A9AD",
            Badge::Bronze => "#CD7F32",
            Badge::Rookie => "#6B7280",
        }
    }
}
