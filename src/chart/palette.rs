//! Mood level color mapping

use serde::{Deserialize, Serialize};

use crate::types::MoodLevel;

/// Discrete color bucket for a mood level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Red,
    Orange,
    Yellow,
    LightGreen,
    Green,
}

impl ColorToken {
    /// sRGB hex value used by the app theme
    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::Red => "#EF4444",
            ColorToken::Orange => "#F97316",
            ColorToken::Yellow => "#EAB308",
            ColorToken::LightGreen => "#84CC16",
            ColorToken::Green => "#22C55E",
        }
    }
}

/// Inclusive upper level bound per bucket, lowest first; `None` catches the rest
const MOOD_PALETTE: [(Option<u8>, ColorToken); 5] = [
    (Some(1), ColorToken::Red),
    (Some(2), ColorToken::Orange),
    (Some(3), ColorToken::Yellow),
    (Some(4), ColorToken::LightGreen),
    (None, ColorToken::Green),
];

/// Color bucket for a mood level
pub fn color_for(level: MoodLevel) -> ColorToken {
    MOOD_PALETTE
        .iter()
        .find(|(bound, _)| bound.map_or(true, |b| level.get() <= b))
        .map(|(_, color)| *color)
        .unwrap_or(ColorToken::Green)
}

/// Every level with its color, for the chart legend
pub fn legend() -> Vec<(MoodLevel, ColorToken)> {
    MoodLevel::ALL
        .iter()
        .map(|level| (*level, color_for(*level)))
        .collect()
}
