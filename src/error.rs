//! Error types for Calmou core

use thiserror::Error;

/// Errors that can occur during scoring, chart preparation or payload building
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Assessment '{instrument_id}' is incomplete; unanswered: {}", .missing.join(", "))]
    IncompleteAnswers {
        instrument_id: String,
        missing: Vec<String>,
    },

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Unknown question '{question_id}' for instrument '{instrument_id}'")]
    UnknownQuestion {
        instrument_id: String,
        question_id: String,
    },

    #[error("Value {value} is not an answer option for question '{question_id}'")]
    InvalidAnswerValue { question_id: String, value: u32 },

    #[error("Invalid instrument definition '{instrument_id}': {reason}")]
    InvalidInstrument {
        instrument_id: String,
        reason: String,
    },

    #[error("Mood level {0} is outside 1..=5")]
    InvalidMoodLevel(i64),

    #[error("Invalid chart layout: {0}")]
    InvalidLayout(String),

    #[error("A mood level must be selected before saving")]
    MissingMoodLevel,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] toml::de::Error),
}
