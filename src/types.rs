//! Core types for Calmou core
//!
//! This module defines the data that crosses the boundary with the app shell:
//! instrument definitions, answer sets, scoring results, mood series and the
//! payloads handed to the remote persistence collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ComputeError;

/// One selectable answer and the weight it contributes to the score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub value: u32,
}

/// A single questionnaire item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique within the instrument
    pub id: String,
    /// Prompt shown to the user
    pub text: String,
    /// Option set overriding the instrument-wide one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AnswerOption>>,
}

/// One band of the threshold table.
///
/// Bands are evaluated lowest bound first; `upper_bound` is inclusive and
/// `None` marks the catch-all band, which must be last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub upper_bound: Option<u32>,
    pub category: String,
}

impl Threshold {
    pub fn upto(upper_bound: u32, category: &str) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            category: category.to_string(),
        }
    }

    pub fn above(category: &str) -> Self {
        Self {
            upper_bound: None,
            category: category.to_string(),
        }
    }

    /// Whether a score falls at or below this band's bound
    pub fn admits(&self, score: u32) -> bool {
        self.upper_bound.map_or(true, |bound| score <= bound)
    }
}

/// Static definition of one self-assessment tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Stable identifier (e.g. "stress", "burnout", "anxiety")
    pub id: String,
    /// Human-readable title
    pub title: String,
    /// Questions in their fixed presentation order
    pub questions: Vec<Question>,
    /// Option set shared by every question without an override
    pub answer_options: Vec<AnswerOption>,
    /// Score bands, lowest first, catch-all last
    pub thresholds: Vec<Threshold>,
}

impl Instrument {
    /// Look up a question by id
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// The options that apply to a question
    pub fn options_for<'a>(&'a self, question: &'a Question) -> &'a [AnswerOption] {
        question.options.as_deref().unwrap_or(&self.answer_options)
    }

    /// Highest score reachable with a complete answer set, saturating at
    /// `u32::MAX`
    pub fn max_possible_score(&self) -> u32 {
        self.checked_max_possible_score().unwrap_or(u32::MAX)
    }

    /// Highest reachable score, `None` when it does not fit in a `u32`
    pub fn checked_max_possible_score(&self) -> Option<u32> {
        self.questions.iter().try_fold(0u32, |total, q| {
            let top = self.options_for(q).iter().map(|o| o.value).max().unwrap_or(0);
            total.checked_add(top)
        })
    }
}

/// Chosen option values keyed by question id.
///
/// Backed by an ordered map so serialization is stable across calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, u32>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<u32> {
        self.0.get(question_id).copied()
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Copy of this set with one answer set or overwritten
    pub(crate) fn with(&self, question_id: &str, value: u32) -> Self {
        let mut answers = self.0.clone();
        answers.insert(question_id.to_string(), value);
        Self(answers)
    }
}

impl FromIterator<(String, u32)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outcome of scoring a complete answer set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub instrument_id: String,
    /// Sum of the chosen option values
    pub score: u32,
    /// Highest reachable score for the instrument
    pub max_score: u32,
    /// Label of the threshold band containing `score`
    pub category: String,
}

/// Lowest mood level on the scale
pub const MIN_MOOD_LEVEL: u8 = 1;

/// Highest mood level on the scale
pub const MAX_MOOD_LEVEL: u8 = 5;

/// Self-reported mood for one day, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodLevel(u8);

impl MoodLevel {
    pub const ALL: [MoodLevel; 5] = [
        MoodLevel(1),
        MoodLevel(2),
        MoodLevel(3),
        MoodLevel(4),
        MoodLevel(5),
    ];

    pub fn new(level: i64) -> Option<Self> {
        if (MIN_MOOD_LEVEL as i64..=MAX_MOOD_LEVEL as i64).contains(&level) {
            Some(Self(level as u8))
        } else {
            None
        }
    }

    /// Nearest valid level
    pub fn clamped(level: i64) -> Self {
        Self(level.clamp(MIN_MOOD_LEVEL as i64, MAX_MOOD_LEVEL as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Label used by the check-in screen
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Stressed",
            2 => "Bad",
            3 => "Okay",
            4 => "Good",
            _ => "Great",
        }
    }
}

impl TryFrom<i64> for MoodLevel {
    type Error = ComputeError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::new(level).ok_or(ComputeError::InvalidMoodLevel(level))
    }
}

impl From<MoodLevel> for u8 {
    fn from(level: MoodLevel) -> Self {
        level.0
    }
}

impl fmt::Display for MoodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What to do with a mood level outside 1..=5 arriving from upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelPolicy {
    /// Fail with `ComputeError::InvalidMoodLevel`
    #[default]
    Reject,
    /// Clamp into range and log a warning
    Clamp,
}

impl std::str::FromStr for LevelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(LevelPolicy::Reject),
            "clamp" => Ok(LevelPolicy::Clamp),
            other => Err(format!("unknown level policy '{other}'")),
        }
    }
}

/// One labeled point of a mood series, as received from upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMoodEntry {
    pub label: String,
    pub level: i64,
}

/// One labeled, validated point of a mood series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub label: String,
    pub level: MoodLevel,
}

impl MoodEntry {
    pub fn new(label: &str, level: MoodLevel) -> Self {
        Self {
            label: label.to_string(),
            level,
        }
    }
}

/// Chronologically ordered mood entries.
///
/// Callers supply entries already ordered and deduplicated; nothing here
/// sorts or merges them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodSeries(Vec<MoodEntry>);

impl MoodSeries {
    pub fn new(entries: Vec<MoodEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoodEntry> {
        self.0.iter()
    }
}

impl FromIterator<MoodEntry> for MoodSeries {
    fn from_iter<I: IntoIterator<Item = MoodEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Library that built a submission payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
}

/// Completed assessment as submitted to the persistence endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub submission_id: String,
    pub producer: Producer,
    pub instrument_id: String,
    pub answers: AnswerSet,
    pub score: u32,
    pub category: String,
    pub completed_at: DateTime<Utc>,
}

/// Daily mood check-in as submitted to the persistence endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodCheckIn {
    pub check_in_id: String,
    pub producer: Producer,
    pub level: MoodLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
