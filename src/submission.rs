//! Submission payload encoding
//!
//! Builds the records handed to the remote persistence collaborator for
//! completed assessments and daily mood check-ins. Sending them is the app
//! shell's job.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ComputeError;
use crate::types::{
    AnswerSet, AssessmentSubmission, MoodCheckIn, MoodLevel, Producer, ScoringResult,
};
use crate::{CALMOU_VERSION, PRODUCER_NAME};

/// Check-in being filled in on the mood screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodCheckInDraft {
    level: Option<MoodLevel>,
    notes: String,
}

impl MoodCheckInDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, level: MoodLevel) {
        self.level = Some(level);
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }

    pub fn selected(&self) -> Option<MoodLevel> {
        self.level
    }

    /// Trimmed notes, `None` when blank
    pub fn notes(&self) -> Option<&str> {
        let trimmed = self.notes.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Encoder for submission payloads
pub struct SubmissionEncoder;

impl SubmissionEncoder {
    /// Producer metadata stamped on every payload
    pub fn producer() -> Producer {
        Producer {
            name: PRODUCER_NAME.to_string(),
            version: CALMOU_VERSION.to_string(),
        }
    }

    /// Payload for a scored assessment, stamped now
    pub fn assessment(result: &ScoringResult, answers: &AnswerSet) -> AssessmentSubmission {
        Self::assessment_at(result, answers, Utc::now())
    }

    /// Payload for a scored assessment with an explicit completion time
    pub fn assessment_at(
        result: &ScoringResult,
        answers: &AnswerSet,
        completed_at: DateTime<Utc>,
    ) -> AssessmentSubmission {
        AssessmentSubmission {
            submission_id: Uuid::new_v4().to_string(),
            producer: Self::producer(),
            instrument_id: result.instrument_id.clone(),
            answers: answers.clone(),
            score: result.score,
            category: result.category.clone(),
            completed_at,
        }
    }

    /// Payload for a check-in, stamped now
    pub fn check_in(draft: &MoodCheckInDraft) -> Result<MoodCheckIn, ComputeError> {
        Self::check_in_at(draft, Utc::now())
    }

    /// Payload for a check-in; fails until a level is selected
    pub fn check_in_at(
        draft: &MoodCheckInDraft,
        recorded_at: DateTime<Utc>,
    ) -> Result<MoodCheckIn, ComputeError> {
        let level = draft.selected().ok_or(ComputeError::MissingMoodLevel)?;
        Ok(MoodCheckIn {
            check_in_id: Uuid::new_v4().to_string(),
            producer: Self::producer(),
            level,
            notes: draft.notes().map(str::to_string),
            recorded_at,
        })
    }

    /// Encode a submission to JSON
    pub fn to_json<T: serde::Serialize>(payload: &T) -> Result<String, ComputeError> {
        serde_json::to_string(payload).map_err(ComputeError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::InstrumentCatalog;
    use crate::scoring::ScoringEngine;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 20, 30, 0).unwrap()
    }

    #[test]
    fn test_assessment_submission() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();
        let answers: AnswerSet = ["q1", "q2", "q3"]
            .into_iter()
            .map(|id| (id.to_string(), 2))
            .collect();
        let result = ScoringEngine::score(stress, &answers).unwrap();

        let submission = SubmissionEncoder::assessment_at(&result, &answers, fixed_time());
        let json: serde_json::Value =
            serde_json::from_str(&SubmissionEncoder::to_json(&submission).unwrap()).unwrap();

        assert_eq!(json["instrument_id"], "stress");
        assert_eq!(json["score"], 6);
        assert_eq!(json["category"], "Moderate");
        assert_eq!(json["answers"]["q2"], 2);
        assert_eq!(json["completed_at"], "2024-01-15T20:30:00Z");
        assert_eq!(json["producer"]["name"], "calmou-core");
        assert_eq!(json["producer"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(Uuid::parse_str(&submission.submission_id).is_ok());
    }

    #[test]
    fn test_check_in_requires_level() {
        let mut draft = MoodCheckInDraft::new();
        draft.set_notes("long day");

        assert!(matches!(
            SubmissionEncoder::check_in(&draft),
            Err(ComputeError::MissingMoodLevel)
        ));

        draft.select(MoodLevel::new(4).unwrap());
        let check_in = SubmissionEncoder::check_in_at(&draft, fixed_time()).unwrap();
        assert_eq!(check_in.level.get(), 4);
        assert_eq!(check_in.notes.as_deref(), Some("long day"));
        assert_eq!(check_in.producer, SubmissionEncoder::producer());
        assert_eq!(check_in.producer.name, PRODUCER_NAME);
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let mut draft = MoodCheckInDraft::new();
        draft.select(MoodLevel::new(2).unwrap());
        draft.set_notes("   ");

        let check_in = SubmissionEncoder::check_in_at(&draft, fixed_time()).unwrap();
        assert!(check_in.notes.is_none());

        let json = SubmissionEncoder::to_json(&check_in).unwrap();
        assert!(!json.contains("notes"));
        assert!(json.contains("\"level\":2"));
    }

    #[test]
    fn test_submission_ids_are_unique() {
        let mut draft = MoodCheckInDraft::new();
        draft.select(MoodLevel::new(3).unwrap());
        let a = SubmissionEncoder::check_in(&draft).unwrap();
        let b = SubmissionEncoder::check_in(&draft).unwrap();
        assert_ne!(a.check_in_id, b.check_in_id);
    }
}
