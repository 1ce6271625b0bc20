//! Self-assessment scoring
//!
//! Converts a complete answer set into a numeric score and a category label
//! using the instrument's threshold table. Every operation is a pure function
//! of its inputs.

use tracing::debug;

use crate::error::ComputeError;
use crate::types::{AnswerSet, Instrument, Question, ScoringResult, Threshold};

/// Scoring engine for self-assessment instruments
pub struct ScoringEngine;

impl ScoringEngine {
    /// Return a new answer set with `question_id` set to `value`.
    ///
    /// Unknown questions and values outside the question's option set are
    /// rejected; the input set is never modified.
    pub fn record_answer(
        instrument: &Instrument,
        answers: &AnswerSet,
        question_id: &str,
        value: u32,
    ) -> Result<AnswerSet, ComputeError> {
        let question = instrument.question(question_id).ok_or_else(|| {
            ComputeError::UnknownQuestion {
                instrument_id: instrument.id.clone(),
                question_id: question_id.to_string(),
            }
        })?;

        if !instrument
            .options_for(question)
            .iter()
            .any(|o| o.value == value)
        {
            return Err(ComputeError::InvalidAnswerValue {
                question_id: question_id.to_string(),
                value,
            });
        }

        Ok(answers.with(question_id, value))
    }

    /// True iff every question of the instrument has an answer
    pub fn is_complete(instrument: &Instrument, answers: &AnswerSet) -> bool {
        instrument.questions.iter().all(|q| answers.contains(&q.id))
    }

    /// Unanswered questions, in presentation order
    pub fn missing_questions<'a>(
        instrument: &'a Instrument,
        answers: &AnswerSet,
    ) -> Vec<&'a Question> {
        instrument
            .questions
            .iter()
            .filter(|q| !answers.contains(&q.id))
            .collect()
    }

    /// Score a complete answer set
    pub fn score(
        instrument: &Instrument,
        answers: &AnswerSet,
    ) -> Result<ScoringResult, ComputeError> {
        let missing = Self::missing_questions(instrument, answers);
        if !missing.is_empty() {
            return Err(ComputeError::IncompleteAnswers {
                instrument_id: instrument.id.clone(),
                missing: missing.iter().map(|q| q.id.clone()).collect(),
            });
        }

        // Only the instrument's own questions count towards the total.
        let score = instrument
            .questions
            .iter()
            .filter_map(|q| answers.get(&q.id))
            .try_fold(0u32, u32::checked_add)
            .ok_or_else(|| ComputeError::InvalidInstrument {
                instrument_id: instrument.id.clone(),
                reason: "score overflows u32".to_string(),
            })?;

        let category = categorize(&instrument.thresholds, score).ok_or_else(|| {
            ComputeError::InvalidInstrument {
                instrument_id: instrument.id.clone(),
                reason: format!("no threshold band contains score {score}"),
            }
        })?;

        debug!(
            instrument = %instrument.id,
            score,
            category,
            "scored assessment"
        );

        Ok(ScoringResult {
            instrument_id: instrument.id.clone(),
            score,
            max_score: instrument.max_possible_score(),
            category: category.to_string(),
        })
    }
}

/// Resolve the category for a score.
///
/// Bands are tested in order; the first whose inclusive upper bound is at or
/// above the score wins, so a score equal to a bound belongs to the lower
/// band. Returns `None` only for tables without a catch-all.
pub fn categorize(thresholds: &[Threshold], score: u32) -> Option<&str> {
    thresholds
        .iter()
        .find(|t| t.admits(score))
        .map(|t| t.category.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::InstrumentCatalog;
    use crate::types::AnswerOption;
    use pretty_assertions::assert_eq;

    fn bands() -> Vec<Threshold> {
        vec![
            Threshold::upto(4, "Low"),
            Threshold::upto(8, "Moderate"),
            Threshold::above("High"),
        ]
    }

    fn answer_all(instrument: &Instrument, value: u32) -> AnswerSet {
        instrument
            .questions
            .iter()
            .try_fold(AnswerSet::new(), |answers, q| {
                ScoringEngine::record_answer(instrument, &answers, &q.id, value)
            })
            .unwrap()
    }

    #[test]
    fn test_stress_all_twos_is_moderate() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();

        let result = ScoringEngine::score(stress, &answer_all(stress, 2)).unwrap();

        assert_eq!(
            result,
            ScoringResult {
                instrument_id: "stress".to_string(),
                score: 6,
                max_score: 12,
                category: "Moderate".to_string(),
            }
        );
    }

    #[test]
    fn test_boundaries_resolve_to_lower_band() {
        let thresholds = bands();
        assert_eq!(categorize(&thresholds, 0), Some("Low"));
        assert_eq!(categorize(&thresholds, 4), Some("Low"));
        assert_eq!(categorize(&thresholds, 5), Some("Moderate"));
        assert_eq!(categorize(&thresholds, 8), Some("Moderate"));
        assert_eq!(categorize(&thresholds, 9), Some("High"));
        assert_eq!(categorize(&thresholds, 1_000), Some("High"));
    }

    #[test]
    fn test_every_score_has_exactly_one_band() {
        let catalog = InstrumentCatalog::default();
        for instrument in catalog.instruments() {
            for score in 0..=instrument.max_possible_score() {
                let mut lower = 0;
                let containing = instrument
                    .thresholds
                    .iter()
                    .filter(|t| {
                        let inside = score >= lower && t.admits(score);
                        lower = t.upper_bound.map_or(u32::MAX, |b| b + 1);
                        inside
                    })
                    .count();
                assert_eq!(containing, 1, "{} score {}", instrument.id, score);
            }
        }
    }

    #[test]
    fn test_out_of_order_answers_score_the_same() {
        let catalog = InstrumentCatalog::default();
        let anxiety = catalog.require("anxiety").unwrap();
        let values = [3, 0, 2, 1, 3, 2, 1];

        let in_order = anxiety
            .questions
            .iter()
            .zip(values)
            .fold(AnswerSet::new(), |answers, (q, v)| {
                ScoringEngine::record_answer(anxiety, &answers, &q.id, v).unwrap()
            });

        let reversed = anxiety
            .questions
            .iter()
            .zip(values)
            .rev()
            .fold(AnswerSet::new(), |answers, (q, v)| {
                ScoringEngine::record_answer(anxiety, &answers, &q.id, v).unwrap()
            });

        let a = ScoringEngine::score(anxiety, &in_order).unwrap();
        let b = ScoringEngine::score(anxiety, &reversed).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.score, 12);
        assert_eq!(a.category, "Moderate");
    }

    #[test]
    fn test_incomplete_always_fails() {
        let catalog = InstrumentCatalog::default();
        let burnout = catalog.require("burnout").unwrap();

        let mut answers = AnswerSet::new();
        for q in &burnout.questions {
            match ScoringEngine::score(burnout, &answers) {
                Err(ComputeError::IncompleteAnswers { missing, .. }) => {
                    assert_eq!(missing.len(), burnout.questions.len() - answers.len());
                }
                other => panic!("expected IncompleteAnswers, got {other:?}"),
            }
            answers = ScoringEngine::record_answer(burnout, &answers, &q.id, 1).unwrap();
        }

        assert!(ScoringEngine::is_complete(burnout, &answers));
        assert_eq!(ScoringEngine::score(burnout, &answers).unwrap().score, 5);
    }

    #[test]
    fn test_missing_questions_are_reported_in_order() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();
        let answers = ScoringEngine::record_answer(stress, &AnswerSet::new(), "q2", 4).unwrap();

        let missing: Vec<&str> = ScoringEngine::missing_questions(stress, &answers)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(missing, vec!["q1", "q3"]);

        let err = ScoringEngine::score(stress, &answers).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Assessment 'stress' is incomplete; unanswered: q1, q3"
        );
    }

    #[test]
    fn test_record_answer_overwrites_without_mutating_input() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();

        let first = ScoringEngine::record_answer(stress, &AnswerSet::new(), "q1", 1).unwrap();
        let second = ScoringEngine::record_answer(stress, &first, "q1", 3).unwrap();

        assert_eq!(first.get("q1"), Some(1));
        assert_eq!(second.get("q1"), Some(3));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_record_answer_rejects_contract_violations() {
        let catalog = InstrumentCatalog::default();
        let anxiety = catalog.require("anxiety").unwrap();

        assert!(matches!(
            ScoringEngine::record_answer(anxiety, &AnswerSet::new(), "q1", 4),
            Err(ComputeError::InvalidAnswerValue { value: 4, .. })
        ));
        assert!(matches!(
            ScoringEngine::record_answer(anxiety, &AnswerSet::new(), "q99", 1),
            Err(ComputeError::UnknownQuestion { .. })
        ));
    }

    #[test]
    fn test_foreign_answers_do_not_count() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();
        let answers: AnswerSet = [("q1", 1), ("q2", 1), ("q3", 1), ("extra", 4)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let result = ScoringEngine::score(stress, &answers).unwrap();
        assert_eq!(result.score, 3);
        assert_eq!(result.category, "Low");
    }

    #[test]
    fn test_score_is_deterministic() {
        let catalog = InstrumentCatalog::default();
        let burnout = catalog.require("burnout").unwrap();
        let answers = answer_all(burnout, 3);

        let a = ScoringEngine::score(burnout, &answers).unwrap();
        let b = ScoringEngine::score(burnout, &answers).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.category, "High");
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let heavy = Instrument {
            id: "heavy".to_string(),
            title: "Heavy".to_string(),
            questions: ["q1", "q2"]
                .iter()
                .map(|id| Question {
                    id: id.to_string(),
                    text: "Weight?".to_string(),
                    options: None,
                })
                .collect(),
            answer_options: vec![AnswerOption {
                label: "Heavy".to_string(),
                value: 4_000_000_000,
            }],
            thresholds: bands(),
        };
        let answers = answer_all(&heavy, 4_000_000_000);

        assert!(matches!(
            ScoringEngine::score(&heavy, &answers),
            Err(ComputeError::InvalidInstrument { .. })
        ));
    }
}
