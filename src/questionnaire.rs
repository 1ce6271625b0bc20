//! Questionnaire progression
//!
//! Tracks one attempt at an instrument: the answers recorded so far and which
//! question is on screen. Completion is decided by answer-set completeness,
//! never by cursor position, so questions may be answered in any order.

use serde::Serialize;

use crate::error::ComputeError;
use crate::scoring::ScoringEngine;
use crate::types::{AnswerOption, AnswerSet, Instrument, Question, ScoringResult};

/// Lifecycle of a questionnaire attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionnaireState {
    NotStarted,
    InProgress,
    Completed,
}

/// Position of the cursor, 1-based, for "Question 2 of 3" style display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
    pub answered: usize,
}

/// One attempt at an instrument
#[derive(Debug, Clone)]
pub struct Questionnaire<'a> {
    instrument: &'a Instrument,
    answers: AnswerSet,
    cursor: usize,
    started: bool,
}

impl<'a> Questionnaire<'a> {
    pub fn new(instrument: &'a Instrument) -> Self {
        Self {
            instrument,
            answers: AnswerSet::new(),
            cursor: 0,
            started: false,
        }
    }

    /// Continue an attempt from previously recorded answers.
    ///
    /// The cursor lands on the first unanswered question, or the last one
    /// when everything is answered.
    pub fn resume(instrument: &'a Instrument, answers: AnswerSet) -> Self {
        let cursor = instrument
            .questions
            .iter()
            .position(|q| !answers.contains(&q.id))
            .unwrap_or_else(|| instrument.questions.len().saturating_sub(1));

        Self {
            instrument,
            answers,
            cursor,
            started: true,
        }
    }

    pub fn instrument(&self) -> &Instrument {
        self.instrument
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn state(&self) -> QuestionnaireState {
        if !self.started {
            QuestionnaireState::NotStarted
        } else if ScoringEngine::is_complete(self.instrument, &self.answers) {
            QuestionnaireState::Completed
        } else {
            QuestionnaireState::InProgress
        }
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    /// Question under the cursor; `None` before the attempt starts
    pub fn current_question(&self) -> Option<&'a Question> {
        if !self.started {
            return None;
        }
        self.instrument.questions.get(self.cursor)
    }

    /// Options for the question under the cursor
    pub fn current_options(&self) -> &'a [AnswerOption] {
        match self.current_question() {
            Some(question) => self.instrument.options_for(question),
            None => &[],
        }
    }

    /// Value already chosen for the question under the cursor
    pub fn selected(&self) -> Option<u32> {
        self.current_question().and_then(|q| self.answers.get(&q.id))
    }

    pub fn progress(&self) -> Progress {
        Progress {
            position: self.cursor + 1,
            total: self.instrument.questions.len(),
            answered: self
                .instrument
                .questions
                .iter()
                .filter(|q| self.answers.contains(&q.id))
                .count(),
        }
    }

    pub fn is_last_question(&self) -> bool {
        self.cursor + 1 >= self.instrument.questions.len()
    }

    /// Answer the question under the cursor, starting the attempt if needed
    pub fn answer(&mut self, value: u32) -> Result<(), ComputeError> {
        let instrument = self.instrument;
        let question = instrument.questions.get(self.cursor).ok_or_else(|| {
            ComputeError::InvalidInstrument {
                instrument_id: instrument.id.clone(),
                reason: "no questions".to_string(),
            }
        })?;
        self.answer_question(&question.id, value)
    }

    /// Answer any question by id, regardless of the cursor
    pub fn answer_question(
        &mut self,
        question_id: &str,
        value: u32,
    ) -> Result<(), ComputeError> {
        self.answers =
            ScoringEngine::record_answer(self.instrument, &self.answers, question_id, value)?;
        self.started = true;
        Ok(())
    }

    /// Move to the next question; returns false on the last one
    pub fn advance(&mut self) -> bool {
        if self.is_last_question() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Move to the previous question; returns false on the first one
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Questions still without an answer, in presentation order
    pub fn missing(&self) -> Vec<&'a Question> {
        ScoringEngine::missing_questions(self.instrument, &self.answers)
    }

    /// Score the attempt; fails with `IncompleteAnswers` until every
    /// question is answered
    pub fn finish(&self) -> Result<ScoringResult, ComputeError> {
        ScoringEngine::score(self.instrument, &self.answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::InstrumentCatalog;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_walkthrough_in_order() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();
        let mut attempt = Questionnaire::new(stress);

        assert_eq!(attempt.state(), QuestionnaireState::NotStarted);
        assert!(attempt.current_question().is_none());

        attempt.start();
        assert_eq!(attempt.state(), QuestionnaireState::InProgress);
        assert_eq!(attempt.current_question().unwrap().id, "q1");
        assert_eq!(attempt.current_options().len(), 5);

        attempt.answer(2).unwrap();
        assert!(attempt.advance());
        attempt.answer(2).unwrap();
        assert!(attempt.advance());
        assert!(attempt.is_last_question());
        assert_eq!(attempt.state(), QuestionnaireState::InProgress);

        attempt.answer(2).unwrap();
        assert!(!attempt.advance());
        assert_eq!(attempt.state(), QuestionnaireState::Completed);

        let result = attempt.finish().unwrap();
        assert_eq!(result.score, 6);
        assert_eq!(result.category, "Moderate");
    }

    #[test]
    fn test_reaching_last_question_is_not_completion() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();
        let mut attempt = Questionnaire::new(stress);
        attempt.start();
        attempt.advance();
        attempt.advance();
        attempt.answer(4).unwrap();

        assert!(attempt.is_last_question());
        assert_eq!(attempt.state(), QuestionnaireState::InProgress);

        let missing: Vec<&str> = attempt.missing().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(missing, vec!["q1", "q2"]);
        assert!(matches!(
            attempt.finish(),
            Err(ComputeError::IncompleteAnswers { .. })
        ));
    }

    #[test]
    fn test_answering_starts_the_attempt() {
        let catalog = InstrumentCatalog::default();
        let burnout = catalog.require("burnout").unwrap();
        let mut attempt = Questionnaire::new(burnout);

        attempt.answer_question("q3", 1).unwrap();
        assert_eq!(attempt.state(), QuestionnaireState::InProgress);
        assert_eq!(
            attempt.progress(),
            Progress {
                position: 1,
                total: 5,
                answered: 1
            }
        );
    }

    #[test]
    fn test_back_keeps_answers_and_allows_change() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();
        let mut attempt = Questionnaire::new(stress);
        attempt.start();

        assert!(!attempt.back());
        attempt.answer(1).unwrap();
        attempt.advance();
        assert!(attempt.back());
        assert_eq!(attempt.selected(), Some(1));

        attempt.answer(3).unwrap();
        assert_eq!(attempt.answers().get("q1"), Some(3));
        assert_eq!(attempt.answers().len(), 1);
    }

    #[test]
    fn test_invalid_value_leaves_answers_untouched() {
        let catalog = InstrumentCatalog::default();
        let anxiety = catalog.require("anxiety").unwrap();
        let mut attempt = Questionnaire::new(anxiety);

        assert!(attempt.answer(9).is_err());
        assert!(attempt.answers().is_empty());
        assert_eq!(attempt.state(), QuestionnaireState::NotStarted);

        assert!(attempt.answer_question("q9", 1).is_err());
        assert_eq!(attempt.state(), QuestionnaireState::NotStarted);
    }

    #[test]
    fn test_resume_positions_cursor_on_first_gap() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();
        let answers: AnswerSet = [("q1".to_string(), 0), ("q3".to_string(), 4)]
            .into_iter()
            .collect();

        let attempt = Questionnaire::resume(stress, answers);
        assert_eq!(attempt.current_question().unwrap().id, "q2");
        assert_eq!(attempt.state(), QuestionnaireState::InProgress);
    }

    #[test]
    fn test_resume_complete_attempt() {
        let catalog = InstrumentCatalog::default();
        let stress = catalog.require("stress").unwrap();
        let answers: AnswerSet = ["q1", "q2", "q3"]
            .into_iter()
            .map(|id| (id.to_string(), 3))
            .collect();

        let attempt = Questionnaire::resume(stress, answers);
        assert_eq!(attempt.state(), QuestionnaireState::Completed);
        assert!(attempt.is_last_question());
        assert_eq!(attempt.finish().unwrap().category, "High");
    }
}
