use super::frequency_options;
use crate::types::{Instrument, Question, Threshold};

/// Burnout prevention questionnaire: 5 items on a 0-4 frequency scale, total 0-20.
pub fn burnout() -> Instrument {
    let items = [
        "How often do you feel emotionally drained by your work?",
        "How often do you feel tired when you wake up and have to face another day at work?",
        "How often do you feel indifferent about the results of your work?",
        "How often do you find it hard to concentrate on your tasks?",
        "How often do you feel you have nothing left to give at the end of the day?",
    ];

    Instrument {
        id: "burnout".to_string(),
        title: "Burnout Prevention Questionnaire".to_string(),
        questions: items
            .iter()
            .enumerate()
            .map(|(i, text)| Question {
                id: format!("q{}", i + 1),
                text: text.to_string(),
                options: None,
            })
            .collect(),
        answer_options: frequency_options(),
        thresholds: vec![
            Threshold::upto(6, "Low"),
            Threshold::upto(13, "Moderate"),
            Threshold::above("High"),
        ],
    }
}
