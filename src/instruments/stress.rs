use super::frequency_options;
use crate::types::{Instrument, Question, Threshold};

/// Perceived stress check: 3 items on a 0-4 frequency scale, total 0-12.
pub fn stress() -> Instrument {
    let items = [
        "How often have you felt nervous or stressed in the last week?",
        "How often have you felt unable to control the important things in your life?",
        "How often have you felt difficulties were piling up so high that you could not overcome them?",
    ];

    Instrument {
        id: "stress".to_string(),
        title: "Stress Level Test".to_string(),
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
            Threshold::upto(4, "Low"),
            Threshold::upto(8, "Moderate"),
            Threshold::above("High"),
        ],
    }
}
