use crate::types::{AnswerOption, Instrument, Question, Threshold};

/// Anxiety scale modelled on the GAD-7.
/// 7 items rated 0-3 over the last two weeks, total 0-21.
/// 0-4 minimal, 5-9 mild, 10-14 moderate, 15+ severe.
pub fn anxiety() -> Instrument {
    let items = [
        "Feeling nervous, anxious, or on edge",
        "Not being able to stop or control worrying",
        "Worrying too much about different things",
        "Trouble relaxing",
        "Being so restless that it is hard to sit still",
        "Becoming easily annoyed or irritable",
        "Feeling afraid, as if something awful might happen",
    ];

    let answer_options = [
        "Not at all",
        "Several days",
        "More than half the days",
        "Nearly every day",
    ]
    .iter()
    .enumerate()
    .map(|(value, label)| AnswerOption {
        label: label.to_string(),
        value: value as u32,
    })
    .collect();

    Instrument {
        id: "anxiety".to_string(),
        title: "Anxiety Scale (GAD-7)".to_string(),
        questions: items
            .iter()
            .enumerate()
            .map(|(i, text)| Question {
                id: format!("q{}", i + 1),
                text: text.to_string(),
                options: None,
            })
            .collect(),
        answer_options,
        thresholds: vec![
            Threshold::upto(4, "Minimal"),
            Threshold::upto(9, "Mild"),
            Threshold::upto(14, "Moderate"),
            Threshold::above("Severe"),
        ],
    }
}
