//! Public JSON API
//!
//! This module wires the scoring engine and chart renderer to JSON inputs and
//! outputs, the shape used by the FFI layer and the CLI.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::adapters::{MoodReportAdapter, WeeklyReportAdapter};
use crate::chart::{ChartLayout, ChartRender, ChartRenderer};
use crate::config::CalmouConfig;
use crate::error::ComputeError;
use crate::instruments::InstrumentCatalog;
use crate::normalizer::LevelAdjustment;
use crate::scoring::ScoringEngine;
use crate::types::{AnswerSet, Instrument, LevelPolicy, MoodSeries, ScoringResult};

/// Chart render plus any level clamping applied to the input
#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    #[serde(flatten)]
    pub render: ChartRender,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<LevelAdjustment>,
}

/// Parse `{"question_id": value, ...}` into a checked answer set.
///
/// Every entry goes through `record_answer`, so unknown questions and
/// values outside the option set are rejected.
pub fn parse_answers(instrument: &Instrument, answers_json: &str) -> Result<AnswerSet, ComputeError> {
    let raw: BTreeMap<String, u32> = serde_json::from_str(answers_json)?;
    raw.iter().try_fold(AnswerSet::new(), |answers, (question_id, value)| {
        ScoringEngine::record_answer(instrument, &answers, question_id, *value)
    })
}

/// Score an assessment given as JSON answers.
///
/// # Example
/// ```ignore
/// let result_json = score_assessment_json(&catalog, "stress", r#"{"q1":2,"q2":2,"q3":2}"#)?;
/// ```
pub fn score_assessment_json(
    catalog: &InstrumentCatalog,
    instrument_id: &str,
    answers_json: &str,
) -> Result<String, ComputeError> {
    let instrument = catalog.require(instrument_id)?;
    let answers = parse_answers(instrument, answers_json)?;
    let result = ScoringEngine::score(instrument, &answers)?;
    Ok(serde_json::to_string(&result)?)
}

/// Turn a weekly report JSON into chart geometry JSON.
///
/// # Example
/// ```ignore
/// let chart_json = weekly_report_to_chart_json(report_json, &ChartLayout::default(), LevelPolicy::Reject)?;
/// ```
pub fn weekly_report_to_chart_json(
    report_json: &str,
    layout: &ChartLayout,
    policy: LevelPolicy,
) -> Result<String, ComputeError> {
    let response = render_report(&WeeklyReportAdapter, report_json, layout, policy)?;
    Ok(serde_json::to_string(&response)?)
}

/// Parse, normalize and render a report with any adapter
pub fn render_report(
    adapter: &dyn MoodReportAdapter,
    report_json: &str,
    layout: &ChartLayout,
    policy: LevelPolicy,
) -> Result<ChartResponse, ComputeError> {
    let normalized = adapter.parse_series(report_json, policy)?;
    let render = ChartRenderer::new(*layout).render(&normalized.series);
    Ok(ChartResponse {
        render,
        adjustments: normalized.adjustments,
    })
}

/// Configured entry point holding the catalog, default layout and policy.
///
/// Use this when the app shell keeps one instance for its lifetime.
pub struct CalmouEngine {
    catalog: InstrumentCatalog,
    renderer: ChartRenderer,
    policy: LevelPolicy,
}

impl Default for CalmouEngine {
    fn default() -> Self {
        Self::new(
            InstrumentCatalog::default(),
            ChartLayout::default(),
            LevelPolicy::default(),
        )
    }
}

impl CalmouEngine {
    pub fn new(catalog: InstrumentCatalog, layout: ChartLayout, policy: LevelPolicy) -> Self {
        Self {
            catalog,
            renderer: ChartRenderer::new(layout),
            policy,
        }
    }

    /// Build an engine from configuration, loading its instrument file if set
    pub fn from_config(config: &CalmouConfig) -> Result<Self, ComputeError> {
        Ok(Self::new(config.catalog()?, config.chart, config.level_policy))
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> LevelPolicy {
        self.policy
    }

    pub fn score(
        &self,
        instrument_id: &str,
        answers: &AnswerSet,
    ) -> Result<ScoringResult, ComputeError> {
        ScoringEngine::score(self.catalog.require(instrument_id)?, answers)
    }

    pub fn score_json(&self, instrument_id: &str, answers_json: &str) -> Result<String, ComputeError> {
        score_assessment_json(&self.catalog, instrument_id, answers_json)
    }

    pub fn render(&self, series: &MoodSeries) -> ChartRender {
        self.renderer.render(series)
    }

    /// Render a weekly report with the configured layout
    pub fn chart_json(&self, report_json: &str) -> Result<String, ComputeError> {
        weekly_report_to_chart_json(report_json, self.renderer.layout(), self.policy)
    }

    /// Render a weekly report on a surface of the given size, keeping the
    /// configured padding. Non-finite sizes are rejected.
    pub fn chart_json_sized(
        &self,
        report_json: &str,
        width: f64,
        height: f64,
    ) -> Result<String, ComputeError> {
        let layout = self.renderer.layout().resized(width, height)?;
        weekly_report_to_chart_json(report_json, &layout, self.policy)
    }

    /// The catalog as a JSON array of instruments
    pub fn instruments_json(&self) -> Result<String, ComputeError> {
        Ok(serde_json::to_string(self.catalog.instruments())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Padding;

    fn sample_report() -> &'static str {
        r#"{
            "labels": ["Mon", "Tue"],
            "datasets": [{ "data": [3, 5] }]
        }"#
    }

    #[test]
    fn test_score_assessment_json() {
        let catalog = InstrumentCatalog::default();
        let json = score_assessment_json(&catalog, "stress", r#"{"q1": 2, "q2": 2, "q3": 2}"#)
            .unwrap();

        let result: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(result["score"], 6);
        assert_eq!(result["category"], "Moderate");
        assert_eq!(result["max_score"], 12);
    }

    #[test]
    fn test_score_incomplete_json() {
        let catalog = InstrumentCatalog::default();
        let result = score_assessment_json(&catalog, "stress", r#"{"q1": 2}"#);

        match result {
            Err(ComputeError::IncompleteAnswers { missing, .. }) => {
                assert_eq!(missing, vec!["q2".to_string(), "q3".to_string()]);
            }
            other => panic!("expected IncompleteAnswers, got {other:?}"),
        }
    }

    #[test]
    fn test_score_rejects_bad_input() {
        let catalog = InstrumentCatalog::default();
        assert!(matches!(
            score_assessment_json(&catalog, "sleep", "{}"),
            Err(ComputeError::UnknownInstrument(_))
        ));
        assert!(matches!(
            score_assessment_json(&catalog, "stress", r#"{"q1": 7}"#),
            Err(ComputeError::InvalidAnswerValue { .. })
        ));
        assert!(matches!(
            score_assessment_json(&catalog, "stress", "not json"),
            Err(ComputeError::JsonError(_))
        ));
    }

    #[test]
    fn test_weekly_report_to_chart_json() {
        let layout = ChartLayout::new(300.0, 240.0, Padding::uniform(20.0));
        let json = weekly_report_to_chart_json(sample_report(), &layout, LevelPolicy::Reject)
            .unwrap();

        let chart: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(chart["state"], "plotted");
        assert_eq!(chart["points"][0]["y"], 120.0);
        assert_eq!(chart["points"][1]["y"], 20.0);
        assert!(chart.get("adjustments").is_none());
    }

    #[test]
    fn test_empty_report_renders_placeholder() {
        let json = weekly_report_to_chart_json(
            r#"{"labels": [], "datasets": [{"data": []}]}"#,
            &ChartLayout::default(),
            LevelPolicy::Reject,
        )
        .unwrap();

        let chart: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(chart["state"], "empty");
        assert!(chart["message"].as_str().is_some());
    }

    #[test]
    fn test_clamped_report_lists_adjustments() {
        let engine = CalmouEngine::new(
            InstrumentCatalog::default(),
            ChartLayout::default(),
            LevelPolicy::Clamp,
        );
        let json = engine
            .chart_json(r#"{"labels": ["Mon"], "datasets": [{"data": [8]}]}"#)
            .unwrap();

        let chart: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(chart["points"][0]["level"], 5);
        assert_eq!(chart["adjustments"][0]["raw_level"], 8);
    }

    #[test]
    fn test_engine_sized_chart_keeps_padding() {
        let engine = CalmouEngine::default();
        let json = engine.chart_json_sized(sample_report(), 400.0, 300.0).unwrap();

        let chart: serde_json::Value = serde_json::from_str(&json).unwrap();
        // Default padding: left 40, right 20.
        assert_eq!(chart["points"][0]["x"], 40.0);
        assert_eq!(chart["points"][1]["x"], 380.0);
    }

    #[test]
    fn test_engine_sized_chart_rejects_non_finite_size() {
        let engine = CalmouEngine::default();
        assert!(matches!(
            engine.chart_json_sized(sample_report(), 400.0, f64::NAN),
            Err(ComputeError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_engine_instruments_json() {
        let engine = CalmouEngine::default();
        let json = engine.instruments_json().unwrap();
        let instruments: Vec<Instrument> = serde_json::from_str(&json).unwrap();
        assert_eq!(instruments.len(), 3);
        assert_eq!(instruments[0].id, "stress");
    }
}
