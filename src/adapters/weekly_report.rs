//! Weekly mood report adapter
//!
//! Parses the chart-ready report served by the mood history endpoint:
//! `{ "labels": [...], "datasets": [{ "data": [...] }] }`.

use serde::{Deserialize, Serialize};

use super::MoodReportAdapter;
use crate::error::ComputeError;
use crate::types::RawMoodEntry;

/// Weekly report payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<WeeklyReportDataset>,
}

/// One data series of the report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReportDataset {
    #[serde(default)]
    pub data: Vec<i64>,
}

/// Weekly report adapter
pub struct WeeklyReportAdapter;

impl WeeklyReportAdapter {
    /// Pair labels with the first dataset's values
    pub fn to_entries(report: &WeeklyReport) -> Result<Vec<RawMoodEntry>, ComputeError> {
        let data = report
            .datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or_default();

        if data.len() != report.labels.len() {
            return Err(ComputeError::ParseError(format!(
                "{} labels but {} values",
                report.labels.len(),
                data.len()
            )));
        }

        Ok(report
            .labels
            .iter()
            .zip(data)
            .map(|(label, level)| RawMoodEntry {
                label: label.clone(),
                level: *level,
            })
            .collect())
    }
}

impl MoodReportAdapter for WeeklyReportAdapter {
    fn parse(&self, raw_json: &str) -> Result<Vec<RawMoodEntry>, ComputeError> {
        let report: WeeklyReport = serde_json::from_str(raw_json)?;
        Self::to_entries(&report)
    }
}
