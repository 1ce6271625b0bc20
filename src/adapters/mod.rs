//! Mood report adapters
//!
//! This module provides adapters that parse mood history JSON from the
//! backend and map it to raw, not yet validated, mood entries.

mod entry_list;
mod weekly_report;

pub use entry_list::EntryListAdapter;
pub use weekly_report::{WeeklyReport, WeeklyReportAdapter, WeeklyReportDataset};

use crate::error::ComputeError;
use crate::normalizer::{LevelNormalizer, NormalizedSeries};
use crate::types::{LevelPolicy, RawMoodEntry};

/// Trait for mood report adapters
pub trait MoodReportAdapter {
    /// Parse raw JSON into entries, in the order the report lists them
    fn parse(&self, raw_json: &str) -> Result<Vec<RawMoodEntry>, ComputeError>;

    /// Parse and normalize in one step
    fn parse_series(
        &self,
        raw_json: &str,
        policy: LevelPolicy,
    ) -> Result<NormalizedSeries, ComputeError> {
        let entries = self.parse(raw_json)?;
        LevelNormalizer::normalize(&entries, policy)
    }
}
