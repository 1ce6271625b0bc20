//! Entry list adapter
//!
//! Parses a plain JSON array of `{ "label": ..., "level": ... }` records.

use super::MoodReportAdapter;
use crate::error::ComputeError;
use crate::types::RawMoodEntry;

/// Entry list adapter
pub struct EntryListAdapter;

impl MoodReportAdapter for EntryListAdapter {
    fn parse(&self, raw_json: &str) -> Result<Vec<RawMoodEntry>, ComputeError> {
        let entries: Vec<RawMoodEntry> = serde_json::from_str(raw_json)?;
        Ok(entries)
    }
}
