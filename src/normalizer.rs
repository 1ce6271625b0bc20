//! Mood level normalization
//!
//! Upstream reports carry plain integers. This module turns them into
//! validated [`MoodLevel`]s according to the configured [`LevelPolicy`]:
//! - `Reject` fails on the first level outside 1..=5
//! - `Clamp` pulls it into range and records the adjustment

use serde::Serialize;
use tracing::warn;

use crate::error::ComputeError;
use crate::types::{LevelPolicy, MoodEntry, MoodLevel, MoodSeries, RawMoodEntry};

/// A level that was changed while normalizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelAdjustment {
    pub index: usize,
    pub label: String,
    pub raw_level: i64,
    pub level: MoodLevel,
}

/// Series ready for rendering plus any clamping that happened on the way
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedSeries {
    pub series: MoodSeries,
    pub adjustments: Vec<LevelAdjustment>,
}

/// Normalizer for raw mood entries
pub struct LevelNormalizer;

impl LevelNormalizer {
    /// Validate raw entries, preserving their order
    pub fn normalize(
        entries: &[RawMoodEntry],
        policy: LevelPolicy,
    ) -> Result<NormalizedSeries, ComputeError> {
        let mut adjustments = Vec::new();
        let mut normalized = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let level = match (MoodLevel::new(entry.level), policy) {
                (Some(level), _) => level,
                (None, LevelPolicy::Reject) => {
                    return Err(ComputeError::InvalidMoodLevel(entry.level));
                }
                (None, LevelPolicy::Clamp) => {
                    let level = MoodLevel::clamped(entry.level);
                    warn!(
                        index,
                        label = %entry.label,
                        raw_level = entry.level,
                        level = level.get(),
                        "clamped out-of-range mood level"
                    );
                    adjustments.push(LevelAdjustment {
                        index,
                        label: entry.label.clone(),
                        raw_level: entry.level,
                        level,
                    });
                    level
                }
            };
            normalized.push(MoodEntry {
                label: entry.label.clone(),
                level,
            });
        }

        Ok(NormalizedSeries {
            series: MoodSeries::new(normalized),
            adjustments,
        })
    }
}
