//! Self-assessment instrument definitions
//!
//! Instruments are immutable values. The built-in set is assembled into an
//! [`InstrumentCatalog`] which callers pass explicitly to whatever needs it, so
//! alternative sets (localized variants, test fixtures) can live side by side.

mod anxiety;
mod burnout;
mod stress;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ComputeError;
use crate::types::{AnswerOption, Instrument};

/// Frequency scale shared by the stress and burnout questionnaires
pub(crate) fn frequency_options() -> Vec<AnswerOption> {
    ["Never", "Almost never", "Sometimes", "Almost always", "Always"]
        .iter()
        .enumerate()
        .map(|(value, label)| AnswerOption {
            label: label.to_string(),
            value: value as u32,
        })
        .collect()
}

/// Build the built-in instruments in display order
pub fn default_instruments() -> Vec<Instrument> {
    vec![stress::stress(), burnout::burnout(), anxiety::anxiety()]
}

impl Instrument {
    /// Check the definition is internally consistent.
    ///
    /// Bounded thresholds must be strictly ascending and followed by exactly
    /// one catch-all band, which makes the bands exhaustive and
    /// non-overlapping over `[0, max_possible_score]`.
    pub fn validate(&self) -> Result<(), ComputeError> {
        let invalid = |reason: String| ComputeError::InvalidInstrument {
            instrument_id: self.id.clone(),
            reason,
        };

        if self.questions.is_empty() {
            return Err(invalid("no questions".to_string()));
        }

        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id.as_str()) {
                return Err(invalid(format!("duplicate question id '{}'", question.id)));
            }
            if self.options_for(question).is_empty() {
                return Err(invalid(format!(
                    "question '{}' has no answer options",
                    question.id
                )));
            }
        }

        if self.checked_max_possible_score().is_none() {
            return Err(invalid("maximum possible score overflows u32".to_string()));
        }

        let Some((last, bounded)) = self.thresholds.split_last() else {
            return Err(invalid("no thresholds".to_string()));
        };
        if last.upper_bound.is_some() {
            return Err(invalid("last threshold must be unbounded".to_string()));
        }

        let mut previous: Option<u32> = None;
        for threshold in bounded {
            let Some(bound) = threshold.upper_bound else {
                return Err(invalid(format!(
                    "threshold '{}' is unbounded but not last",
                    threshold.category
                )));
            };
            if previous.is_some_and(|p| bound <= p) {
                return Err(invalid(format!(
                    "threshold '{}' bound {} is not above the previous band",
                    threshold.category, bound
                )));
            }
            previous = Some(bound);
        }

        Ok(())
    }
}

/// Collection of instruments available to the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self {
            instruments: default_instruments(),
        }
    }
}

impl InstrumentCatalog {
    /// Build a catalog, rejecting invalid or duplicate definitions
    pub fn new(instruments: Vec<Instrument>) -> Result<Self, ComputeError> {
        let mut ids = HashSet::new();
        for instrument in &instruments {
            instrument.validate()?;
            if !ids.insert(instrument.id.as_str()) {
                return Err(ComputeError::InvalidInstrument {
                    instrument_id: instrument.id.clone(),
                    reason: "duplicate instrument id".to_string(),
                });
            }
        }
        Ok(Self { instruments })
    }

    /// Load a catalog from a JSON array of instruments
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let instruments: Vec<Instrument> = serde_json::from_str(json)?;
        Self::new(instruments)
    }

    /// Load a catalog from TOML with a top-level `[[instruments]]` array
    pub fn from_toml(content: &str) -> Result<Self, ComputeError> {
        let catalog: InstrumentCatalog = toml::from_str(content)?;
        Self::new(catalog.instruments)
    }

    pub fn get(&self, instrument_id: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == instrument_id)
    }

    /// Look up an instrument, failing with `UnknownInstrument`
    pub fn require(&self, instrument_id: &str) -> Result<&Instrument, ComputeError> {
        self.get(instrument_id)
            .ok_or_else(|| ComputeError::UnknownInstrument(instrument_id.to_string()))
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }
}
