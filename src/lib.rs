//! Calmou core - On-device compute for self-assessments and mood trends
//!
//! The mobile shell hands this crate raw answers and mood history; it returns
//! scores, risk bands and chart geometry through a deterministic pipeline.
//!
//! ## Modules
//!
//! - **Assessments**: instrument catalog → answer recording → scoring → submission payload
//! - **Mood chart**: report adapter → level normalization → projection → smoothed path and colors

pub mod adapters;
pub mod chart;
pub mod config;
pub mod error;
pub mod instruments;
pub mod normalizer;
pub mod pipeline;
pub mod questionnaire;
pub mod scoring;
pub mod submission;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use chart::{ChartLayout, ChartRender, ChartRenderer};
pub use config::CalmouConfig;
pub use error::ComputeError;
pub use instruments::InstrumentCatalog;
pub use pipeline::{score_assessment_json, weekly_report_to_chart_json, CalmouEngine};
pub use questionnaire::{Questionnaire, QuestionnaireState};
pub use scoring::ScoringEngine;
pub use submission::{MoodCheckInDraft, SubmissionEncoder};

// Data model exports
pub use types::{
    AnswerSet, Instrument, LevelPolicy, MoodEntry, MoodLevel, MoodSeries, ScoringResult,
};

/// Calmou core version, stamped on submission payloads and reported over FFI
pub const CALMOU_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for submission payloads
pub const PRODUCER_NAME: &str = "calmou-core";
