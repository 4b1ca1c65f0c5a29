//! Performance review engine.
//!
//! The `reviews` module carries the whole evaluation pipeline: questionnaire
//! resolution, 9-box scoring, evaluation lifecycle and locking, goal/KPI
//! roll-ups, gap analysis, and the audited admin override. Storage and audit
//! logging are trait seams so the engine runs against any backing store.

pub mod config;
pub mod error;
pub mod reviews;
pub mod telemetry;
