//! Surge detection module
//!
//! Keeps a short rolling-volume history per pair and flags pairs whose
//! volume jumped over the lookback window.

mod evaluator;
mod history;
mod types;

pub use evaluator::{auxiliary_condition, token_age_hours, SurgeEvaluator};
pub use history::{HistoryStore, DEFAULT_HISTORY_CAPACITY};
pub use types::{Observation, Severity, SurgeReport, SurgeVerdict};
