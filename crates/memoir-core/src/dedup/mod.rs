//! Duplicate detection for incoming timeline events.
//!
//! This module implements a tiered cascade for deciding whether an
//! extracted candidate already exists on a timeline:
//! - Exact: identical title and date
//! - Fuzzy: weighted Levenshtein plus date proximity
//! - Oracle: LLM adjudication for borderline scores
//!
//! Batches partition into unique and duplicate candidates, with progress
//! reporting and cooperative cancellation for long imports.

pub mod adjudicator;
pub mod engine;
pub mod similarity;
pub mod types;

pub use adjudicator::{LlmAdjudicator, DEFAULT_ORACLE_TIMEOUT};
pub use engine::DedupEngine;
pub use similarity::*;
pub use types::*;
