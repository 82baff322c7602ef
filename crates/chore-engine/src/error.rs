//! Error types for chore-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors signalled by rule validation and expansion.
///
/// A valid rule that matches nothing in the queried range is not an error;
/// expansion returns an empty list in that case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChoreError {
    /// A recurrence rule invariant is violated (zero interval, weekday index
    /// out of range, missing monthly pattern fields, end before start, ...).
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    /// The query range is inverted.
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A date string is not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Convenience alias used throughout chore-engine.
pub type Result<T> = std::result::Result<T, ChoreError>;
