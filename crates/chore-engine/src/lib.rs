//! # chore-engine
//!
//! Deterministic recurrence expansion for household chore calendars.
//!
//! Given a recurrence rule (anchor date, frequency, interval, weekday or
//! monthly-position constraints, optional end date) and a query range, the
//! engine produces the ascending list of calendar dates the rule occurs on.
//! All dates are whole calendar days with no time-of-day or timezone.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{NaiveDate, Weekday};
//! use chore_engine::{expand, RecurrenceRule};
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
//!
//! // 2nd Tuesday of every month.
//! let rule = RecurrenceRule::monthly_nth_weekday(d(1, 1), 1, 2, Weekday::Tue).unwrap();
//! let dates = expand(&rule, d(1, 1), d(3, 31)).unwrap();
//! assert_eq!(dates, vec![d(1, 9), d(2, 13), d(3, 12)]);
//! ```
//!
//! ## Modules
//!
//! - [`rule`] — validated rule model and the flat stored record
//! - [`expander`] — rule + range → list of occurrence dates
//! - [`calendar`] — week and month arithmetic on calendar dates
//! - [`range`] — validated inclusive query range
//! - [`agenda`] — join occurrences with completion records
//! - [`error`] — Error types

pub mod agenda;
pub mod calendar;
pub mod error;
pub mod expander;
pub mod range;
pub mod rule;

pub use agenda::{build_agenda, AgendaEntry, Chore, Completion, Database, Member};
pub use calendar::parse_date;
pub use error::ChoreError;
pub use expander::{expand, expand_range};
pub use range::DateRange;
pub use rule::{
    Frequency, FrequencyKind, MonthlyPattern, NthWeek, RecurrenceRecord, RecurrenceRule,
    WeekdaySet,
};
