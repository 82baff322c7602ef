//! Calendar arithmetic on whole days: week anchors, month stepping, and
//! positional weekdays within a month.
//!
//! Weeks are Sunday-first, matching the 0=Sunday weekday indexing used by the
//! stored rule format.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::{ChoreError, Result};

/// Weekdays in index order: 0 = Sunday through 6 = Saturday.
pub const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ChoreError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Weekday for a 0=Sunday index, or `None` outside 0..=6.
pub fn weekday_from_index(index: i64) -> Option<Weekday> {
    usize::try_from(index)
        .ok()
        .and_then(|i| SUNDAY_FIRST.get(i).copied())
}

/// 0=Sunday index of a weekday.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Sunday on or before `date`, or `None` when that Sunday precedes
/// `NaiveDate::MIN`.
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date)
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Add whole months, clamping to the last day of the target month when the
/// day-of-month does not exist there (Jan 31 + 1 month = Feb 28/29).
pub fn add_months_clamped(date: NaiveDate, months: u64) -> Option<NaiveDate> {
    let months = u32::try_from(months).ok()?;
    date.checked_add_months(Months::new(months))
}

/// Number of month boundaries between the months containing `from` and `to`.
/// Negative when `to` lies in an earlier month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// The `nth` (1-based) `weekday` of the month containing `month`, counted
/// from the 1st. `None` when the month has fewer than `nth` such weekdays.
pub fn nth_weekday_of_month(month: NaiveDate, nth: u8, weekday: Weekday) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(month.year(), month.month(), weekday, nth)
}

/// The latest `weekday` in the month containing `month`.
pub fn last_weekday_of_month(month: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let last = last_of_month(month)?;
    let back = (7 + last.weekday().num_days_from_sunday() - weekday.num_days_from_sunday()) % 7;
    last.checked_sub_days(Days::new(u64::from(back)))
}
