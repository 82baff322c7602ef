//! Recurrence expansion -- turns a [`RecurrenceRule`] and a query range into the
//! concrete calendar dates the rule occurs on.
//!
//! Expansion is a single forward scan per frequency class. Each scan starts at
//! the first step that can reach the query window instead of walking from the
//! anchor, so the work done is proportional to the span of the query range.
//! Output is strictly ascending with no duplicates.

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::calendar::{
    add_months_clamped, first_of_month, last_weekday_of_month, months_between,
    nth_weekday_of_month, week_start,
};
use crate::error::Result;
use crate::range::DateRange;
use crate::rule::{Frequency, MonthlyPattern, RecurrenceRule, WeekdaySet};

/// Expand a rule into the dates it occurs on within `[range_start, range_end]`.
///
/// Every returned date also lies within the rule's own `[start, end]` window.
///
/// # Errors
/// Returns `ChoreError::InvalidRange` if `range_start > range_end`.
pub fn expand(
    rule: &RecurrenceRule,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    let range = DateRange::new(range_start, range_end)?;
    Ok(expand_range(rule, &range))
}

/// Expand a rule over an already validated range.
pub fn expand_range(rule: &RecurrenceRule, range: &DateRange) -> Vec<NaiveDate> {
    // The effective window is the query range intersected with the rule's validity.
    let Some(window) = range.clamp_to(rule.start(), rule.end()) else {
        debug!(rule = %rule, %range, "rule window does not intersect query range");
        return Vec::new();
    };

    let anchor = rule.start();
    let dates = match *rule.frequency() {
        Frequency::Once if window.contains(anchor) => vec![anchor],
        Frequency::Once => Vec::new(),
        Frequency::Daily { interval } | Frequency::Custom { interval } => {
            expand_days(anchor, u64::from(interval.get()), &window)
        }
        Frequency::Weekly { interval, days } => {
            expand_weeks(anchor, u64::from(interval.get()), days, &window)
        }
        Frequency::Biweekly { days } => expand_weeks(anchor, 2, days, &window),
        Frequency::Monthly { interval, pattern } => {
            let every = u64::from(interval.get());
            match pattern {
                MonthlyPattern::DayOfMonth => expand_day_of_month(anchor, every, &window),
                MonthlyPattern::NthWeekday { nth, weekday } => {
                    expand_month_positions(anchor, every, &window, |month| {
                        nth_weekday_of_month(month, nth.get(), weekday)
                    })
                }
                MonthlyPattern::LastWeekday { weekday } => {
                    expand_month_positions(anchor, every, &window, |month| {
                        last_weekday_of_month(month, weekday)
                    })
                }
            }
        }
    };

    debug!(
        rule = %rule,
        %range,
        occurrences = dates.len(),
        "expanded recurrence rule"
    );
    dates
}

/// Smallest step index `k >= 0` such that `k * step >= offset`.
fn first_step_reaching(offset: i64, step: u64) -> u64 {
    match u64::try_from(offset) {
        Ok(offset) if offset > 0 => offset.div_ceil(step),
        _ => 0,
    }
}

/// `date + k * step` days, or `None` past the representable calendar.
fn nth_step(date: NaiveDate, k: u64, step: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(k.checked_mul(step)?))
}

/// Daily and custom rules: every `step` days from the anchor.
fn expand_days(anchor: NaiveDate, step: u64, window: &DateRange) -> Vec<NaiveDate> {
    let k = first_step_reaching((window.start() - anchor).num_days(), step);

    let mut dates = Vec::new();
    let mut cursor = nth_step(anchor, k, step);
    while let Some(day) = cursor.filter(|d| *d <= window.end()) {
        dates.push(day);
        cursor = day.checked_add_days(Days::new(step));
    }
    dates
}

/// Weekly and biweekly rules: walk week anchors (Sundays) every `every_weeks`
/// weeks from the week containing the rule's anchor date.
fn expand_weeks(
    anchor: NaiveDate,
    every_weeks: u64,
    days: WeekdaySet,
    window: &DateRange,
) -> Vec<NaiveDate> {
    let days = if days.is_empty() {
        WeekdaySet::single(anchor.weekday())
    } else {
        days
    };
    let step = every_weeks * 7;
    let Some(first_week) = week_start(anchor) else {
        debug!(%anchor, "anchor week starts before the representable calendar");
        return Vec::new();
    };

    // First visited week whose Saturday reaches the window start.
    let k = first_step_reaching((window.start() - first_week).num_days() - 6, step);

    let mut dates = Vec::new();
    let mut week = nth_step(first_week, k, step);
    while let Some(sunday) = week.filter(|w| *w <= window.end()) {
        for day in sunday.iter_days().take(7) {
            if day > window.end() {
                break;
            }
            if day >= window.start() && days.contains(day.weekday()) {
                dates.push(day);
            }
        }
        week = sunday.checked_add_days(Days::new(step));
    }
    dates
}

/// Monthly on the anchor's day-of-month. Each occurrence is computed from the
/// anchor so a clamped short month does not shift later occurrences.
fn expand_day_of_month(anchor: NaiveDate, every_months: u64, window: &DateRange) -> Vec<NaiveDate> {
    // Earlier steps land in months before the window; the first step reached may
    // still fall before the window start within its month and is filtered below.
    let mut k = first_step_reaching(months_between(anchor, window.start()), every_months);

    let mut dates = Vec::new();
    while let Some(day) = k
        .checked_mul(every_months)
        .and_then(|months| add_months_clamped(anchor, months))
    {
        if day > window.end() {
            break;
        }
        if day >= window.start() {
            dates.push(day);
        }
        k += 1;
    }
    dates
}

/// Monthly on a positional weekday. `pick` returns the occurrence within the
/// month starting at the given 1st, or `None` when the month has none.
fn expand_month_positions<F>(
    anchor: NaiveDate,
    every_months: u64,
    window: &DateRange,
    pick: F,
) -> Vec<NaiveDate>
where
    F: Fn(NaiveDate) -> Option<NaiveDate>,
{
    let first_month = first_of_month(anchor);
    let mut k = first_step_reaching(months_between(first_month, window.start()), every_months);

    let mut dates = Vec::new();
    while let Some(month) = k
        .checked_mul(every_months)
        .and_then(|months| add_months_clamped(first_month, months))
    {
        if month > window.end() {
            break;
        }
        if let Some(day) = pick(month).filter(|d| window.contains(*d)) {
            dates.push(day);
        }
        k += 1;
    }
    dates
}
