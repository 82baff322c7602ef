//! Tests for recurrence expansion, one section per frequency class.

use chore_engine::{expand, ChoreError, DateRange, RecurrenceRule};
use chrono::{NaiveDate, Weekday};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ---------------------------------------------------------------------------
// Once
// ---------------------------------------------------------------------------

#[test]
fn once_inside_range_yields_start_date() {
    let rule = RecurrenceRule::once(d(2024, 3, 15));
    let result = expand(&rule, d(2024, 3, 1), d(2024, 3, 31)).expect("should expand");
    assert_eq!(result, vec![d(2024, 3, 15)]);
}

#[test]
fn once_on_range_boundaries_is_included() {
    let rule = RecurrenceRule::once(d(2024, 3, 15));
    assert_eq!(
        expand(&rule, d(2024, 3, 15), d(2024, 3, 20)).unwrap(),
        vec![d(2024, 3, 15)]
    );
    assert_eq!(
        expand(&rule, d(2024, 3, 1), d(2024, 3, 15)).unwrap(),
        vec![d(2024, 3, 15)]
    );
}

#[test]
fn once_outside_range_yields_nothing() {
    let rule = RecurrenceRule::once(d(2024, 3, 15));
    assert!(expand(&rule, d(2024, 4, 1), d(2024, 4, 30)).unwrap().is_empty());
    assert!(expand(&rule, d(2024, 3, 1), d(2024, 3, 14)).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Daily / Custom
// ---------------------------------------------------------------------------

#[test]
fn daily_interval_two() {
    let rule = RecurrenceRule::daily(d(2024, 1, 1), 2).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 1, 10)).expect("should expand");
    assert_eq!(
        result,
        vec![
            d(2024, 1, 1),
            d(2024, 1, 3),
            d(2024, 1, 5),
            d(2024, 1, 7),
            d(2024, 1, 9)
        ]
    );
}

#[test]
fn daily_stops_at_end_date_inside_range() {
    let rule = RecurrenceRule::daily(d(2024, 1, 1), 1)
        .unwrap()
        .until(d(2024, 1, 5))
        .unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    assert_eq!(result.len(), 5);
    assert_eq!(result.last(), Some(&d(2024, 1, 5)));
}

#[test]
fn daily_keeps_phase_when_range_starts_years_later() {
    // 2020-01-01 to 2024-01-01 is 1461 days, a multiple of 3.
    let rule = RecurrenceRule::daily(d(2020, 1, 1), 3).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 1, 10)).unwrap();
    assert_eq!(
        result,
        vec![d(2024, 1, 1), d(2024, 1, 4), d(2024, 1, 7), d(2024, 1, 10)]
    );
}

#[test]
fn daily_phase_when_range_starts_between_steps() {
    let rule = RecurrenceRule::daily(d(2024, 1, 1), 5).unwrap();
    let result = expand(&rule, d(2024, 1, 8), d(2024, 1, 20)).unwrap();
    assert_eq!(result, vec![d(2024, 1, 11), d(2024, 1, 16)]);
}

#[test]
fn custom_steps_like_daily() {
    let custom = RecurrenceRule::custom(d(2024, 2, 27), 3).unwrap();
    let daily = RecurrenceRule::daily(d(2024, 2, 27), 3).unwrap();
    let range = (d(2024, 2, 1), d(2024, 3, 10));
    let result = expand(&custom, range.0, range.1).unwrap();
    assert_eq!(result, expand(&daily, range.0, range.1).unwrap());
    // Crosses the leap day.
    assert_eq!(
        result,
        vec![d(2024, 2, 27), d(2024, 3, 1), d(2024, 3, 4), d(2024, 3, 7), d(2024, 3, 10)]
    );
}

// ---------------------------------------------------------------------------
// Weekly / Biweekly
// ---------------------------------------------------------------------------

#[test]
fn weekly_mon_wed_fri() {
    // 2024-01-01 is a Monday.
    let rule = RecurrenceRule::weekly(
        d(2024, 1, 1),
        1,
        [Weekday::Mon, Weekday::Wed, Weekday::Fri],
    )
    .unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 1, 14)).expect("should expand");
    assert_eq!(
        result,
        vec![
            d(2024, 1, 1),
            d(2024, 1, 3),
            d(2024, 1, 5),
            d(2024, 1, 8),
            d(2024, 1, 10),
            d(2024, 1, 12)
        ]
    );
}

#[test]
fn weekly_without_days_uses_start_weekday() {
    // 2024-01-03 is a Wednesday; the range starting on a Monday must not matter.
    let rule = RecurrenceRule::weekly(d(2024, 1, 3), 1, Vec::new()).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    assert_eq!(
        result,
        vec![
            d(2024, 1, 3),
            d(2024, 1, 10),
            d(2024, 1, 17),
            d(2024, 1, 24),
            d(2024, 1, 31)
        ]
    );
}

#[test]
fn weekly_skips_anchor_week_days_before_start() {
    // Anchor week runs Sun 2023-12-31 .. Sat 2024-01-06. Mon Jan 1 precedes
    // the Wednesday start and is skipped; Fri Jan 5 is kept.
    let rule = RecurrenceRule::weekly(d(2024, 1, 3), 2, [Weekday::Mon, Weekday::Fri]).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    assert_eq!(
        result,
        vec![d(2024, 1, 5), d(2024, 1, 15), d(2024, 1, 19), d(2024, 1, 29)]
    );
}

#[test]
fn weekly_sunday_is_first_day_of_week() {
    // Start on a Saturday with Sunday selected: the anchor week's Sunday is
    // before the start, so the first Sunday comes from the next visited week.
    let rule = RecurrenceRule::weekly(d(2024, 1, 6), 3, [Weekday::Sun, Weekday::Sat]).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 2, 29)).unwrap();
    assert_eq!(
        result,
        vec![d(2024, 1, 6), d(2024, 1, 21), d(2024, 1, 27), d(2024, 2, 11), d(2024, 2, 17)]
    );
}

#[test]
fn biweekly_alternates_weeks() {
    let rule = RecurrenceRule::biweekly(d(2024, 1, 2), [Weekday::Tue, Weekday::Thu]);
    let result = expand(&rule, d(2024, 1, 1), d(2024, 2, 10)).unwrap();
    assert_eq!(
        result,
        vec![
            d(2024, 1, 2),
            d(2024, 1, 4),
            d(2024, 1, 16),
            d(2024, 1, 18),
            d(2024, 1, 30),
            d(2024, 2, 1)
        ]
    );
}

#[test]
fn weekly_end_date_cuts_mid_week() {
    let rule = RecurrenceRule::weekly(
        d(2024, 1, 1),
        1,
        [Weekday::Mon, Weekday::Wed, Weekday::Fri],
    )
    .unwrap()
    .until(d(2024, 1, 10))
    .unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 12, 31)).unwrap();
    assert_eq!(
        result,
        vec![
            d(2024, 1, 1),
            d(2024, 1, 3),
            d(2024, 1, 5),
            d(2024, 1, 8),
            d(2024, 1, 10)
        ]
    );
}

#[test]
fn weekly_range_far_from_anchor_keeps_alternation() {
    // Every 2 weeks on Monday from 2024-01-01: week index 26 is 2024-07-01.
    let rule = RecurrenceRule::weekly(d(2024, 1, 1), 2, [Weekday::Mon]).unwrap();
    let result = expand(&rule, d(2024, 6, 26), d(2024, 7, 20)).unwrap();
    assert_eq!(result, vec![d(2024, 7, 1), d(2024, 7, 15)]);
}

#[test]
fn weekly_anchor_at_calendar_floor_does_not_panic() {
    let min = NaiveDate::MIN;
    let rule = RecurrenceRule::weekly(min, 1, [Weekday::Sun, Weekday::Wed]).unwrap();
    let to = min.checked_add_days(chrono::Days::new(20)).unwrap();
    let result = expand(&rule, min, to).unwrap();
    assert!(result.windows(2).all(|w| w[0] < w[1]));
    assert!(result.iter().all(|d| *d >= min && *d <= to));
}

// ---------------------------------------------------------------------------
// Monthly
// ---------------------------------------------------------------------------

#[test]
fn monthly_second_tuesday() {
    let rule = RecurrenceRule::monthly_nth_weekday(d(2024, 1, 1), 1, 2, Weekday::Tue).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 3, 31)).expect("should expand");
    assert_eq!(result, vec![d(2024, 1, 9), d(2024, 2, 13), d(2024, 3, 12)]);
}

#[test]
fn monthly_last_friday() {
    let rule = RecurrenceRule::monthly_last_weekday(d(2024, 1, 1), 1, Weekday::Fri).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 2, 29)).expect("should expand");
    assert_eq!(result, vec![d(2024, 1, 26), d(2024, 2, 23)]);
}

#[test]
fn monthly_fifth_sunday_skips_short_months() {
    // Dec 2023 and Mar 2024 have five Sundays; Jan and Feb 2024 have four.
    let rule = RecurrenceRule::monthly_nth_weekday(d(2023, 12, 1), 1, 5, Weekday::Sun).unwrap();
    let result = expand(&rule, d(2023, 12, 1), d(2024, 3, 31)).unwrap();
    assert_eq!(result, vec![d(2023, 12, 31), d(2024, 3, 31)]);

    let feb_only = expand(&rule, d(2024, 2, 1), d(2024, 2, 29)).unwrap();
    assert!(feb_only.is_empty(), "February 2024 has no 5th Sunday");
}

#[test]
fn monthly_nth_weekday_before_start_in_anchor_month_is_skipped() {
    let rule = RecurrenceRule::monthly_nth_weekday(d(2024, 1, 15), 1, 2, Weekday::Tue).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 2, 29)).unwrap();
    assert_eq!(result, vec![d(2024, 2, 13)]);
}

#[test]
fn monthly_last_friday_every_other_month() {
    let rule = RecurrenceRule::monthly_last_weekday(d(2024, 1, 1), 2, Weekday::Fri).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 12, 31)).unwrap();
    assert_eq!(
        result,
        vec![
            d(2024, 1, 26),
            d(2024, 3, 29),
            d(2024, 5, 31),
            d(2024, 7, 26),
            d(2024, 9, 27),
            d(2024, 11, 29)
        ]
    );
}

#[test]
fn monthly_day_of_month_clamps_to_last_day() {
    let rule = RecurrenceRule::monthly(d(2024, 1, 31), 1, Default::default()).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 5, 31)).unwrap();
    assert_eq!(
        result,
        vec![
            d(2024, 1, 31),
            d(2024, 2, 29),
            d(2024, 3, 31),
            d(2024, 4, 30),
            d(2024, 5, 31)
        ]
    );
}

#[test]
fn monthly_day_of_month_clamps_in_common_year() {
    let rule = RecurrenceRule::monthly(d(2023, 1, 30), 1, Default::default()).unwrap();
    let result = expand(&rule, d(2023, 2, 1), d(2023, 3, 31)).unwrap();
    assert_eq!(result, vec![d(2023, 2, 28), d(2023, 3, 30)]);
}

#[test]
fn monthly_quarterly_from_previous_year() {
    let rule = RecurrenceRule::monthly(d(2023, 1, 15), 3, Default::default()).unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 12, 31)).unwrap();
    assert_eq!(
        result,
        vec![d(2024, 1, 15), d(2024, 4, 15), d(2024, 7, 15), d(2024, 10, 15)]
    );
}

#[test]
fn monthly_range_starting_after_day_in_month() {
    let rule = RecurrenceRule::monthly(d(2024, 1, 20), 1, Default::default()).unwrap();
    let result = expand(&rule, d(2024, 3, 25), d(2024, 5, 31)).unwrap();
    assert_eq!(result, vec![d(2024, 4, 20), d(2024, 5, 20)]);
}

// ---------------------------------------------------------------------------
// Boundaries and errors
// ---------------------------------------------------------------------------

#[test]
fn end_date_before_range_yields_nothing() {
    let rule = RecurrenceRule::daily(d(2024, 1, 1), 1)
        .unwrap()
        .until(d(2024, 1, 31))
        .unwrap();
    assert!(expand(&rule, d(2024, 2, 1), d(2024, 2, 29)).unwrap().is_empty());
}

#[test]
fn start_after_range_yields_nothing() {
    let rule = RecurrenceRule::weekly(d(2024, 6, 1), 1, [Weekday::Sat]).unwrap();
    assert!(expand(&rule, d(2024, 1, 1), d(2024, 5, 31)).unwrap().is_empty());
}

#[test]
fn inverted_range_is_an_error_not_empty() {
    let rule = RecurrenceRule::once(d(2024, 1, 1));
    let err = expand(&rule, d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, ChoreError::InvalidRange { .. }));
}

#[test]
fn end_date_is_inclusive() {
    let rule = RecurrenceRule::monthly_last_weekday(d(2024, 1, 1), 1, Weekday::Fri)
        .unwrap()
        .until(d(2024, 2, 23))
        .unwrap();
    let result = expand(&rule, d(2024, 1, 1), d(2024, 12, 31)).unwrap();
    assert_eq!(result, vec![d(2024, 1, 26), d(2024, 2, 23)]);
}

#[test]
fn expand_range_matches_expand() {
    let rule = RecurrenceRule::daily(d(2024, 1, 1), 4).unwrap();
    let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    assert_eq!(
        chore_engine::expand_range(&rule, &range),
        expand(&rule, range.start(), range.end()).unwrap()
    );
}
