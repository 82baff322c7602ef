//! Recurrence rule model.
//!
//! [`RecurrenceRule`] is a validated, immutable value: the frequency and its
//! pattern fields form a tagged union, so a rule that exists is a rule that can
//! be expanded. Rules cross the storage boundary as the flat
//! [`RecurrenceRecord`] and are validated on the way in.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{weekday_from_index, weekday_index, SUNDAY_FIRST};
use crate::error::{ChoreError, Result};

/// A set of weekdays, iterated Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn single(weekday: Weekday) -> Self {
        Self::EMPTY.with(weekday)
    }

    #[must_use]
    pub fn with(self, weekday: Weekday) -> Self {
        WeekdaySet(self.0 | 1 << weekday_index(weekday))
    }

    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday_index(weekday)) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        SUNDAY_FIRST.into_iter().filter(move |w| self.contains(*w))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, WeekdaySet::with)
    }
}

/// Position of a weekday within a month, 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NthWeek(u8);

impl NthWeek {
    pub fn new(n: u8) -> Result<Self> {
        if (1..=5).contains(&n) {
            Ok(NthWeek(n))
        } else {
            Err(ChoreError::InvalidRule(format!(
                "nthWeek must be between 1 and 5, got {}",
                n
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Which day of each eligible month a monthly rule lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonthlyPattern {
    /// Same day-of-month as the anchor, clamped to the month's last day.
    #[default]
    DayOfMonth,
    /// The `nth` occurrence of `weekday`, counted from the 1st.
    NthWeekday { nth: NthWeek, weekday: Weekday },
    /// The last occurrence of `weekday` in the month.
    LastWeekday { weekday: Weekday },
}

/// How often a rule repeats, with the fields each frequency needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// A single occurrence on the anchor date.
    Once,
    /// Every `interval` days.
    Daily { interval: NonZeroU32 },
    /// Every `interval` days; the stored format keeps it distinct from Daily.
    Custom { interval: NonZeroU32 },
    /// On `days` (anchor weekday when empty) of every `interval`-th week.
    Weekly { interval: NonZeroU32, days: WeekdaySet },
    /// On `days` (anchor weekday when empty) of every other week.
    Biweekly { days: WeekdaySet },
    /// Every `interval` months, on the day selected by `pattern`.
    Monthly {
        interval: NonZeroU32,
        pattern: MonthlyPattern,
    },
}

impl Frequency {
    pub fn kind(&self) -> FrequencyKind {
        match self {
            Frequency::Once => FrequencyKind::Once,
            Frequency::Daily { .. } => FrequencyKind::Daily,
            Frequency::Custom { .. } => FrequencyKind::Custom,
            Frequency::Weekly { .. } => FrequencyKind::Weekly,
            Frequency::Biweekly { .. } => FrequencyKind::Biweekly,
            Frequency::Monthly { .. } => FrequencyKind::Monthly,
        }
    }
}

/// A validated recurrence rule.
///
/// Construct through the frequency-specific constructors or by converting a
/// [`RecurrenceRecord`]. Serde goes through the record, so deserializing a
/// rule validates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecurrenceRecord", into = "RecurrenceRecord")]
pub struct RecurrenceRule {
    start: NaiveDate,
    end: Option<NaiveDate>,
    frequency: Frequency,
}

fn interval(n: u32) -> Result<NonZeroU32> {
    NonZeroU32::new(n)
        .ok_or_else(|| ChoreError::InvalidRule("interval must be at least 1".to_string()))
}

impl RecurrenceRule {
    /// A rule with no end date.
    pub fn new(start: NaiveDate, frequency: Frequency) -> Self {
        Self {
            start,
            end: None,
            frequency,
        }
    }

    pub fn once(start: NaiveDate) -> Self {
        Self::new(start, Frequency::Once)
    }

    pub fn daily(start: NaiveDate, every_days: u32) -> Result<Self> {
        Ok(Self::new(
            start,
            Frequency::Daily {
                interval: interval(every_days)?,
            },
        ))
    }

    pub fn custom(start: NaiveDate, every_days: u32) -> Result<Self> {
        Ok(Self::new(
            start,
            Frequency::Custom {
                interval: interval(every_days)?,
            },
        ))
    }

    pub fn weekly(
        start: NaiveDate,
        every_weeks: u32,
        days: impl IntoIterator<Item = Weekday>,
    ) -> Result<Self> {
        Ok(Self::new(
            start,
            Frequency::Weekly {
                interval: interval(every_weeks)?,
                days: days.into_iter().collect(),
            },
        ))
    }

    pub fn biweekly(start: NaiveDate, days: impl IntoIterator<Item = Weekday>) -> Self {
        Self::new(
            start,
            Frequency::Biweekly {
                days: days.into_iter().collect(),
            },
        )
    }

    pub fn monthly(start: NaiveDate, every_months: u32, pattern: MonthlyPattern) -> Result<Self> {
        Ok(Self::new(
            start,
            Frequency::Monthly {
                interval: interval(every_months)?,
                pattern,
            },
        ))
    }

    pub fn monthly_nth_weekday(
        start: NaiveDate,
        every_months: u32,
        nth: u8,
        weekday: Weekday,
    ) -> Result<Self> {
        let nth = NthWeek::new(nth)?;
        Self::monthly(
            start,
            every_months,
            MonthlyPattern::NthWeekday { nth, weekday },
        )
    }

    pub fn monthly_last_weekday(
        start: NaiveDate,
        every_months: u32,
        weekday: Weekday,
    ) -> Result<Self> {
        Self::monthly(start, every_months, MonthlyPattern::LastWeekday { weekday })
    }

    /// Bound the rule by an inclusive end date.
    ///
    /// # Errors
    /// Returns `ChoreError::InvalidRule` if `end` precedes the start date.
    pub fn until(self, end: NaiveDate) -> Result<Self> {
        if end < self.start {
            return Err(ChoreError::InvalidRule(format!(
                "endDate {} is before startDate {}",
                end, self.start
            )));
        }
        Ok(Self {
            end: Some(end),
            ..self
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }
}

// ---------------------------------------------------------------------------
// Stored record
// ---------------------------------------------------------------------------

/// Frequency tag of the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrequencyKind {
    Once,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Custom,
}

/// Monthly pattern tag of the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthlyPatternKind {
    #[default]
    DayOfMonth,
    NthWeekday,
    LastWeekday,
}

fn default_interval() -> i64 {
    1
}

/// The flat, unvalidated shape a rule is stored in.
///
/// Numeric fields are signed so out-of-range input survives parsing and is
/// rejected by validation with a message naming the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRecord {
    #[serde(rename = "type")]
    pub kind: FrequencyKind,
    #[serde(default = "default_interval")]
    pub interval: i64,
    #[serde(default)]
    pub days_of_week: Vec<i64>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_pattern: Option<MonthlyPatternKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nth_week: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<i64>,
}

fn checked_weekday(field: &str, index: i64) -> Result<Weekday> {
    weekday_from_index(index).ok_or_else(|| {
        ChoreError::InvalidRule(format!(
            "{} must be a weekday index between 0 and 6, got {}",
            field, index
        ))
    })
}

fn required<T>(value: Option<T>, field: &str, pattern: &str) -> Result<T> {
    value.ok_or_else(|| ChoreError::InvalidRule(format!("{} is required for {}", field, pattern)))
}

impl RecurrenceRecord {
    fn checked_interval(&self) -> Result<NonZeroU32> {
        u32::try_from(self.interval)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                ChoreError::InvalidRule(format!(
                    "interval must be a positive integer, got {}",
                    self.interval
                ))
            })
    }

    fn checked_days(&self) -> Result<WeekdaySet> {
        let mut days = WeekdaySet::EMPTY;
        for &index in &self.days_of_week {
            let weekday = checked_weekday("daysOfWeek", index)?;
            if days.contains(weekday) {
                return Err(ChoreError::InvalidRule(format!(
                    "daysOfWeek contains {} more than once",
                    index
                )));
            }
            days = days.with(weekday);
        }
        Ok(days)
    }

    fn checked_pattern(&self) -> Result<MonthlyPattern> {
        match self.monthly_pattern.unwrap_or_default() {
            MonthlyPatternKind::DayOfMonth => Ok(MonthlyPattern::DayOfMonth),
            MonthlyPatternKind::NthWeekday => {
                let nth = required(self.nth_week, "nthWeek", "nthWeekday")?;
                let nth = u8::try_from(nth)
                    .map_err(|_| {
                        ChoreError::InvalidRule(format!(
                            "nthWeek must be between 1 and 5, got {}",
                            nth
                        ))
                    })
                    .and_then(NthWeek::new)?;
                let weekday = required(self.weekday, "weekday", "nthWeekday")?;
                Ok(MonthlyPattern::NthWeekday {
                    nth,
                    weekday: checked_weekday("weekday", weekday)?,
                })
            }
            MonthlyPatternKind::LastWeekday => {
                let weekday = required(self.weekday, "weekday", "lastWeekday")?;
                Ok(MonthlyPattern::LastWeekday {
                    weekday: checked_weekday("weekday", weekday)?,
                })
            }
        }
    }
}

impl TryFrom<RecurrenceRecord> for RecurrenceRule {
    type Error = ChoreError;

    fn try_from(record: RecurrenceRecord) -> Result<Self> {
        // Invariants hold for every record, whether or not the frequency reads the field.
        let interval = record.checked_interval()?;
        let days = record.checked_days()?;
        if let Some(nth) = record.nth_week {
            if !(1..=5).contains(&nth) {
                return Err(ChoreError::InvalidRule(format!(
                    "nthWeek must be between 1 and 5, got {}",
                    nth
                )));
            }
        }
        if let Some(weekday) = record.weekday {
            checked_weekday("weekday", weekday)?;
        }

        let frequency = match record.kind {
            FrequencyKind::Once => Frequency::Once,
            FrequencyKind::Daily => Frequency::Daily { interval },
            FrequencyKind::Custom => Frequency::Custom { interval },
            FrequencyKind::Weekly => Frequency::Weekly { interval, days },
            FrequencyKind::Biweekly => Frequency::Biweekly { days },
            FrequencyKind::Monthly => Frequency::Monthly {
                interval,
                pattern: record.checked_pattern()?,
            },
        };

        let rule = RecurrenceRule::new(record.start_date, frequency);
        match record.end_date {
            Some(end) => rule.until(end),
            None => Ok(rule),
        }
    }
}

impl From<RecurrenceRule> for RecurrenceRecord {
    fn from(rule: RecurrenceRule) -> Self {
        let mut record = RecurrenceRecord {
            kind: rule.frequency.kind(),
            interval: 1,
            days_of_week: Vec::new(),
            start_date: rule.start,
            end_date: rule.end,
            monthly_pattern: None,
            nth_week: None,
            weekday: None,
        };

        match rule.frequency {
            Frequency::Once => {}
            Frequency::Daily { interval } | Frequency::Custom { interval } => {
                record.interval = i64::from(interval.get());
            }
            Frequency::Weekly { interval, days } => {
                record.interval = i64::from(interval.get());
                record.days_of_week = days.iter().map(|w| i64::from(weekday_index(w))).collect();
            }
            Frequency::Biweekly { days } => {
                record.interval = 2;
                record.days_of_week = days.iter().map(|w| i64::from(weekday_index(w))).collect();
            }
            Frequency::Monthly { interval, pattern } => {
                record.interval = i64::from(interval.get());
                match pattern {
                    MonthlyPattern::DayOfMonth => {
                        record.monthly_pattern = Some(MonthlyPatternKind::DayOfMonth);
                    }
                    MonthlyPattern::NthWeekday { nth, weekday } => {
                        record.monthly_pattern = Some(MonthlyPatternKind::NthWeekday);
                        record.nth_week = Some(i64::from(nth.get()));
                        record.weekday = Some(i64::from(weekday_index(weekday)));
                    }
                    MonthlyPattern::LastWeekday { weekday } => {
                        record.monthly_pattern = Some(MonthlyPatternKind::LastWeekday);
                        record.weekday = Some(i64::from(weekday_index(weekday)));
                    }
                }
            }
        }

        record
    }
}

// ---------------------------------------------------------------------------
// Human-readable summary
// ---------------------------------------------------------------------------

const ORDINALS: [&str; 5] = ["1st", "2nd", "3rd", "4th", "5th"];

fn short_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

fn write_every(f: &mut fmt::Formatter<'_>, label: &str, n: NonZeroU32, unit: &str) -> fmt::Result {
    if n.get() > 1 {
        write!(f, "Every {} {}", n, unit)
    } else {
        f.write_str(label)
    }
}

fn write_days(f: &mut fmt::Formatter<'_>, days: WeekdaySet) -> fmt::Result {
    if days.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = days.iter().map(short_name).collect();
    write!(f, " ({})", names.join(", "))
}

/// Short label such as `Weekly (Mon, Wed, Fri)` or `Every 2 months (Last Fri)`.
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frequency {
            Frequency::Once => f.write_str("One-time"),
            Frequency::Daily { interval } => write_every(f, "Daily", interval, "days"),
            Frequency::Custom { interval } => write_every(f, "Custom", interval, "days"),
            Frequency::Weekly { interval, days } => {
                write_every(f, "Weekly", interval, "weeks")?;
                write_days(f, days)
            }
            Frequency::Biweekly { days } => {
                f.write_str("Biweekly")?;
                write_days(f, days)
            }
            Frequency::Monthly { interval, pattern } => {
                write_every(f, "Monthly", interval, "months")?;
                match pattern {
                    MonthlyPattern::DayOfMonth => Ok(()),
                    MonthlyPattern::NthWeekday { nth, weekday } => write!(
                        f,
                        " ({} {})",
                        ORDINALS[usize::from(nth.get() - 1)],
                        short_name(weekday)
                    ),
                    MonthlyPattern::LastWeekday { weekday } => {
                        write!(f, " (Last {})", short_name(weekday))
                    }
                }
            }
        }
    }
}
