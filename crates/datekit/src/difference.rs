//! Signed differences between two date-times, counted in whole units.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::{DateError, Result};
use crate::format;
use crate::unit::CalendarUnit;

/// The number of whole `unit`s from `start` to `end`.
///
/// Negative when `end` is before `start`. Partial units are dropped, rounding
/// toward zero.
///
/// Calendar units (year, month, week, day) only count a unit once the
/// time-of-day of `start` has been reached on the final day: from
/// `01-01 12:00` to `01-02 11:00` is zero days. Months compare the day of
/// month, so January 31 to February 29 is zero months, and years are whole
/// twelve-month runs. Clock units measure the exact elapsed duration.
///
/// # Errors
///
/// Returns [`DateError::OutOfRange`] if the count does not fit in an `i64`
/// (only reachable for microseconds and nanoseconds over very long spans).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datekit::{between, CalendarUnit};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// assert_eq!(between(start, end, CalendarUnit::Month).unwrap(), 1);
/// assert_eq!(between(start, end, CalendarUnit::Day).unwrap(), 31);
/// ```
pub fn between(start: NaiveDateTime, end: NaiveDateTime, unit: CalendarUnit) -> Result<i64> {
    let elapsed = end - start;
    let count = match unit {
        CalendarUnit::Year | CalendarUnit::Month | CalendarUnit::Week | CalendarUnit::Day => {
            return Ok(calendar_between(start, end, unit));
        }
        CalendarUnit::Hour => Some(elapsed.num_hours()),
        CalendarUnit::Minute => Some(elapsed.num_minutes()),
        CalendarUnit::Second => Some(elapsed.num_seconds()),
        CalendarUnit::Milli => Some(elapsed.num_milliseconds()),
        CalendarUnit::Micro => elapsed.num_microseconds(),
        CalendarUnit::Nano => elapsed.num_nanoseconds(),
    };
    count.ok_or_else(|| {
        DateError::OutOfRange(format!("{unit}s between {start} and {end} overflow i64"))
    })
}

fn calendar_between(start: NaiveDateTime, end: NaiveDateTime, unit: CalendarUnit) -> i64 {
    let start_date = start.date();
    let mut end_date = end.date();

    // The last day only counts once start's time-of-day has been reached.
    if end_date > start_date && end.time() < start.time() {
        end_date = end_date.pred_opt().unwrap_or(end_date);
    } else if end_date < start_date && end.time() > start.time() {
        end_date = end_date.succ_opt().unwrap_or(end_date);
    }

    match unit {
        CalendarUnit::Year => months_between(start_date, end_date) / 12,
        CalendarUnit::Month => months_between(start_date, end_date),
        CalendarUnit::Week => (end_date - start_date).num_days() / 7,
        _ => (end_date - start_date).num_days(),
    }
}

/// Whole months between two dates, comparing the day of month.
fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    // Pack (month index, day) so one subtraction orders both fields.
    let packed = |d: NaiveDate| {
        (i64::from(d.year()) * 12 + i64::from(d.month0())) * 32 + i64::from(d.day())
    };
    (packed(end) - packed(start)) / 32
}

/// Whole days between two calendar dates.
pub fn days_between_dates(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// [`between`] for two date-time strings sharing one letter-token pattern.
///
/// # Errors
///
/// Returns [`DateError::Parse`] or [`DateError::InvalidPattern`] if either
/// input cannot be read with `pattern`, plus the errors of [`between`].
pub fn between_str(start: &str, end: &str, pattern: &str, unit: CalendarUnit) -> Result<i64> {
    let start = format::parse_date_time(start, pattern)?;
    let end = format::parse_date_time(end, pattern)?;
    between(start, end, unit)
}

/// Whole hours between two date-time strings.
///
/// # Errors
///
/// See [`between_str`].
pub fn hours_between_str(start: &str, end: &str, pattern: &str) -> Result<i64> {
    between_str(start, end, pattern, CalendarUnit::Hour)
}

/// Whole days between two date-time strings.
///
/// # Errors
///
/// See [`between_str`].
pub fn days_between_str(start: &str, end: &str, pattern: &str) -> Result<i64> {
    between_str(start, end, pattern, CalendarUnit::Day)
}

/// Days between two date-only strings, such as `yyyy-MM-dd` values.
///
/// # Errors
///
/// Returns [`DateError::Parse`] or [`DateError::InvalidPattern`] if either
/// input cannot be read with `pattern`.
pub fn days_between_dates_str(start: &str, end: &str, pattern: &str) -> Result<i64> {
    let start = format::parse_date(start, pattern)?;
    let end = format::parse_date(end, pattern)?;
    Ok(days_between_dates(start, end))
}
