//! Start and end boundaries of the calendar unit containing a date.
//!
//! # The day span is half-open
//!
//! Year, month and week spans are closed: `end` is the last day that belongs
//! to the unit. A day span is the exception: [`bounds_of_unit`] returns the
//! *following* day as its end, so callers must read it as `[start, end)`.
//! [`time_bounds_of_unit`] does not carry that over: its day span ends at the
//! last nanosecond of the original day. Both behaviours are relied on by
//! existing callers and are kept as they are.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{DateError, Result};
use crate::unit::CalendarUnit;

/// The boundaries of one calendar-unit instance. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span<T> {
    pub start: T,
    pub end: T,
}

impl<T: PartialOrd> Span<T> {
    /// Whether `value` lies in the closed range `[start, end]`.
    pub fn contains(&self, value: &T) -> bool {
        &self.start <= value && value <= &self.end
    }
}

/// The date span of the `unit` containing `date`.
///
/// - [`Year`](CalendarUnit::Year): January 1 to December 31.
/// - [`Month`](CalendarUnit::Month): the first to the last day of the month.
/// - [`Week`](CalendarUnit::Week): Monday to Sunday (ISO 8601).
/// - [`Day`](CalendarUnit::Day): `date` to `date + 1`, **half-open**.
///
/// # Errors
///
/// Returns [`DateError::UnsupportedUnit`] for clock units, and
/// [`DateError::OutOfRange`] at the very ends of the calendar range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datekit::{bounds_of_unit, CalendarUnit};
///
/// let date = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
/// let span = bounds_of_unit(date, CalendarUnit::Month).unwrap();
/// assert_eq!(span.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
pub fn bounds_of_unit(date: NaiveDate, unit: CalendarUnit) -> Result<Span<NaiveDate>> {
    let (start, end) = match unit {
        CalendarUnit::Year => (
            NaiveDate::from_ymd_opt(date.year(), 1, 1),
            NaiveDate::from_ymd_opt(date.year(), 12, 31),
        ),
        CalendarUnit::Month => {
            let first = date.with_day(1);
            let last = first
                .and_then(|d| d.checked_add_months(Months::new(1)))
                .and_then(|d| d.pred_opt());
            (first, last)
        }
        CalendarUnit::Week => {
            let from_monday = u64::from(date.weekday().num_days_from_monday());
            let monday = date.checked_sub_days(chrono::Days::new(from_monday));
            let sunday = monday.and_then(|d| d.checked_add_days(chrono::Days::new(6)));
            (monday, sunday)
        }
        CalendarUnit::Day => (Some(date), date.succ_opt()),
        other => {
            tracing::debug!(unit = %other, "no calendar span for clock unit");
            return Err(DateError::UnsupportedUnit(other));
        }
    };

    match (start, end) {
        (Some(start), Some(end)) => Ok(Span { start, end }),
        _ => Err(DateError::OutOfRange(format!(
            "{unit} containing {date} extends past the calendar range"
        ))),
    }
}

/// The date-time span of the `unit` containing `date`.
///
/// `start` is midnight of the span's first day and `end` is
/// 23:59:59.999999999 of its last day. For [`Day`](CalendarUnit::Day) the end
/// is the last instant of `date` itself, even though [`bounds_of_unit`] hands
/// back the following day.
///
/// # Errors
///
/// Same as [`bounds_of_unit`].
pub fn time_bounds_of_unit(date: NaiveDate, unit: CalendarUnit) -> Result<Span<NaiveDateTime>> {
    let span = bounds_of_unit(date, unit)?;
    let last_day = match unit {
        CalendarUnit::Day => span.start,
        _ => span.end,
    };
    Ok(Span {
        start: start_of_day(span.start),
        end: end_of_day(last_day),
    })
}

/// 00:00:00.000000000 on `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999999999 on `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(last_nanosecond())
}

/// 00:00:00.000000000 on the day after `date`.
///
/// # Errors
///
/// Returns [`DateError::OutOfRange`] for the last representable date.
pub fn start_of_next_day(date: NaiveDate) -> Result<NaiveDateTime> {
    date.succ_opt()
        .map(start_of_day)
        .ok_or_else(|| DateError::OutOfRange(format!("no day after {date}")))
}

fn last_nanosecond() -> NaiveTime {
    NaiveTime::MIN - chrono::TimeDelta::nanoseconds(1)
}

// ── Comparison primitives ───────────────────────────────────────────────────

/// `a == b`
pub fn is_equal(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// `a < b`
pub fn less_than(a: NaiveDate, b: NaiveDate) -> bool {
    a < b
}

/// `a <= b`
pub fn less_than_or_equal(a: NaiveDate, b: NaiveDate) -> bool {
    a <= b
}

/// `a > b`
pub fn greater_than(a: NaiveDate, b: NaiveDate) -> bool {
    a > b
}

/// `a >= b`
pub fn greater_than_or_equal(a: NaiveDate, b: NaiveDate) -> bool {
    a >= b
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── bounds_of_unit ──────────────────────────────────────────────────

    #[test]
    fn test_year_bounds() {
        let span = bounds_of_unit(ymd(2021, 10, 16), CalendarUnit::Year).unwrap();
        assert_eq!(span, Span { start: ymd(2021, 1, 1), end: ymd(2021, 12, 31) });
    }

    #[test]
    fn test_month_bounds_leap_february() {
        let span = bounds_of_unit(ymd(2024, 2, 10), CalendarUnit::Month).unwrap();
        assert_eq!(span, Span { start: ymd(2024, 2, 1), end: ymd(2024, 2, 29) });
    }

    #[test]
    fn test_month_bounds_common_february() {
        let span = bounds_of_unit(ymd(2023, 2, 28), CalendarUnit::Month).unwrap();
        assert_eq!(span.end, ymd(2023, 2, 28));
    }

    #[test]
    fn test_month_bounds_december() {
        let span = bounds_of_unit(ymd(2023, 12, 1), CalendarUnit::Month).unwrap();
        assert_eq!(span, Span { start: ymd(2023, 12, 1), end: ymd(2023, 12, 31) });
    }

    #[test]
    fn test_week_bounds_midweek() {
        // 2021-10-16 is a Saturday.
        let span = bounds_of_unit(ymd(2021, 10, 16), CalendarUnit::Week).unwrap();
        assert_eq!(span, Span { start: ymd(2021, 10, 11), end: ymd(2021, 10, 17) });
    }

    #[test]
    fn test_week_bounds_on_sunday_stays_in_week() {
        let span = bounds_of_unit(ymd(2021, 10, 17), CalendarUnit::Week).unwrap();
        assert_eq!(span.start, ymd(2021, 10, 11));
    }

    #[test]
    fn test_week_bounds_across_year_end() {
        let span = bounds_of_unit(ymd(2025, 1, 1), CalendarUnit::Week).unwrap();
        assert_eq!(span, Span { start: ymd(2024, 12, 30), end: ymd(2025, 1, 5) });
    }

    #[test]
    fn test_day_bounds_end_is_next_day() {
        let span = bounds_of_unit(ymd(2024, 2, 29), CalendarUnit::Day).unwrap();
        assert_eq!(span, Span { start: ymd(2024, 2, 29), end: ymd(2024, 3, 1) });
    }

    #[test]
    fn test_clock_units_unsupported() {
        for unit in CalendarUnit::ALL.into_iter().filter(|u| u.is_time_based()) {
            let err = bounds_of_unit(ymd(2024, 1, 1), unit).unwrap_err();
            assert_eq!(err, DateError::UnsupportedUnit(unit));
        }
    }

    #[test]
    fn test_day_bounds_at_calendar_end() {
        let err = bounds_of_unit(NaiveDate::MAX, CalendarUnit::Day).unwrap_err();
        assert!(matches!(err, DateError::OutOfRange(_)));
    }

    // ── time_bounds_of_unit ─────────────────────────────────────────────

    #[test]
    fn test_time_bounds_day_end_is_same_day() {
        let span = time_bounds_of_unit(ymd(2021, 10, 16), CalendarUnit::Day).unwrap();
        assert_eq!(span.start, ymd(2021, 10, 16).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            span.end,
            ymd(2021, 10, 16).and_hms_nano_opt(23, 59, 59, 999_999_999).unwrap()
        );
    }

    #[test]
    fn test_time_bounds_month() {
        let span = time_bounds_of_unit(ymd(2021, 4, 9), CalendarUnit::Month).unwrap();
        assert_eq!(span.start, start_of_day(ymd(2021, 4, 1)));
        assert_eq!(span.end, end_of_day(ymd(2021, 4, 30)));
    }

    #[test]
    fn test_time_bounds_week() {
        let span = time_bounds_of_unit(ymd(2021, 10, 13), CalendarUnit::Week).unwrap();
        assert_eq!(span.start, start_of_day(ymd(2021, 10, 11)));
        assert_eq!(span.end, end_of_day(ymd(2021, 10, 17)));
    }

    #[test]
    fn test_time_bounds_unsupported() {
        assert_eq!(
            time_bounds_of_unit(ymd(2021, 10, 13), CalendarUnit::Minute).unwrap_err(),
            DateError::UnsupportedUnit(CalendarUnit::Minute)
        );
    }

    // ── day helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_end_of_day_is_last_nanosecond() {
        let end = end_of_day(ymd(2024, 1, 1));
        assert_eq!(end.hour(), 23);
        assert_eq!(end.nanosecond(), 999_999_999);
        assert_eq!(end + chrono::TimeDelta::nanoseconds(1), start_of_day(ymd(2024, 1, 2)));
    }

    #[test]
    fn test_start_of_next_day() {
        assert_eq!(
            start_of_next_day(ymd(2024, 12, 31)).unwrap(),
            start_of_day(ymd(2025, 1, 1))
        );
        assert!(start_of_next_day(NaiveDate::MAX).is_err());
    }

    // ── comparisons ─────────────────────────────────────────────────────

    #[test]
    fn test_comparisons() {
        let a = ymd(2021, 10, 15);
        let b = ymd(2021, 10, 16);
        assert!(is_equal(b, b));
        assert!(less_than(a, b));
        assert!(!less_than(b, b));
        assert!(less_than_or_equal(b, b));
        assert!(greater_than(b, a));
        assert!(!greater_than(a, a));
        assert!(greater_than_or_equal(a, a));
    }

    #[test]
    fn test_span_contains() {
        let span = bounds_of_unit(ymd(2021, 10, 16), CalendarUnit::Week).unwrap();
        assert!(span.contains(&ymd(2021, 10, 11)));
        assert!(span.contains(&ymd(2021, 10, 17)));
        assert!(!span.contains(&ymd(2021, 10, 18)));
    }

    #[test]
    fn test_span_serializes() {
        let span = bounds_of_unit(ymd(2021, 10, 16), CalendarUnit::Day).unwrap();
        let json = serde_json::to_string(&span).unwrap();
        assert_eq!(json, r#"{"start":"2021-10-16","end":"2021-10-17"}"#);
    }

    // ── properties ──────────────────────────────────────────────────────

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (-100_000i32..100_000i32).prop_filter_map("valid day", |offset| {
            ymd(2000, 1, 1).checked_add_signed(chrono::TimeDelta::days(i64::from(offset)))
        })
    }

    proptest! {
        #[test]
        fn prop_day_bounds(d in any_date()) {
            let span = bounds_of_unit(d, CalendarUnit::Day).unwrap();
            prop_assert_eq!(span.start, d);
            prop_assert_eq!(span.end, d.succ_opt().unwrap());

            let times = time_bounds_of_unit(d, CalendarUnit::Day).unwrap();
            prop_assert_eq!(times.start, d.and_hms_opt(0, 0, 0).unwrap());
            prop_assert_eq!(times.end, d.and_hms_nano_opt(23, 59, 59, 999_999_999).unwrap());
        }

        #[test]
        fn prop_month_bounds(d in any_date()) {
            let span = bounds_of_unit(d, CalendarUnit::Month).unwrap();
            prop_assert_eq!(span.start.day(), 1);
            prop_assert_eq!(span.start.month(), d.month());
            prop_assert_eq!(span.end.month(), d.month());
            prop_assert_eq!(span.end.succ_opt().unwrap().day(), 1);
            prop_assert!(span.contains(&d));
        }

        #[test]
        fn prop_week_bounds(d in any_date()) {
            let span = bounds_of_unit(d, CalendarUnit::Week).unwrap();
            prop_assert_eq!(span.start.weekday(), Weekday::Mon);
            prop_assert_eq!(span.end.weekday(), Weekday::Sun);
            prop_assert!(span.contains(&d));
            prop_assert_eq!((span.end - span.start).num_days(), 6);
        }

        #[test]
        fn prop_year_bounds(d in any_date()) {
            let span = bounds_of_unit(d, CalendarUnit::Year).unwrap();
            prop_assert_eq!(span.start.ordinal(), 1);
            prop_assert_eq!(span.end.succ_opt().unwrap().ordinal(), 1);
            prop_assert!(span.contains(&d));
        }
    }
}
