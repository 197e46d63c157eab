//! Fixed-step recurrence checks: does "anchor + n × cycle units" land on a day?
//!
//! Occurrences are found by walking from the anchor one cycle at a time
//! rather than by modular arithmetic over day counts, because months and
//! years have no fixed width. Each step is applied to the previous landing
//! date, so month-end clamping carries forward: a monthly series anchored on
//! January 31 visits February 29 (2024), then March 29, April 29, and so on.
//!
//! Clamping follows chrono's month arithmetic: adding months to a day that
//! does not exist in the target month lands on that month's last day. A
//! year step is a twelve-month step, so February 29 plus one year is
//! February 28.
//!
//! # Cycle direction
//!
//! A positive cycle walks forward while the running date is before the
//! target day. A negative cycle walks backward while the running date is
//! after it, so a negative series anchored before the target can never
//! reach it. A zero cycle is rejected up front.

use chrono::{Days, Months, NaiveDate};

use crate::boundary::{greater_than, is_equal, less_than};
use crate::convert::TimeConverter;
use crate::error::{DateError, Result};
use crate::unit::CalendarUnit;

/// Move `date` by `cycle` units of `unit` (negative moves backward).
///
/// # Errors
///
/// Returns [`DateError::UnsupportedUnit`] for clock units and
/// [`DateError::OutOfRange`] if the result leaves the calendar range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datekit::{recurrence::step, CalendarUnit};
///
/// let jan31 = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
/// let next = step(jan31, CalendarUnit::Month, 1).unwrap();
/// assert_eq!(next, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
/// ```
pub fn step(date: NaiveDate, unit: CalendarUnit, cycle: i64) -> Result<NaiveDate> {
    let stepped = match unit {
        CalendarUnit::Year => cycle.checked_mul(12).and_then(|m| add_months(date, m)),
        CalendarUnit::Month => add_months(date, cycle),
        CalendarUnit::Week => cycle.checked_mul(7).and_then(|d| add_days(date, d)),
        CalendarUnit::Day => add_days(date, cycle),
        other => return Err(DateError::UnsupportedUnit(other)),
    };
    stepped.ok_or_else(|| {
        DateError::OutOfRange(format!("{date} + {cycle} {unit}(s) leaves the calendar range"))
    })
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

fn validate_cycle(cycle: i64) -> Result<()> {
    if cycle == 0 {
        return Err(DateError::InvalidCycle(cycle));
    }
    Ok(())
}

/// Whether the series `anchor`, `anchor + cycle`, `anchor + 2·cycle`, … in
/// `unit` has an occurrence on `today`.
///
/// The anchor itself is an occurrence. Clock units have no calendar
/// occurrences and answer `false` rather than failing; this differs from
/// [`bounds_of_unit`](crate::boundary::bounds_of_unit), which rejects them.
///
/// # Errors
///
/// Returns [`DateError::InvalidCycle`] for a zero cycle, checked before
/// anything else. A series whose next step would leave the calendar range
/// has already passed `today` and answers `false`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datekit::{is_occurrence_on, CalendarUnit};
///
/// let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert!(is_occurrence_on(anchor, CalendarUnit::Week, 2, day).unwrap());
/// assert!(!is_occurrence_on(anchor, CalendarUnit::Week, 3, day).unwrap());
/// ```
pub fn is_occurrence_on(
    anchor: NaiveDate,
    unit: CalendarUnit,
    cycle: i64,
    today: NaiveDate,
) -> Result<bool> {
    validate_cycle(cycle)?;

    if is_equal(anchor, today) {
        return Ok(true);
    }
    if !unit.is_span_unit() {
        tracing::debug!(%unit, "clock unit never recurs on a calendar day");
        return Ok(false);
    }

    let landing = match walk(anchor, unit, cycle, today) {
        Ok(landing) => landing,
        Err(DateError::OutOfRange(reason)) => {
            tracing::debug!(%anchor, %unit, cycle, %today, %reason, "series overshoots the calendar range");
            return Ok(false);
        }
        Err(e) => return Err(e),
    };
    let hit = is_equal(landing, today);
    tracing::debug!(%anchor, %unit, cycle, %today, %landing, hit, "recurrence evaluated");
    Ok(hit)
}

/// [`is_occurrence_on`] for the current day in `converter`'s zone.
///
/// # Errors
///
/// Same as [`is_occurrence_on`].
pub fn is_occurrence_today(
    anchor: NaiveDate,
    unit: CalendarUnit,
    cycle: i64,
    converter: &TimeConverter,
) -> Result<bool> {
    is_occurrence_on(anchor, unit, cycle, converter.today())
}

/// The earliest occurrence of the series that falls on or after `from`.
///
/// Returns `anchor` itself when it is not before `from`.
///
/// # Errors
///
/// Returns [`DateError::InvalidCycle`] unless `cycle` is positive,
/// [`DateError::UnsupportedUnit`] for clock units, and
/// [`DateError::OutOfRange`] if the walk leaves the calendar range.
pub fn first_occurrence_on_or_after(
    anchor: NaiveDate,
    unit: CalendarUnit,
    cycle: i64,
    from: NaiveDate,
) -> Result<NaiveDate> {
    if cycle <= 0 {
        return Err(DateError::InvalidCycle(cycle));
    }
    if !unit.is_span_unit() {
        return Err(DateError::UnsupportedUnit(unit));
    }
    if !less_than(anchor, from) {
        return Ok(anchor);
    }
    walk(anchor, unit, cycle, from)
}

/// Step from `anchor` until the running date is no longer short of `target`
/// in the direction of travel. Always takes at least one step.
fn walk(anchor: NaiveDate, unit: CalendarUnit, cycle: i64, target: NaiveDate) -> Result<NaiveDate> {
    let forward = cycle > 0;
    let mut current = anchor;
    let mut steps: u64 = 0;
    loop {
        current = step(current, unit, cycle)?;
        steps += 1;
        tracing::trace!(%current, steps, "recurrence step");
        let short = if forward {
            less_than(current, target)
        } else {
            greater_than(current, target)
        };
        if !short {
            return Ok(current);
        }
    }
}
