//! Conversion between epoch-millisecond instants and zoned calendar values.
//!
//! A [`TimeConverter`] carries the one zone used to project instants onto
//! calendar dates and back. It is constructed explicitly, so tests pin a
//! fixed zone and applications pick theirs once at startup (typically with
//! [`TimeConverter::system`]) and pass the converter along.
//!
//! # Local times that do not map to one instant
//!
//! - In a DST gap the wall-clock time is moved later by the length of the
//!   gap (02:30 on a spring-forward night becomes 03:30).
//! - In a DST fold the earlier of the two offsets wins.
//!
//! Consequently `date_time_to_instant(to_calendar_date_time(x)) == x` holds
//! for every in-range instant except those in the second pass of a fold.

use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::boundary::{self, Span};
use crate::error::{DateError, Result};
use crate::format;
use crate::unit::CalendarUnit;

/// Projects instants onto calendar values in a single fixed zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConverter {
    zone: Tz,
}

impl Default for TimeConverter {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl TimeConverter {
    /// Create a converter pinned to `zone`.
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Create a converter from an IANA zone name such as `"Asia/Shanghai"`.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidTimezone`] if the name is not a known IANA zone.
    pub fn from_name(name: &str) -> Result<Self> {
        parse_timezone(name).map(Self::new)
    }

    /// Create a converter for the host's configured zone.
    ///
    /// Falls back to UTC when the host zone cannot be determined or is not a
    /// known IANA name.
    pub fn system() -> Self {
        let zone = match iana_time_zone::get_timezone() {
            Ok(name) => parse_timezone(&name).unwrap_or_else(|e| {
                tracing::warn!(zone = %name, error = %e, "unrecognised system zone, using UTC");
                Tz::UTC
            }),
            Err(e) => {
                tracing::warn!(error = %e, "system zone unavailable, using UTC");
                Tz::UTC
            }
        };
        tracing::debug!(zone = %zone.name(), "using system zone");
        Self::new(zone)
    }

    /// The zone this converter projects through.
    pub fn zone(&self) -> Tz {
        self.zone
    }

    // ── instant → calendar ──────────────────────────────────────────────

    /// The calendar day on which `instant` falls in this zone.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::OutOfRange`] if the instant is beyond the
    /// representable calendar range.
    pub fn to_calendar_date(&self, instant: i64) -> Result<NaiveDate> {
        self.to_calendar_date_time(instant).map(|dt| dt.date())
    }

    /// The wall-clock date-time of `instant` in this zone.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::OutOfRange`] if the instant is beyond the
    /// representable calendar range.
    ///
    /// # Examples
    ///
    /// ```
    /// use datekit::TimeConverter;
    ///
    /// let converter = TimeConverter::from_name("Asia/Shanghai").unwrap();
    /// let local = converter.to_calendar_date_time(0).unwrap();
    /// assert_eq!(local.to_string(), "1970-01-01 08:00:00");
    /// ```
    pub fn to_calendar_date_time(&self, instant: i64) -> Result<NaiveDateTime> {
        Ok(self.zoned(instant)?.naive_local())
    }

    fn zoned(&self, instant: i64) -> Result<DateTime<Tz>> {
        DateTime::from_timestamp_millis(instant)
            .map(|utc| utc.with_timezone(&self.zone))
            .ok_or_else(|| {
                DateError::OutOfRange(format!("instant {instant} ms is outside the calendar range"))
            })
    }

    // ── calendar → instant ──────────────────────────────────────────────

    /// The instant of local midnight at the start of `date`.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::OutOfRange`] if midnight cannot be represented.
    pub fn date_to_instant(&self, date: NaiveDate) -> Result<i64> {
        self.date_time_to_instant(boundary::start_of_day(date))
    }

    /// The instant at which the wall clock in this zone reads `date_time`.
    ///
    /// Sub-millisecond precision is truncated.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::OutOfRange`] if the result cannot be represented.
    pub fn date_time_to_instant(&self, date_time: NaiveDateTime) -> Result<i64> {
        Ok(self.resolve_local(date_time)?.timestamp_millis())
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        match self.zone.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
            LocalResult::None => {
                // Gap: read the wall clock with the offset in force before the transition.
                let before = local
                    .checked_sub_signed(TimeDelta::days(1))
                    .ok_or_else(|| out_of_range(local))?;
                let offset = self.zone.offset_from_utc_datetime(&before).fix();
                local
                    .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
                    .map(|utc| utc.and_utc())
                    .ok_or_else(|| out_of_range(local))
            }
        }
    }

    // ── "now"-relative queries ──────────────────────────────────────────

    /// The current wall-clock date-time in this zone.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.zone).naive_local()
    }

    /// The current calendar day in this zone.
    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Whether `date` is today in this zone.
    pub fn is_today(&self, date: NaiveDate) -> bool {
        boundary::is_equal(self.today(), date)
    }

    /// Whether two instants fall on the same calendar day in this zone.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::OutOfRange`] if either instant is out of range.
    pub fn is_same_day(&self, a: i64, b: i64) -> Result<bool> {
        Ok(boundary::is_equal(
            self.to_calendar_date(a)?,
            self.to_calendar_date(b)?,
        ))
    }

    /// Format `instant` as wall-clock time in this zone with a letter-token pattern.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::OutOfRange`] for an out-of-range instant or
    /// [`DateError::InvalidPattern`] for a bad pattern.
    pub fn format_instant(&self, instant: i64, pattern: &str) -> Result<String> {
        format::format_date_time(self.to_calendar_date_time(instant)?, pattern)
    }

    // ── boundaries of instants ──────────────────────────────────────────

    /// Date bounds of the unit containing `instant`, each expressed as the
    /// instant of that day's local midnight.
    ///
    /// Follows [`boundary::bounds_of_unit`], so for [`CalendarUnit::Day`] the
    /// end is the following midnight.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::UnsupportedUnit`] for units other than year,
    /// month, week and day, or [`DateError::OutOfRange`].
    pub fn instant_bounds_of_unit(&self, instant: i64, unit: CalendarUnit) -> Result<Span<i64>> {
        let span = boundary::bounds_of_unit(self.to_calendar_date(instant)?, unit)?;
        Ok(Span {
            start: self.date_to_instant(span.start)?,
            end: self.date_to_instant(span.end)?,
        })
    }

    /// Time bounds of the unit containing `instant`: the first and last
    /// millisecond of the span, following [`boundary::time_bounds_of_unit`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::instant_bounds_of_unit`].
    pub fn instant_time_bounds_of_unit(
        &self,
        instant: i64,
        unit: CalendarUnit,
    ) -> Result<Span<i64>> {
        let span = boundary::time_bounds_of_unit(self.to_calendar_date(instant)?, unit)?;
        Ok(Span {
            start: self.date_time_to_instant(span.start)?,
            end: self.date_time_to_instant(span.end)?,
        })
    }

    /// Day of the year (1-based) on which `instant` falls in this zone.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::OutOfRange`] for an out-of-range instant.
    pub fn day_of_year(&self, instant: i64) -> Result<u32> {
        Ok(self.to_calendar_date(instant)?.ordinal())
    }
}

fn out_of_range(local: NaiveDateTime) -> DateError {
    DateError::OutOfRange(format!("local time {local} cannot be mapped to an instant"))
}

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| DateError::InvalidTimezone(format!("'{s}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use proptest::prelude::*;

    fn shanghai() -> TimeConverter {
        TimeConverter::new(Tz::Asia__Shanghai)
    }

    fn new_york() -> TimeConverter {
        TimeConverter::new(Tz::America__New_York)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── construction ────────────────────────────────────────────────────

    #[test]
    fn test_from_name() {
        let converter = TimeConverter::from_name("Europe/Berlin").unwrap();
        assert_eq!(converter.zone(), Tz::Europe__Berlin);
    }

    #[test]
    fn test_from_name_invalid() {
        let err = TimeConverter::from_name("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, DateError::InvalidTimezone(_)));
    }

    #[test]
    fn test_default_is_utc() {
        assert_eq!(TimeConverter::default().zone(), Tz::UTC);
    }

    #[test]
    fn test_system_zone_is_usable() {
        let converter = TimeConverter::system();
        assert!(converter.to_calendar_date(0).is_ok());
    }

    // ── instant → calendar ──────────────────────────────────────────────

    #[test]
    fn test_epoch_in_shanghai() {
        let dt = shanghai().to_calendar_date_time(0).unwrap();
        assert_eq!(dt, ymd(1970, 1, 1).and_hms_opt(8, 0, 0).unwrap());
    }

    #[test]
    fn test_date_depends_on_zone() {
        // 2024-03-10T03:30:00Z is the evening of March 9 in New York.
        let instant = 1_710_041_400_000;
        assert_eq!(shanghai().to_calendar_date(instant).unwrap(), ymd(2024, 3, 10));
        assert_eq!(new_york().to_calendar_date(instant).unwrap(), ymd(2024, 3, 9));
    }

    #[test]
    fn test_millisecond_precision_kept() {
        let dt = TimeConverter::default()
            .to_calendar_date_time(1_234)
            .unwrap();
        assert_eq!(dt.second(), 1);
        assert_eq!(dt.nanosecond(), 234_000_000);
    }

    #[test]
    fn test_out_of_range_instant() {
        let err = shanghai().to_calendar_date(i64::MAX).unwrap_err();
        assert!(matches!(err, DateError::OutOfRange(_)));
    }

    // ── calendar → instant ──────────────────────────────────────────────

    #[test]
    fn test_date_to_instant_is_local_midnight() {
        let instant = shanghai().date_to_instant(ymd(1970, 1, 2)).unwrap();
        assert_eq!(instant, 16 * 3_600_000);
    }

    #[test]
    fn test_date_round_trip_drops_time_of_day() {
        let converter = shanghai();
        let noon = converter
            .date_time_to_instant(ymd(2024, 5, 1).and_hms_opt(12, 0, 0).unwrap())
            .unwrap();
        let midnight = converter
            .date_to_instant(converter.to_calendar_date(noon).unwrap())
            .unwrap();
        assert_eq!(noon - midnight, 12 * 3_600_000);
    }

    #[test]
    fn test_gap_moves_later() {
        // 2026-03-08 02:30 does not exist in New York; it reads as 03:30 EDT.
        let converter = new_york();
        let local = ymd(2026, 3, 8).and_hms_opt(2, 30, 0).unwrap();
        let instant = converter.date_time_to_instant(local).unwrap();
        let back = converter.to_calendar_date_time(instant).unwrap();
        assert_eq!(back, ymd(2026, 3, 8).and_hms_opt(3, 30, 0).unwrap());
    }

    #[test]
    fn test_fold_picks_earlier_offset() {
        // 2026-11-01 01:30 happens twice in New York; EDT (-04:00) comes first.
        let converter = new_york();
        let local = ymd(2026, 11, 1).and_hms_opt(1, 30, 0).unwrap();
        let instant = converter.date_time_to_instant(local).unwrap();
        let expected = ymd(2026, 11, 1)
            .and_hms_opt(5, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(instant, expected);
    }

    // ── helpers ─────────────────────────────────────────────────────────

    #[test]
    fn test_is_same_day() {
        let converter = shanghai();
        // 15:59:59Z and 16:00:00Z straddle Shanghai midnight.
        assert!(!converter
            .is_same_day(57_599_000, 57_600_000)
            .unwrap());
        assert!(converter.is_same_day(0, 57_599_000).unwrap());
    }

    #[test]
    fn test_is_today() {
        let converter = shanghai();
        assert!(converter.is_today(converter.today()));
        assert!(!converter.is_today(ymd(1999, 12, 31)));
    }

    #[test]
    fn test_format_instant() {
        let text = shanghai()
            .format_instant(0, format::DATE_TIME_PATTERN)
            .unwrap();
        assert_eq!(text, "1970-01-01 08:00:00");
    }

    #[test]
    fn test_instant_bounds_of_day() {
        let converter = shanghai();
        let span = converter
            .instant_bounds_of_unit(3_600_000, CalendarUnit::Day)
            .unwrap();
        assert_eq!(span.start, -8 * 3_600_000);
        assert_eq!(span.end, 16 * 3_600_000);
    }

    #[test]
    fn test_instant_time_bounds_of_day() {
        let converter = shanghai();
        let span = converter
            .instant_time_bounds_of_unit(3_600_000, CalendarUnit::Day)
            .unwrap();
        assert_eq!(span.start, -8 * 3_600_000);
        assert_eq!(span.end, 16 * 3_600_000 - 1);
    }

    #[test]
    fn test_instant_bounds_unsupported_unit() {
        let err = shanghai()
            .instant_bounds_of_unit(0, CalendarUnit::Hour)
            .unwrap_err();
        assert_eq!(err, DateError::UnsupportedUnit(CalendarUnit::Hour));
    }

    #[test]
    fn test_day_of_year() {
        let converter = TimeConverter::default();
        let instant = converter.date_to_instant(ymd(2024, 12, 31)).unwrap();
        assert_eq!(converter.day_of_year(instant).unwrap(), 366);
    }

    // ── round trip ──────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_date_time_round_trip_fixed_offset(
            instant in -8_000_000_000_000_000i64..8_000_000_000_000_000i64,
        ) {
            for zone in [Tz::UTC, Tz::Etc__GMTMinus8, Tz::Etc__GMTPlus5] {
                let converter = TimeConverter::new(zone);
                let local = converter.to_calendar_date_time(instant).unwrap();
                prop_assert_eq!(converter.date_time_to_instant(local).unwrap(), instant);
            }
        }

        #[test]
        fn prop_date_time_round_trip_dst_zone(
            instant in 0i64..4_102_444_800_000i64,
        ) {
            let converter = new_york();
            let local = converter.to_calendar_date_time(instant).unwrap();
            let back = converter.date_time_to_instant(local).unwrap();
            // Only the second pass through a fold can come back an hour early.
            prop_assert!(back == instant || back == instant - 3_600_000);
        }

        #[test]
        fn prop_date_to_instant_is_not_after(
            instant in -4_000_000_000_000i64..4_000_000_000_000i64,
        ) {
            let converter = TimeConverter::new(Tz::Etc__GMTMinus8);
            let date = converter.to_calendar_date(instant).unwrap();
            let midnight = converter.date_to_instant(date).unwrap();
            prop_assert!(midnight <= instant);
            prop_assert!(instant - midnight < 86_400_000);
        }
    }
}
