//! The unit-of-time selector shared by every datekit operation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DateError;

/// A unit of calendar or clock time.
///
/// Every variant is a valid granularity for [`between`](crate::difference::between).
/// Only [`Year`](Self::Year), [`Month`](Self::Month), [`Week`](Self::Week) and
/// [`Day`](Self::Day) describe a calendar span, so only those are accepted by
/// the boundary and recurrence functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Year,
    Month,
    Day,
    Week,
    Hour,
    Minute,
    Second,
    Milli,
    Micro,
    Nano,
}

impl CalendarUnit {
    /// All units, largest first.
    pub const ALL: [CalendarUnit; 10] = [
        CalendarUnit::Year,
        CalendarUnit::Month,
        CalendarUnit::Week,
        CalendarUnit::Day,
        CalendarUnit::Hour,
        CalendarUnit::Minute,
        CalendarUnit::Second,
        CalendarUnit::Milli,
        CalendarUnit::Micro,
        CalendarUnit::Nano,
    ];

    /// Whether this unit names a calendar span (year, month, week or day).
    pub fn is_span_unit(self) -> bool {
        matches!(
            self,
            CalendarUnit::Year | CalendarUnit::Month | CalendarUnit::Week | CalendarUnit::Day
        )
    }

    /// Whether this unit is measured on the clock rather than the calendar.
    pub fn is_time_based(self) -> bool {
        !self.is_span_unit()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CalendarUnit::Year => "year",
            CalendarUnit::Month => "month",
            CalendarUnit::Day => "day",
            CalendarUnit::Week => "week",
            CalendarUnit::Hour => "hour",
            CalendarUnit::Minute => "minute",
            CalendarUnit::Second => "second",
            CalendarUnit::Milli => "milli",
            CalendarUnit::Micro => "micro",
            CalendarUnit::Nano => "nano",
        }
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarUnit {
    type Err = DateError;

    /// Parse a unit name, case-insensitively. Plurals and the common
    /// `millis`/`micros`/`nanos` spellings are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let unit = match normalized.as_str() {
            "year" | "years" => CalendarUnit::Year,
            "month" | "months" => CalendarUnit::Month,
            "week" | "weeks" => CalendarUnit::Week,
            "day" | "days" => CalendarUnit::Day,
            "hour" | "hours" => CalendarUnit::Hour,
            "minute" | "minutes" => CalendarUnit::Minute,
            "second" | "seconds" => CalendarUnit::Second,
            "milli" | "millis" | "millisecond" | "milliseconds" => CalendarUnit::Milli,
            "micro" | "micros" | "microsecond" | "microseconds" => CalendarUnit::Micro,
            "nano" | "nanos" | "nanosecond" | "nanoseconds" => CalendarUnit::Nano,
            _ => {
                return Err(DateError::Parse(format!(
                    "unknown calendar unit: '{}'",
                    s.trim()
                )))
            }
        };
        Ok(unit)
    }
}
