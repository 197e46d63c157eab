//! # datekit
//!
//! Calendar arithmetic over a single configured time zone.
//!
//! Every function is pure: calendar values are plain `chrono` types, the zone
//! lives in an explicitly constructed [`TimeConverter`], and the only
//! "now"-relative entry points take that converter as an argument.
//!
//! ## Modules
//!
//! - [`convert`] — epoch milliseconds ↔ zoned dates and date-times
//! - [`boundary`] — start/end of the year, month, week or day containing a date
//! - [`difference`] — whole-unit differences between two date-times
//! - [`recurrence`] — does an anchor date + fixed cycle land on a given day
//! - [`format`] — letter-token patterns (`yyyy-MM-dd HH:mm:ss`) for parsing and formatting
//! - [`unit`] — the [`CalendarUnit`] selector
//! - [`error`] — Error types

pub mod boundary;
pub mod convert;
pub mod difference;
pub mod error;
pub mod format;
pub mod recurrence;
pub mod unit;

pub use boundary::{
    bounds_of_unit, end_of_day, greater_than, greater_than_or_equal, is_equal, less_than,
    less_than_or_equal, start_of_day, start_of_next_day, time_bounds_of_unit, Span,
};
pub use convert::TimeConverter;
pub use difference::{
    between, between_str, days_between_dates, days_between_dates_str, days_between_str,
    hours_between_str,
};
pub use error::DateError;
pub use format::{
    format_date, format_date_time, parse_date, parse_date_time, COMPACT_DATE_PATTERN,
    DATE_PATTERN, DATE_TIME_PATTERN, HOUR_PATTERN,
};
pub use recurrence::{first_occurrence_on_or_after, is_occurrence_on, is_occurrence_today};
pub use unit::CalendarUnit;
