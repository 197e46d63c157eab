//! Pattern-driven parsing and formatting of calendar values.
//!
//! Callers describe date layouts with the conventional letter-token syntax
//! (`yyyy-MM-dd HH:mm:ss`) rather than `strftime` directives. Patterns are
//! translated to chrono's format syntax once per call; any letter outside the
//! supported token set is rejected with [`DateError::InvalidPattern`] instead
//! of being passed through as a literal.
//!
//! # Tokens
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `yyyy`, `yy` | year, two-digit year (parsed as 2000-2099) |
//! | `MM`, `M`, `MMM`, `MMMM` | month: padded, unpadded, short name, full name |
//! | `dd`, `d` | day of month |
//! | `DDD`, `D` | day of year, padded or unpadded |
//! | `HH`, `H` | hour (00-23) |
//! | `hh`, `h` | hour (01-12) |
//! | `mm`, `m` | minute |
//! | `ss`, `s` | second |
//! | `SSS`, `SSSSSS`, `SSSSSSSSS` | milli-, micro-, nanosecond fraction |
//! | `a` | AM/PM |
//! | `EEE`, `EEEE` | weekday name, short or full |
//! | `'text'`, `''` | quoted literal, single quote |
//!
//! `DD` is rejected: chrono has no two-digit day-of-year directive, so the
//! day of year is either three digits or unpadded.

use std::fmt::Write as _;

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{DateError, Result};

/// `yyyy-MM-dd`
pub const DATE_PATTERN: &str = "yyyy-MM-dd";
/// `yyyy-MM-dd HH:mm:ss`
pub const DATE_TIME_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";
/// `yyyy-MM-dd HH`
pub const HOUR_PATTERN: &str = "yyyy-MM-dd HH";
/// `yyyyMMdd`
pub const COMPACT_DATE_PATTERN: &str = "yyyyMMdd";

/// A pattern translated to chrono's format syntax.
#[derive(Debug, Clone)]
struct CompiledPattern {
    strftime: String,
    has_hour: bool,
    has_minute: bool,
    two_digit_year: bool,
}

/// Translate a letter-token pattern into a chrono `strftime` string.
///
/// # Errors
///
/// Returns [`DateError::InvalidPattern`] for unknown letters, unsupported
/// token widths, or an unterminated quoted literal.
///
/// # Examples
///
/// ```
/// use datekit::format::translate_pattern;
///
/// assert_eq!(translate_pattern("yyyy-MM-dd HH:mm:ss").unwrap(), "%Y-%m-%d %H:%M:%S");
/// assert_eq!(translate_pattern("yyyyMMdd'T'HH").unwrap(), "%Y%m%dT%H");
/// ```
pub fn translate_pattern(pattern: &str) -> Result<String> {
    compile(pattern).map(|c| c.strftime)
}

fn compile(pattern: &str) -> Result<CompiledPattern> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut has_hour = false;
    let mut has_minute = false;
    let mut two_digit_year = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\'' {
            // '' is an escaped single quote, anything else opens a literal.
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            let close = chars[i + 1..]
                .iter()
                .position(|&c| c == '\'')
                .ok_or_else(|| {
                    DateError::InvalidPattern(format!("unterminated literal in '{pattern}'"))
                })?;
            for &lit in &chars[i + 1..i + 1 + close] {
                push_literal(&mut out, lit);
            }
            i += close + 2;
            continue;
        }

        if !ch.is_ascii_alphabetic() {
            push_literal(&mut out, ch);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&c| c == ch).count();
        let directive = match (ch, run) {
            ('y' | 'u', 2) => "%y",
            ('y' | 'u', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', 4) => "%B",
            ('d', 1) => "%-d",
            ('d', 2) => "%d",
            ('D', 1) => "%-j",
            ('D', 3) => "%j",
            ('H', 1) => "%-H",
            ('H', 2) => "%H",
            ('h', 1) => "%-I",
            ('h', 2) => "%I",
            ('m', 1) => "%-M",
            ('m', 2) => "%M",
            ('s', 1) => "%-S",
            ('s', 2) => "%S",
            ('S', 3) => "%3f",
            ('S', 6) => "%6f",
            ('S', 9) => "%9f",
            ('a', 1) => "%p",
            ('E', 1..=3) => "%a",
            ('E', 4) => "%A",
            _ => {
                return Err(DateError::InvalidPattern(format!(
                    "unsupported token '{}' in '{pattern}'",
                    ch.to_string().repeat(run)
                )))
            }
        };

        has_hour |= matches!(ch, 'H' | 'h');
        has_minute |= ch == 'm';
        two_digit_year |= directive == "%y";
        out.push_str(directive);
        i += run;
    }

    Ok(CompiledPattern {
        strftime: out,
        has_hour,
        has_minute,
        two_digit_year,
    })
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

fn parse_error(input: &str, pattern: &str, reason: impl std::fmt::Display) -> DateError {
    DateError::Parse(format!("'{input}' does not match '{pattern}': {reason}"))
}

/// Parse a calendar date using a letter-token pattern.
///
/// # Errors
///
/// Returns [`DateError::InvalidPattern`] for a bad pattern, or
/// [`DateError::Parse`] if `input` does not match it.
pub fn parse_date(input: &str, pattern: &str) -> Result<NaiveDate> {
    let compiled = compile(pattern)?;
    parse_fields(input, pattern, &compiled)?
        .to_naive_date()
        .map_err(|e| parse_error(input, pattern, e))
}

/// Parse a calendar date-time using a letter-token pattern.
///
/// A pattern that names the hour but not the minute (such as
/// [`HOUR_PATTERN`]) resolves to the top of that hour. Patterns without any
/// time-of-day token are rejected, since the result would have to invent one.
///
/// # Errors
///
/// Returns [`DateError::InvalidPattern`] for a bad pattern, or
/// [`DateError::Parse`] if `input` does not match it.
pub fn parse_date_time(input: &str, pattern: &str) -> Result<NaiveDateTime> {
    let compiled = compile(pattern)?;
    let mut parsed = parse_fields(input, pattern, &compiled)?;
    if compiled.has_hour && !compiled.has_minute {
        parsed
            .set_minute(0)
            .map_err(|e| parse_error(input, pattern, e))?;
    }
    parsed
        .to_naive_datetime_with_offset(0)
        .map_err(|e| parse_error(input, pattern, e))
}

/// Two-digit years belong to the 2000s rather than chrono's 1970 pivot.
fn parse_fields(input: &str, pattern: &str, compiled: &CompiledPattern) -> Result<Parsed> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, input, StrftimeItems::new(&compiled.strftime))
        .map_err(|e| parse_error(input, pattern, e))?;
    if compiled.two_digit_year {
        parsed
            .set_year_div_100(20)
            .map_err(|e| parse_error(input, pattern, e))?;
    }
    Ok(parsed)
}

/// Format a calendar date using a letter-token pattern.
///
/// # Errors
///
/// Returns [`DateError::InvalidPattern`] for a bad pattern or one that asks
/// for a time-of-day field a date does not carry.
pub fn format_date(date: NaiveDate, pattern: &str) -> Result<String> {
    let compiled = compile(pattern)?;
    let mut out = String::new();
    write!(out, "{}", date.format(&compiled.strftime)).map_err(|_| {
        DateError::InvalidPattern(format!("'{pattern}' cannot format a date without a time"))
    })?;
    Ok(out)
}

/// Format a calendar date-time using a letter-token pattern.
///
/// # Errors
///
/// Returns [`DateError::InvalidPattern`] for a bad pattern.
pub fn format_date_time(date_time: NaiveDateTime, pattern: &str) -> Result<String> {
    let compiled = compile(pattern)?;
    let mut out = String::new();
    write!(out, "{}", date_time.format(&compiled.strftime))
        .map_err(|_| DateError::InvalidPattern(format!("'{pattern}' cannot be formatted")))?;
    Ok(out)
}

/// The last `count` hours ending at `now`, newest first, as [`HOUR_PATTERN`] strings.
pub fn recent_hours(now: NaiveDateTime, count: usize) -> Vec<String> {
    (0..count)
        .map_while(|i| {
            let back = TimeDelta::try_hours(i64::try_from(i).ok()?)?;
            now.checked_sub_signed(back)
        })
        .map(|dt| dt.format("%Y-%m-%d %H").to_string())
        .collect()
}

/// The last `count` days ending at `now`, newest first, formatted with `pattern`.
///
/// # Errors
///
/// Returns [`DateError::InvalidPattern`] for a bad pattern.
pub fn recent_days(now: NaiveDateTime, count: usize, pattern: &str) -> Result<Vec<String>> {
    let mut days = Vec::with_capacity(count);
    for i in 0..count {
        let back = i64::try_from(i)
            .ok()
            .and_then(TimeDelta::try_days)
            .and_then(|delta| now.checked_sub_signed(delta))
            .ok_or_else(|| DateError::OutOfRange(format!("{i} days before {now}")))?;
        days.push(format_date_time(back, pattern)?);
    }
    Ok(days)
}
