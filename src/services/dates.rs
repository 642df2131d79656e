//! Date normalization: parsing date-like inputs and formatting day labels
//!
//! Grouping and axis building key on the raw date string. The formatter
//! here only produces human-facing labels.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Default label pattern (date-fns token syntax)
pub const DEFAULT_DATE_PATTERN: &str = "MM-dd-yyyy";

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Anything the normalizer can turn into an instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    Text(&'a str),
    /// Milliseconds since the Unix epoch
    EpochMillis(f64),
    Instant(DateTime<Utc>),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s.as_str())
    }
}

impl From<f64> for DateInput<'_> {
    fn from(ms: f64) -> Self {
        Self::EpochMillis(ms)
    }
}

impl From<i64> for DateInput<'_> {
    fn from(ms: i64) -> Self {
        Self::EpochMillis(ms as f64)
    }
}

impl From<DateTime<Utc>> for DateInput<'_> {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Instant(dt)
    }
}

/// Parse a date-like input into an instant. Invalid input yields `None`.
///
/// Strings accepted:
/// - RFC 3339 / ISO-8601 with `Z` or an offset (`+00:00` or `+0000`)
/// - ISO date-time without offset, `T` or space separated (local time)
/// - ISO date only (UTC midnight)
/// - year and month only (first of the month, UTC midnight)
/// - RFC 2822
pub fn parse<'a>(input: impl Into<DateInput<'a>>) -> Option<DateTime<Utc>> {
    match input.into() {
        DateInput::Text(s) => parse_str(s),
        DateInput::EpochMillis(ms) => {
            if !ms.is_finite() {
                return None;
            }
            DateTime::from_timestamp_millis(ms.trunc() as i64)
        }
        DateInput::Instant(dt) => Some(dt),
    }
}

fn parse_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Offsets without a colon (`+0000`) and minute precision
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }

    // Reduced precision `YYYY-MM` is the first of the month, UTC
    if s.len() == 7 && s.as_bytes()[4] == b'-' {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
        }
    }

    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Translate a date-fns style pattern into a chrono strftime string.
///
/// Returns `None` for tokens that have no translation (unknown letters,
/// unsupported widths), which callers treat as a formatting error.
pub fn to_strftime(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // '' is an escaped quote
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        out.push_str(token_spec(c, run)?);
        i += run;
    }

    Some(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

fn token_spec(letter: char, width: usize) -> Option<&'static str> {
    let spec = match (letter, width) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', 4) => "%B",
        ('d', 1) => "%-d",
        ('d', 2) => "%d",
        ('E', 1..=3) => "%a",
        ('E', 4) => "%A",
        ('H', 1) => "%-H",
        ('H', 2) => "%H",
        ('h', 1) => "%-I",
        ('h', 2) => "%I",
        ('m', 1) => "%-M",
        ('m', 2) => "%M",
        ('s', 1) => "%-S",
        ('s', 2) => "%S",
        ('a', 1..=3) => "%p",
        _ => return None,
    };
    Some(spec)
}

/// Format an input as its UTC calendar day.
///
/// The UTC fields are formatted directly, so an instant at UTC midnight
/// renders as that same calendar day whatever the local offset is.
/// Returns `None` when the input does not parse or the pattern is invalid.
pub fn format_utc_day<'a>(input: impl Into<DateInput<'a>>, pattern: &str) -> Option<String> {
    let instant = parse(input)?;
    let fmt = to_strftime(pattern)?;
    Some(instant.naive_utc().format(&fmt).to_string())
}

/// Axis label for a raw ISO date, falling back to the raw string
pub fn day_label(iso: &str, pattern: &str) -> String {
    format_utc_day(iso, pattern).unwrap_or_else(|| iso.to_string())
}
