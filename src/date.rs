//! Interprets front-matter dates and renders them for display. Nothing here
//! reads the system clock directly: the "now" used for undated documents comes
//! from an injected [`Clock`].

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the operating system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A `date` value as written in front-matter: either text such as
/// `2024-01-05` or an integer number of milliseconds since the epoch.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Epoch(i64),
    Text(String),
}

impl RawDate {
    /// Returns `true` for text that is empty or only whitespace, which counts
    /// as no date at all.
    pub fn is_blank(&self) -> bool {
        match self {
            RawDate::Epoch(_) => false,
            RawDate::Text(text) => text.trim().is_empty(),
        }
    }
}

/// A normalized date: epoch milliseconds for sorting plus the display string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayDate {
    pub time: i64,
    pub string: String,
}

/// The display conventions for dates.
#[derive(Clone, Debug)]
pub struct Locale {
    /// The offset in which dates without an explicit offset are read and in
    /// which every date is displayed.
    pub offset: FixedOffset,

    /// `strftime` pattern for post dates (date only).
    pub post_date_format: String,

    /// `strftime` pattern for moment dates (date and time).
    pub moment_date_format: String,
}

pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 8 * 60;
pub const DEFAULT_POST_DATE_FORMAT: &str = "%Y/%m/%d";
pub const DEFAULT_MOMENT_DATE_FORMAT: &str = "%Y年%-m月%-d日 %H:%M";

impl Default for Locale {
    fn default() -> Self {
        Locale {
            // +08:00 is always a valid offset
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60).unwrap(),
            post_date_format: DEFAULT_POST_DATE_FORMAT.to_owned(),
            moment_date_format: DEFAULT_MOMENT_DATE_FORMAT.to_owned(),
        }
    }
}

/// YAML timestamps with seconds and an explicit zone, as written by hand
/// (`2024-01-05 10:30:00 +08:00`). RFC 3339 is handled separately.
const ZONED_DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f %:z",
];

/// YAML timestamps with seconds but no zone. YAML reads these as UTC.
const UTC_DATETIME_PATTERNS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Date-time layouts that aren't YAML timestamps, read in the local offset.
const LOCAL_DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Converts a [`RawDate`] into an instant. Supported forms:
///
/// * RFC 3339 with an explicit offset (`2024-01-05T10:30:00+08:00`), also with
///   a space before the offset or `Z` (`2024-01-05 10:30:00 +08:00`)
/// * a bare ISO date (`2024-01-05`), read as midnight UTC
/// * an ISO date and time with seconds but no offset (`2024-01-05 10:30:00`),
///   read as UTC
/// * a date and time without seconds or offset (`2024-01-05 10:30`,
///   `2024/01/05 10:30`) or a slashed date (`2024/01/05`), read in `offset`
/// * an integer, read as epoch milliseconds
///
/// Blank text is not a date; callers treat it as missing (see [`resolve`]).
pub fn interpret(raw: &RawDate, offset: &FixedOffset) -> Result<DateTime<FixedOffset>> {
    match raw {
        RawDate::Epoch(millis) => offset
            .timestamp_millis_opt(*millis)
            .single()
            .ok_or(Error::OutOfRange(*millis)),
        RawDate::Text(text) => parse_text(text.trim(), offset)
            .ok_or_else(|| Error::Unrecognized(text.clone())),
    }
}

fn parse_text(text: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(offset));
    }
    for pattern in ZONED_DATETIME_PATTERNS {
        if let Ok(date) = DateTime::parse_from_str(text, pattern) {
            return Some(date.with_timezone(offset));
        }
    }
    let unzoned = text
        .strip_suffix('Z')
        .or_else(|| text.strip_suffix('z'))
        .map(str::trim_end);
    for pattern in UTC_DATETIME_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(unzoned.unwrap_or(text), pattern) {
            return Some(Utc.from_utc_datetime(&naive).with_timezone(offset));
        }
    }
    if unzoned.is_some() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).with_timezone(offset));
    }
    for pattern in LOCAL_DATETIME_PATTERNS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return offset.from_local_datetime(&naive).single();
        }
    }
    let date = NaiveDate::parse_from_str(text, "%Y/%m/%d").ok()?;
    offset.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

/// Resolves a possibly-missing date, falling back to `clock` when it's
/// missing or blank.
pub fn resolve(
    raw: Option<&RawDate>,
    clock: &dyn Clock,
    offset: &FixedOffset,
) -> Result<DateTime<FixedOffset>> {
    match raw {
        Some(raw) if !raw.is_blank() => interpret(raw, offset),
        _ => Ok(clock.now().with_timezone(offset)),
    }
}

/// Normalizes a possibly-missing date into a [`DisplayDate`] rendered with
/// `pattern`.
pub fn format_date(
    raw: Option<&RawDate>,
    clock: &dyn Clock,
    offset: &FixedOffset,
    pattern: &str,
) -> Result<DisplayDate> {
    let date = resolve(raw, clock, offset)?;
    let mut string = String::new();
    write!(string, "{}", date.format(pattern))
        .map_err(|_| Error::Pattern(pattern.to_owned()))?;
    Ok(DisplayDate {
        time: date.timestamp_millis(),
        string,
    })
}

/// The calendar year of a possibly-missing date, as seen in `offset`.
pub fn year(raw: Option<&RawDate>, clock: &dyn Clock, offset: &FixedOffset) -> Result<i32> {
    Ok(resolve(raw, clock, offset)?.year())
}

/// Returns `true` if `pattern` is a `strftime` pattern chrono can render.
pub fn is_valid_pattern(pattern: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a date that can't be interpreted or displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Returned when a textual date matches none of the supported layouts.
    Unrecognized(String),

    /// Returned when an epoch timestamp is outside chrono's range.
    OutOfRange(i64),

    /// Returned when a display pattern isn't a valid `strftime` pattern.
    Pattern(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Unrecognized(text) => write!(f, "unrecognized date `{}`", text),
            Error::OutOfRange(millis) => {
                write!(f, "timestamp {} is out of range", millis)
            }
            Error::Pattern(pattern) => {
                write!(f, "invalid date format pattern `{}`", pattern)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    fn china() -> FixedOffset {
        Locale::default().offset
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
    }

    fn text(s: &str) -> RawDate {
        RawDate::Text(s.to_owned())
    }

    #[test]
    fn test_bare_date_is_utc_midnight() -> Result<()> {
        let date = format_date(
            Some(&text("2024-01-05")),
            &clock(),
            &china(),
            DEFAULT_POST_DATE_FORMAT,
        )?;
        assert_eq!(date.time, 1_704_412_800_000);
        assert_eq!(date.string, "2024/01/05");
        Ok(())
    }

    #[test]
    fn test_local_datetime_uses_offset() -> Result<()> {
        let date = format_date(
            Some(&text("2024-01-05 10:30")),
            &clock(),
            &china(),
            DEFAULT_MOMENT_DATE_FORMAT,
        )?;
        assert_eq!(date.time, 1_704_421_800_000);
        assert_eq!(date.string, "2024年1月5日 10:30");
        Ok(())
    }

    #[test]
    fn test_rfc3339_is_converted_for_display() -> Result<()> {
        let date = format_date(
            Some(&text("2024-01-05T20:00:00Z")),
            &clock(),
            &china(),
            DEFAULT_POST_DATE_FORMAT,
        )?;
        assert_eq!(date.string, "2024/01/06");
        Ok(())
    }

    #[test]
    fn test_epoch_millis() -> Result<()> {
        let date = format_date(
            Some(&RawDate::Epoch(0)),
            &clock(),
            &china(),
            DEFAULT_MOMENT_DATE_FORMAT,
        )?;
        assert_eq!(date.time, 0);
        assert_eq!(date.string, "1970年1月1日 08:00");
        Ok(())
    }

    #[test]
    fn test_missing_date_uses_clock() -> Result<()> {
        let date = format_date(None, &clock(), &china(), DEFAULT_POST_DATE_FORMAT)?;
        assert_eq!(date.time, clock().0.timestamp_millis());
        assert_eq!(date.string, "2025/03/01");
        Ok(())
    }

    #[test]
    fn test_unrecognized_date() {
        assert_eq!(
            interpret(&text("last tuesday"), &china()),
            Err(Error::Unrecognized("last tuesday".to_owned()))
        );
    }

    #[test]
    fn test_yaml_timestamps() -> Result<()> {
        let expected = china().with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        for raw in &[
            "2024-01-05 10:30:00 +08:00",
            "2024-01-05 10:30:00+08:00",
            "2024-01-05T10:30:00 +08:00",
            "2024-01-05 02:30:00Z",
            "2024-01-05 02:30:00 Z",
            "2024-01-05T02:30:00.000Z",
        ] {
            assert_eq!(interpret(&text(raw), &china())?, expected, "{}", raw);
        }
        Ok(())
    }

    #[test]
    fn test_timestamp_without_zone_is_utc() -> Result<()> {
        let date = format_date(
            Some(&text("2024-01-05 10:30:00")),
            &clock(),
            &china(),
            DEFAULT_MOMENT_DATE_FORMAT,
        )?;
        assert_eq!(date.time, 1_704_450_600_000);
        assert_eq!(date.string, "2024年1月5日 18:30");
        Ok(())
    }

    #[test]
    fn test_blank_date_uses_clock() -> Result<()> {
        for raw in &["", "   "] {
            assert!(text(raw).is_blank());
            let date = format_date(Some(&text(raw)), &clock(), &china(), DEFAULT_POST_DATE_FORMAT)?;
            assert_eq!(date.time, clock().0.timestamp_millis());
        }
        assert!(!RawDate::Epoch(0).is_blank());
        Ok(())
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        assert!(!is_valid_pattern("%Q"));
        assert!(is_valid_pattern(DEFAULT_MOMENT_DATE_FORMAT));
        assert_eq!(
            format_date(None, &clock(), &china(), "%Q"),
            Err(Error::Pattern("%Q".to_owned()))
        );
    }

    #[test]
    fn test_year_in_offset() -> Result<()> {
        // 2023-12-31 20:00 UTC is already 2024 in +08:00
        let raw = text("2023-12-31T20:00:00Z");
        assert_eq!(year(Some(&raw), &clock(), &china())?, 2024);
        assert_eq!(year(None, &clock(), &china())?, 2025);
        Ok(())
    }
}
