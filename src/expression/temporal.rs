//! Temporal operands
//!
//! Temporal values travel through filter documents as text. Each type is
//! rendered in the canonical form its coercion parser accepts back.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;

/// Supported Hijrah year range (inclusive)
pub const HIJRAH_MIN_YEAR: i32 = 1300;
pub const HIJRAH_MAX_YEAR: i32 = 1600;

/// A value that can be written into a filter document as canonical text
pub trait Temporal {
    /// Canonical text form
    fn canonical_text(&self) -> String;
}

impl Temporal for NaiveDate {
    fn canonical_text(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl Temporal for NaiveDateTime {
    fn canonical_text(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

impl Temporal for DateTime<Utc> {
    fn canonical_text(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl Temporal for DateTime<FixedOffset> {
    fn canonical_text(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

impl Temporal for HijrahDate {
    fn canonical_text(&self) -> String {
        self.to_string()
    }
}

/// A date in the Hijrah calendar.
///
/// Months have at most 30 days; no month-length table is consulted, so
/// day 30 is accepted for every month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HijrahDate {
    year: i32,
    month: u32,
    day: u32,
}

impl HijrahDate {
    /// Creates a date, returning None when a component is out of range
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        let valid = (HIJRAH_MIN_YEAR..=HIJRAH_MAX_YEAR).contains(&year)
            && (1..=12).contains(&month)
            && (1..=30).contains(&day);
        valid.then_some(Self { year, month, day })
    }

    /// Parses a strict `yyyy-MM-dd` numeric triple
    pub fn parse(text: &str) -> Option<Self> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = PATTERN.get_or_init(|| {
            Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("static hijrah pattern")
        });

        let captures = pattern.captures(text.trim())?;
        let year = captures[1].parse().ok()?;
        let month = captures[2].parse().ok()?;
        let day = captures[3].parse().ok()?;
        Self::new(year, month, day)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for HijrahDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hijrah_parse_strict_triple() {
        let date = HijrahDate::parse("1390-09-29").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (1390, 9, 29));
        assert_eq!(date.to_string(), "1390-09-29");
    }

    #[test]
    fn test_hijrah_rejects_loose_forms() {
        assert!(HijrahDate::parse("1390-9-29").is_none());
        assert!(HijrahDate::parse("1390/09/29").is_none());
        assert!(HijrahDate::parse("1390-09").is_none());
        assert!(HijrahDate::parse("abcd-09-29").is_none());
    }

    #[test]
    fn test_hijrah_rejects_out_of_range() {
        assert!(HijrahDate::parse("1390-13-01").is_none());
        assert!(HijrahDate::parse("1390-01-31").is_none());
        assert!(HijrahDate::parse("1200-01-01").is_none());
    }

    #[test]
    fn test_hijrah_ordering() {
        let a = HijrahDate::new(1388, 9, 29).unwrap();
        let b = HijrahDate::new(1390, 1, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_canonical_text() {
        let date = NaiveDate::from_ymd_opt(1980, 1, 1).unwrap();
        assert_eq!(date.canonical_text(), "1980-01-01");

        let instant = Utc.with_ymd_and_hms(2007, 12, 3, 10, 15, 30).unwrap();
        assert_eq!(instant.canonical_text(), "2007-12-03T10:15:30Z");
    }
}
