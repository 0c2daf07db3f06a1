use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::RosterError;

const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
const INPUT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H%M";
const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";
const DISPLAY_DATE_TIME_FORMAT: &str = "%d %b %Y %I:%M %P";
const SECONDS_PER_DAY: i64 = 86_400;

/// Default window, in days, for classifying a due date as "due soon".
pub const DUE_SOON_DAYS: i64 = 3;

/// A reminder due date, entered either as a calendar day or as a day plus a
/// 24-hour time.
///
/// Comparison, equality and hashing all go through [`DueDate::instant`], so a
/// date-only value is interchangeable with a date-time value at midnight of
/// the same day. Rendering keeps the original flavor.
#[derive(Debug, Clone, Copy)]
pub enum DueDate {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Urgency of a due date relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Upcoming,
}

impl DueDate {
    /// Parses `YYYY-MM-DD` or `YYYY-MM-DD HHMM`.
    pub fn parse(text: &str) -> Result<Self, RosterError> {
        let invalid = || RosterError::InvalidDateFormat(text.to_string());
        let trimmed = text.trim();
        let (date_part, time_part) = match trimmed.split_once(' ') {
            Some((date, time)) => (date, Some(time)),
            None => (trimmed, None),
        };
        let date = parse_date_part(date_part).ok_or_else(invalid)?;
        match time_part {
            None => Ok(DueDate::Date(date)),
            Some(raw) => {
                let time = parse_time_part(raw).ok_or_else(invalid)?;
                Ok(DueDate::DateTime(date.and_time(time)))
            }
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        DueDate::Date(date)
    }

    pub fn from_date_time(value: NaiveDateTime) -> Self {
        DueDate::DateTime(value)
    }

    /// 23:59 on the last calendar day of the given month.
    pub fn end_of_month(year: i32, month: u32) -> Option<Self> {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)? - Duration::days(1);
        let time = NaiveTime::from_hms_opt(23, 59, 0)?;
        Some(DueDate::DateTime(last_day.and_time(time)))
    }

    /// The normalized point in time used for ordering and equality.
    pub fn instant(&self) -> NaiveDateTime {
        match self {
            DueDate::Date(date) => date.and_time(NaiveTime::MIN),
            DueDate::DateTime(value) => *value,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            DueDate::Date(date) => *date,
            DueDate::DateTime(value) => value.date(),
        }
    }

    pub fn has_time(&self) -> bool {
        matches!(self, DueDate::DateTime(_))
    }

    /// Whole days from `reference` to this due date, rounded towards negative
    /// infinity.
    pub fn days_until(&self, reference: NaiveDateTime) -> i64 {
        let delta = self.instant() - reference;
        delta.num_seconds().div_euclid(SECONDS_PER_DAY)
    }

    pub fn status(&self, reference: NaiveDateTime, due_soon_days: i64) -> DueStatus {
        let days = self.days_until(reference);
        if days < 0 {
            DueStatus::Overdue
        } else if days <= due_soon_days {
            DueStatus::DueSoon
        } else {
            DueStatus::Upcoming
        }
    }

    /// The textual form accepted by [`DueDate::parse`].
    pub fn input_form(&self) -> String {
        match self {
            DueDate::Date(date) => date.format(INPUT_DATE_FORMAT).to_string(),
            DueDate::DateTime(value) => value.format(INPUT_DATE_TIME_FORMAT).to_string(),
        }
    }

    pub fn year_month(&self) -> (i32, u32) {
        let date = self.date();
        (date.year(), date.month())
    }
}

fn parse_date_part(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(idx, byte)| idx == 4 || idx == 7 || byte.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    let year = raw.get(0..4)?.parse::<i32>().ok()?;
    let month = raw.get(5..7)?.parse::<u32>().ok()?;
    let day = raw.get(8..10)?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time_part(raw: &str) -> Option<NaiveTime> {
    if raw.len() != 4 || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let hour = raw.get(0..2)?.parse::<u32>().ok()?;
    let minute = raw.get(2..4)?.parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

impl PartialEq for DueDate {
    fn eq(&self, other: &Self) -> bool {
        self.instant() == other.instant()
    }
}

impl Eq for DueDate {}

impl Hash for DueDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant().hash(state);
    }
}

impl PartialOrd for DueDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DueDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant().cmp(&other.instant())
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueDate::Date(date) => write!(f, "{}", date.format(DISPLAY_DATE_FORMAT)),
            DueDate::DateTime(value) => write!(f, "{}", value.format(DISPLAY_DATE_TIME_FORMAT)),
        }
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.input_form())
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DueDate::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_both_accepted_forms() {
        assert_eq!(
            DueDate::parse("2025-09-19").unwrap(),
            DueDate::Date(date(2025, 9, 19))
        );
        let timed = DueDate::parse("2025-09-19 1730").unwrap();
        assert!(timed.has_time());
        assert_eq!(timed.instant(), date(2025, 9, 19).and_hms_opt(17, 30, 0).unwrap());
    }

    #[test]
    fn rejects_malformed_and_impossible_dates() {
        for raw in [
            "2025-02-31",
            "2025-13-01",
            "2025-9-19",
            "19-09-2025",
            "2025/09/19",
            "2025-09-19 2400",
            "2025-09-19 1260",
            "2025-09-19 930",
            "2025-09-19 09:30",
            "",
        ] {
            assert!(
                matches!(DueDate::parse(raw), Err(RosterError::InvalidDateFormat(_))),
                "expected `{raw}` to be rejected"
            );
        }
    }

    #[test]
    fn date_only_equals_midnight() {
        for raw in ["2024-02-29", "2025-01-01", "2030-12-31"] {
            let plain = DueDate::parse(raw).unwrap();
            let midnight = DueDate::parse(&format!("{raw} 0000")).unwrap();
            assert_eq!(plain.instant(), midnight.instant());
            assert_eq!(plain, midnight);
            assert_eq!(plain.cmp(&midnight), Ordering::Equal);
        }
    }

    #[test]
    fn renders_display_forms() {
        assert_eq!(DueDate::parse("2025-09-05").unwrap().to_string(), "05 Sep 2025");
        assert_eq!(
            DueDate::parse("2025-09-05 1405").unwrap().to_string(),
            "05 Sep 2025 02:05 pm"
        );
        assert_eq!(
            DueDate::parse("2025-09-05 0000").unwrap().to_string(),
            "05 Sep 2025 12:00 am"
        );
    }

    #[test]
    fn days_until_floors_partial_days() {
        let reference = date(2025, 9, 19).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(DueDate::parse("2025-09-19").unwrap().days_until(reference), -1);
        assert_eq!(DueDate::parse("2025-09-20").unwrap().days_until(reference), 0);
        assert_eq!(DueDate::parse("2025-09-21 1200").unwrap().days_until(reference), 2);
        assert_eq!(
            DueDate::parse("2025-09-23").unwrap().status(reference, DUE_SOON_DAYS),
            DueStatus::DueSoon
        );
        assert_eq!(
            DueDate::parse("2025-09-25").unwrap().status(reference, DUE_SOON_DAYS),
            DueStatus::Upcoming
        );
        assert_eq!(
            DueDate::parse("2025-09-18").unwrap().status(reference, DUE_SOON_DAYS),
            DueStatus::Overdue
        );
    }

    #[test]
    fn end_of_month_handles_leap_years_and_december() {
        let feb = DueDate::end_of_month(2024, 2).unwrap();
        assert_eq!(feb.input_form(), "2024-02-29 2359");
        let dec = DueDate::end_of_month(2025, 12).unwrap();
        assert_eq!(dec.input_form(), "2025-12-31 2359");
    }

    #[test]
    fn serializes_as_input_form() {
        let due = DueDate::parse("2025-09-19 0830").unwrap();
        let json = serde_json::to_string(&due).unwrap();
        assert_eq!(json, "\"2025-09-19 0830\"");
        let back: DueDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, due);
        assert!(serde_json::from_str::<DueDate>("\"2025-02-30\"").is_err());
    }
}
