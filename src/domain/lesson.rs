use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::RosterError;

/// Weekly lesson slot, written as `Mon 1600`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LessonTime {
    pub day: Weekday,
    pub start: NaiveTime,
}

impl LessonTime {
    pub fn new(day: Weekday, start: NaiveTime) -> Self {
        Self { day, start }
    }

    pub fn parse(raw: &str) -> Result<Self, RosterError> {
        let invalid = || RosterError::InvalidLessonTime(raw.to_string());
        let mut parts = raw.split_whitespace();
        let (Some(day), Some(time), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let day = Weekday::from_str(day).map_err(|_| invalid())?;
        if time.len() != 4 || !time.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u32 = time[..2].parse().map_err(|_| invalid())?;
        let minute: u32 = time[2..].parse().map_err(|_| invalid())?;
        let start = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?;
        Ok(Self { day, start })
    }
}

impl fmt::Display for LessonTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}{:02}",
            self.day,
            self.start.hour(),
            self.start.minute()
        )
    }
}

impl TryFrom<String> for LessonTime {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LessonTime::parse(&value)
    }
}

impl From<LessonTime> for String {
    fn from(value: LessonTime) -> Self {
        value.to_string()
    }
}
