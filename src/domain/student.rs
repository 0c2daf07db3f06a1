use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    billing::BillingMonth,
    common::normalize_key,
    homework::Homework,
    lesson::LessonTime,
    participation::ParticipationHistory,
};
use crate::errors::RosterError;

const MIN_PHONE_DIGITS: usize = 3;
const MAX_PHONE_DIGITS: usize = 15;

/// Display name of a student. Runs of whitespace collapse to one space; case is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentName(String);

impl StudentName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RosterError> {
        let collapsed = raw.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        let valid =
            collapsed.chars().any(char::is_alphanumeric) && collapsed.chars().all(is_name_char);
        if valid {
            Ok(Self(collapsed))
        } else {
            Err(RosterError::InvalidName(raw.as_ref().to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for uniqueness checks and attendance lookups.
    pub fn key(&self) -> String {
        normalize_key(&self.0)
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch.is_whitespace() || matches!(ch, '\'' | '-' | '.')
}

impl TryFrom<String> for StudentName {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StudentName::new(value)
    }
}

impl From<StudentName> for String {
    fn from(value: StudentName) -> Self {
        value.0
    }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RosterError> {
        let trimmed = raw.as_ref().trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let valid = (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len())
            && digits.bytes().all(|byte| byte.is_ascii_digit());
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(RosterError::InvalidPhone(raw.as_ref().to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Phone {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Phone::new(value)
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub name: StudentName,
    pub phone: Phone,
    pub lesson_time: LessonTime,
    #[serde(default)]
    pub homework: Vec<Homework>,
    #[serde(default)]
    pub paid_months: BTreeSet<BillingMonth>,
    #[serde(default)]
    pub participation: ParticipationHistory,
}

impl Student {
    pub fn new(name: StudentName, phone: Phone, lesson_time: LessonTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            lesson_time,
            homework: Vec::new(),
            paid_months: BTreeSet::new(),
            participation: ParticipationHistory::new(),
        }
    }

    pub fn has_paid(&self, month: BillingMonth) -> bool {
        self.paid_months.contains(&month)
    }

    pub fn pending_homework(&self) -> impl Iterator<Item = &Homework> {
        self.homework.iter().filter(|item| item.is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_name_validation() {
        let name = StudentName::new("  O'Neil-Smith Jr. ").unwrap();
        assert_eq!(name.as_str(), "O'Neil-Smith Jr.");
        assert!(StudentName::new("").is_err());
        assert!(StudentName::new("---").is_err());
        assert!(StudentName::new("Bob@home").is_err());
        assert_eq!(StudentName::new("Alex  Yeoh").unwrap().key(), "alex yeoh");
    }

    #[test]
    fn student_name_collapses_inner_whitespace() {
        let name = StudentName::new(" Alex \t  Yeoh ").unwrap();
        assert_eq!(name.as_str(), "Alex Yeoh");
        assert_eq!(name, StudentName::new("Alex Yeoh").unwrap());
    }

    #[test]
    fn phone_validation() {
        assert!(Phone::new("91234567").is_ok());
        assert!(Phone::new("+6591234567").is_ok());
        assert!(Phone::new("12").is_err());
        assert!(Phone::new("9123 4567").is_err());
        assert!(Phone::new("1234567890123456").is_err());
    }
}
