use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use super::due_date::DueDate;
use crate::errors::RosterError;

/// Non-empty, trimmed reminder text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RosterError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            Err(RosterError::EmptyDescription)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Description {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Description::new(value)
    }
}

impl From<Description> for String {
    fn from(value: Description) -> Self {
        value.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Origin of a reminder. Only [`ReminderKind::User`] reminders may be edited
/// or deleted directly; the others are rebuilt from student state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    User,
    Homework,
    Payment,
}

impl ReminderKind {
    pub fn is_modifiable(self) -> bool {
        matches!(self, ReminderKind::User)
    }

    pub fn is_system(self) -> bool {
        !self.is_modifiable()
    }

    /// Explanation shown when a user tries to edit or delete a generated reminder.
    pub fn lock_message(self) -> Option<&'static str> {
        match self {
            ReminderKind::User => None,
            ReminderKind::Homework => Some(
                "Homework reminders are generated automatically; mark the homework done to clear it.",
            ),
            ReminderKind::Payment => Some(
                "Payment reminders are generated automatically; mark the student paid to clear it.",
            ),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReminderKind::User => "Reminder",
            ReminderKind::Homework => "Homework",
            ReminderKind::Payment => "Payment",
        }
    }

    /// Two-letter tag used by the legacy on-disk encoding.
    pub fn legacy_prefix(self) -> Option<&'static str> {
        match self {
            ReminderKind::User => None,
            ReminderKind::Homework => Some("HW"),
            ReminderKind::Payment => Some("PM"),
        }
    }

    pub fn from_legacy_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "HW" => Some(ReminderKind::Homework),
            "PM" => Some(ReminderKind::Payment),
            _ => None,
        }
    }
}

/// An immutable due date and description pair.
///
/// Equality and hashing are structural over `(due, description)`; the kind
/// does not participate, so two reminders that render the same are the same
/// reminder regardless of where they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    due: DueDate,
    description: Description,
    kind: ReminderKind,
}

impl Reminder {
    pub fn new(due: DueDate, description: Description, kind: ReminderKind) -> Self {
        Self {
            due,
            description,
            kind,
        }
    }

    pub fn user(due: DueDate, description: Description) -> Self {
        Self::new(due, description, ReminderKind::User)
    }

    pub fn due(&self) -> &DueDate {
        &self.due
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn kind(&self) -> ReminderKind {
        self.kind
    }

    pub fn is_modifiable(&self) -> bool {
        self.kind.is_modifiable()
    }

    /// Same content with a different due date or description.
    pub fn with_changes(&self, due: Option<DueDate>, description: Option<Description>) -> Self {
        Self {
            due: due.unwrap_or(self.due),
            description: description.unwrap_or_else(|| self.description.clone()),
            kind: self.kind,
        }
    }
}

impl PartialEq for Reminder {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.description == other.description
    }
}

impl Eq for Reminder {}

impl Hash for Reminder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.due.hash(state);
        self.description.hash(state);
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.due)
    }
}
