use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::{attendance::AttendanceIndex, common::normalize_key, student::Student};
use crate::reminder::{RefreshReport, ReminderList, ReminderRegenerator};

/// The tutor's working set: students, their reminders and the session-only
/// attendance index.
#[derive(Debug, Clone)]
pub struct Roster {
    pub name: String,
    pub students: Vec<Student>,
    pub reminders: ReminderList,
    pub attendance: AttendanceIndex,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Roster {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            students: Vec::new(),
            reminders: ReminderList::new(),
            attendance: AttendanceIndex::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn student(&self, id: Uuid) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    pub fn student_mut(&mut self, id: Uuid) -> Option<&mut Student> {
        self.students.iter_mut().find(|student| student.id == id)
    }

    /// Finds a student by name, ignoring case and extra whitespace.
    pub fn student_by_name(&self, name: &str) -> Option<&Student> {
        let key = normalize_key(name);
        self.students
            .iter()
            .find(|student| student.name.key() == key)
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Rebuilds every system reminder from current student state.
    pub fn refresh_reminders(&mut self, today: NaiveDate) -> RefreshReport {
        ReminderRegenerator::refresh(&mut self.reminders, &self.students, today)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
