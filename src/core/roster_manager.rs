use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::Roster;
use crate::errors::StorageError;
use crate::reminder::RefreshReport;
use crate::storage::{canonical_name, LoadReport, StorageBackend};

use super::clock::Clock;

/// Outcome of opening a roster.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub name: String,
    pub warnings: Vec<String>,
    pub refresh: RefreshReport,
}

/// Owns the working roster and coordinates it with storage and the clock.
pub struct RosterManager {
    current: Roster,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
}

impl RosterManager {
    /// Starts with an empty roster called `name`; nothing is read from disk.
    pub fn new(name: &str, storage: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Self {
        Self {
            current: Roster::new(name),
            storage,
            clock,
        }
    }

    /// Opens `name` if a file for it exists, otherwise starts it empty.
    pub fn open_or_create(&mut self, name: &str) -> Result<Option<LoadMetadata>, StorageError> {
        match self.load(name) {
            Ok(meta) => Ok(Some(meta)),
            Err(StorageError::NotFound(_)) => {
                self.current = Roster::new(name);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Instant due dates are measured against: the current local time, or
    /// midnight when the clock is pinned to another day.
    pub fn reference_instant(&self) -> NaiveDateTime {
        let now = self.clock.now().naive_local();
        let today = self.clock.today();
        if now.date() == today {
            now
        } else {
            today.and_time(NaiveTime::MIN)
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.current
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.current
    }

    pub fn current_name(&self) -> &str {
        &self.current.name
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn load(&mut self, name: &str) -> Result<LoadMetadata, StorageError> {
        let report = self.storage.load(name)?;
        Ok(self.apply_load(report))
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<LoadMetadata, StorageError> {
        let report = self.storage.load_from_path(path)?;
        Ok(self.apply_load(report))
    }

    pub fn restore(&mut self, backup_name: &str) -> Result<LoadMetadata, StorageError> {
        let name = self.current.name.clone();
        let report = self.storage.restore(&name, backup_name)?;
        Ok(self.apply_load(report))
    }

    pub fn save(&self) -> Result<PathBuf, StorageError> {
        self.storage.save(&self.current)
    }

    /// Renames the working roster and saves it under the new name.
    pub fn save_as(&mut self, name: &str) -> Result<PathBuf, StorageError> {
        self.current.name = name.trim().to_string();
        self.storage.save(&self.current)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), StorageError> {
        self.storage.save_to_path(&self.current, path)
    }

    pub fn list_backups(&self) -> Result<Vec<String>, StorageError> {
        self.storage.list_backups(&self.current.name)
    }

    pub fn list_rosters(&self) -> Result<Vec<String>, StorageError> {
        self.storage.list_rosters()
    }

    /// Installs a freshly read roster. Attendance starts empty and every
    /// system reminder is rebuilt for today.
    fn apply_load(&mut self, report: LoadReport) -> LoadMetadata {
        let LoadReport {
            mut roster,
            warnings,
        } = report;
        roster.attendance.clear();
        let refresh = roster.refresh_reminders(self.clock.today());
        tracing::info!(
            roster = %roster.name,
            file = %canonical_name(&roster.name),
            students = roster.student_count(),
            reminders = roster.reminders.len(),
            "roster loaded"
        );
        let name = roster.name.clone();
        self.current = roster;
        LoadMetadata {
            name,
            warnings,
            refresh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::services::fixtures;
    use crate::reminder::{Description, DueDate, Reminder, ReminderKind};
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    fn manager(temp: &TempDir) -> RosterManager {
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), None).unwrap();
        RosterManager::new(
            "main",
            Box::new(storage),
            Box::new(FixedClock::new(fixtures::date("2026-10-19"))),
        )
    }

    #[test]
    fn open_missing_roster_starts_empty() {
        let temp = TempDir::new().unwrap();
        let mut manager = manager(&temp);
        assert!(manager.open_or_create("fresh").unwrap().is_none());
        assert_eq!(manager.current_name(), "fresh");
        assert_eq!(manager.roster().student_count(), 0);
    }

    #[test]
    fn load_regenerates_stale_system_reminders() {
        let temp = TempDir::new().unwrap();
        let mut manager = manager(&temp);
        let roster = manager.roster_mut();
        roster
            .students
            .push(fixtures::student("Alex Yeoh", "91234567", "Mon 1600"));
        roster
            .reminders
            .add(Reminder::new(
                DueDate::parse("2026-09-30 2359").unwrap(),
                Description::new("Collect September 2026 payment from Alex Yeoh").unwrap(),
                ReminderKind::Payment,
            ))
            .unwrap();
        roster.attendance.record("Alex Yeoh", fixtures::date("2026-10-19"), true);
        manager.save().unwrap();

        let meta = manager.load("main").unwrap();
        assert_eq!(meta.refresh.removed, 1);
        assert_eq!(meta.refresh.payment_added, 1);
        let roster = manager.roster();
        let only = roster.reminders.sorted_view();
        assert_eq!(
            only[0].description().as_str(),
            "Collect October 2026 payment from Alex Yeoh"
        );
        assert_eq!(roster.attendance.summary_for("Alex Yeoh"), (0, 0));
    }

    #[test]
    fn save_as_renames_target() {
        let temp = TempDir::new().unwrap();
        let mut manager = manager(&temp);
        let path = manager.save_as("Term 4").unwrap();
        assert!(path.ends_with("term_4.json"));
        assert_eq!(manager.list_rosters().unwrap(), vec!["term_4".to_string()]);
    }
}
