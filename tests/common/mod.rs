#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use roster_core::{
    config::ConfigManager,
    core::{FixedClock, RosterManager},
    domain::{LessonTime, Phone, Student, StudentName},
    storage::JsonStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const TODAY: &str = "2026-10-19";

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

pub fn student(name: &str, phone: &str, lesson: &str) -> Student {
    Student::new(
        StudentName::new(name).expect("valid name"),
        Phone::new(phone).expect("valid phone"),
        LessonTime::parse(lesson).expect("valid lesson time"),
    )
}

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by a unique directory, with the clock
/// pinned to [`TODAY`].
pub fn setup_test_env() -> (RosterManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let manager = RosterManager::new(
        "main",
        Box::new(storage),
        Box::new(FixedClock::new(date(TODAY))),
    );
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (manager, config_manager, base)
}
