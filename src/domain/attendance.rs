use std::collections::HashMap;

use chrono::NaiveDate;

use super::common::normalize_key;

/// Attendance state of one student on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceMark {
    Present,
    Absent,
    Unset,
}

impl AttendanceMark {
    pub fn label(self) -> &'static str {
        match self {
            AttendanceMark::Present => "present",
            AttendanceMark::Absent => "absent",
            AttendanceMark::Unset => "-",
        }
    }
}

/// Per-student, per-date presence map keyed by normalized student name.
///
/// Session state only: it is cleared whenever a roster is loaded and is never
/// written to disk.
#[derive(Debug, Clone, Default)]
pub struct AttendanceIndex {
    marks: HashMap<String, HashMap<NaiveDate, bool>>,
    current_ui_date: Option<NaiveDate>,
}

impl AttendanceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, date: NaiveDate, present: bool) {
        self.marks
            .entry(normalize_key(name))
            .or_default()
            .insert(date, present);
    }

    pub fn lookup(&self, name: &str, date: NaiveDate) -> AttendanceMark {
        match self
            .marks
            .get(&normalize_key(name))
            .and_then(|dates| dates.get(&date))
        {
            Some(true) => AttendanceMark::Present,
            Some(false) => AttendanceMark::Absent,
            None => AttendanceMark::Unset,
        }
    }

    pub fn remove_all_for(&mut self, name: &str) -> usize {
        self.marks
            .remove(&normalize_key(name))
            .map(|dates| dates.len())
            .unwrap_or(0)
    }

    /// Moves every entry recorded under `old` to `new`.
    pub fn rename(&mut self, old: &str, new: &str) {
        let old_key = normalize_key(old);
        let new_key = normalize_key(new);
        if old_key == new_key {
            return;
        }
        if let Some(dates) = self.marks.remove(&old_key) {
            self.marks.entry(new_key).or_default().extend(dates);
        }
    }

    /// `(present, recorded)` counts for a student.
    pub fn summary_for(&self, name: &str) -> (usize, usize) {
        self.marks
            .get(&normalize_key(name))
            .map(|dates| {
                let present = dates.values().filter(|present| **present).count();
                (present, dates.len())
            })
            .unwrap_or((0, 0))
    }

    pub fn clear(&mut self) {
        self.marks.clear();
        self.current_ui_date = None;
    }

    pub fn current_ui_date(&self) -> Option<NaiveDate> {
        self.current_ui_date
    }

    pub fn set_current_ui_date(&mut self, date: NaiveDate) {
        self.current_ui_date = Some(date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn lookup_uses_normalized_names() {
        let mut index = AttendanceIndex::new();
        index.record("Alex Yeoh", date("2025-09-19"), true);
        assert_eq!(
            index.lookup("  alex   YEOH ", date("2025-09-19")),
            AttendanceMark::Present
        );
        assert_eq!(
            index.lookup("Alex Yeoh", date("2025-09-20")),
            AttendanceMark::Unset
        );
    }

    #[test]
    fn record_overwrites_same_date() {
        let mut index = AttendanceIndex::new();
        index.record("Bea", date("2025-09-19"), true);
        index.record("bea", date("2025-09-19"), false);
        assert_eq!(index.lookup("Bea", date("2025-09-19")), AttendanceMark::Absent);
        assert_eq!(index.summary_for("BEA"), (0, 1));
    }

    #[test]
    fn remove_and_rename_move_entries() {
        let mut index = AttendanceIndex::new();
        index.record("Bea", date("2025-09-19"), true);
        index.rename("Bea", "Bea Tan");
        assert_eq!(index.lookup("Bea", date("2025-09-19")), AttendanceMark::Unset);
        assert_eq!(
            index.lookup("bea tan", date("2025-09-19")),
            AttendanceMark::Present
        );
        assert_eq!(index.remove_all_for("Bea Tan"), 1);
        assert_eq!(index.summary_for("Bea Tan"), (0, 0));
    }

    #[test]
    fn clear_resets_cursor() {
        let mut index = AttendanceIndex::new();
        index.set_current_ui_date(date("2025-09-19"));
        index.record("Bea", date("2025-09-19"), true);
        index.clear();
        assert!(index.current_ui_date().is_none());
        assert_eq!(index.summary_for("Bea"), (0, 0));
    }
}
