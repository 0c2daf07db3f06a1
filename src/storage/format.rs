//! On-disk shape of a roster file.
//!
//! Files are read leniently: each student and reminder is decoded on its own
//! so one bad entry is reported as a warning instead of failing the load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Roster, Student};
use crate::reminder::{Description, DueDate, Reminder, ReminderKind};

/// Loaded roster plus anything worth telling the user about the file.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub roster: Roster,
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
pub(crate) struct RosterFileOut<'a> {
    name: &'a str,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    students: &'a [Student],
    reminders: Vec<&'a Reminder>,
}

impl<'a> RosterFileOut<'a> {
    pub(crate) fn from_roster(roster: &'a Roster) -> Self {
        Self {
            name: &roster.name,
            created_at: roster.created_at,
            updated_at: roster.updated_at,
            students: &roster.students,
            reminders: roster.reminders.sorted_view(),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct RosterFileIn {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    students: Vec<Value>,
    #[serde(default)]
    reminders: Vec<Value>,
}

/// Either the current `{due, description, kind}` record or the older
/// `{dueDate, description, isModifiable}` record with a kind prefix.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredReminder {
    Current(Reminder),
    Legacy(LegacyReminder),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyReminder {
    due_date: String,
    description: String,
    #[serde(default = "default_modifiable")]
    is_modifiable: bool,
}

fn default_modifiable() -> bool {
    true
}

impl LegacyReminder {
    fn into_reminder(self) -> Result<Reminder, String> {
        let due = DueDate::parse(&self.due_date).map_err(|err| err.to_string())?;
        let (kind, text) = if self.is_modifiable {
            (ReminderKind::User, self.description.as_str())
        } else {
            split_legacy_prefix(&self.description)
                .ok_or_else(|| format!("unrecognised system reminder `{}`", self.description))?
        };
        let description = Description::new(text).map_err(|err| err.to_string())?;
        Ok(Reminder::new(due, description, kind))
    }
}

/// Splits a two-letter kind prefix (`PM`, `HW`) off a legacy description.
fn split_legacy_prefix(raw: &str) -> Option<(ReminderKind, &str)> {
    let trimmed = raw.trim_start();
    let prefix = trimmed.get(..2)?;
    let kind = ReminderKind::from_legacy_prefix(prefix)?;
    let rest = trimmed[2..].trim_start_matches([':', '-', ' ']);
    Some((kind, rest))
}

impl RosterFileIn {
    pub(crate) fn into_report(self, fallback_name: &str) -> LoadReport {
        let mut warnings = Vec::new();
        let mut roster = Roster::new(self.name.unwrap_or_else(|| fallback_name.to_string()));
        if let Some(created_at) = self.created_at {
            roster.created_at = created_at;
        }

        for (position, raw) in self.students.into_iter().enumerate() {
            let nulls = count_null_participation(&raw);
            match serde_json::from_value::<Student>(raw) {
                Ok(student) => {
                    if nulls > 0 {
                        warnings.push(format!(
                            "{}: dropped {} empty participation entr{}",
                            student.name,
                            nulls,
                            if nulls == 1 { "y" } else { "ies" }
                        ));
                    }
                    if roster.student_by_name(student.name.as_str()).is_some() {
                        warnings.push(format!("skipped duplicate student `{}`", student.name));
                        continue;
                    }
                    roster.students.push(student);
                }
                Err(err) => warnings.push(format!("skipped student #{}: {err}", position + 1)),
            }
        }

        for (position, raw) in self.reminders.into_iter().enumerate() {
            let decoded = serde_json::from_value::<StoredReminder>(raw)
                .map_err(|err| err.to_string())
                .and_then(|stored| match stored {
                    StoredReminder::Current(reminder) => Ok(reminder),
                    StoredReminder::Legacy(legacy) => legacy.into_reminder(),
                });
            match decoded {
                Ok(reminder) => {
                    if let Err(err) = roster.reminders.add(reminder) {
                        warnings.push(err.to_string());
                    }
                }
                Err(err) => warnings.push(format!("skipped reminder #{}: {err}", position + 1)),
            }
        }

        roster.updated_at = self.updated_at.unwrap_or(roster.created_at);
        LoadReport { roster, warnings }
    }
}

fn count_null_participation(raw: &Value) -> usize {
    raw.get("participation")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter(|entry| entry.is_null()).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> LoadReport {
        serde_json::from_value::<RosterFileIn>(value)
            .unwrap()
            .into_report("fallback")
    }

    #[test]
    fn legacy_reminders_recover_kind_from_prefix() {
        let report = decode(json!({
            "reminders": [
                { "dueDate": "2026-10-31 2359", "description": "PM Collect October 2026 payment from Alex", "isModifiable": false },
                { "dueDate": "2026-10-20", "description": "HW Alex: Essay (due 20 Oct 2026)", "isModifiable": false },
                { "dueDate": "2026-10-22", "description": "Buy chalk", "isModifiable": true }
            ]
        }));
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        let kinds: Vec<_> = report
            .roster
            .reminders
            .sorted_view()
            .iter()
            .map(|r| (r.kind(), r.description().to_string()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (
                    ReminderKind::Homework,
                    "Alex: Essay (due 20 Oct 2026)".to_string()
                ),
                (ReminderKind::User, "Buy chalk".to_string()),
                (
                    ReminderKind::Payment,
                    "Collect October 2026 payment from Alex".to_string()
                ),
            ]
        );
        assert_eq!(report.roster.name, "fallback");
    }

    #[test]
    fn bad_entries_become_warnings() {
        let report = decode(json!({
            "name": "Term 4",
            "reminders": [
                { "due": "2026-02-31", "description": "Bad date", "kind": "user" },
                { "due": "2026-10-22", "description": "Good", "kind": "user" },
                { "due": "2026-10-22", "description": "Good", "kind": "user" }
            ]
        }));
        assert_eq!(report.roster.name, "Term 4");
        assert_eq!(report.roster.reminders.len(), 1);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn null_participation_entries_are_dropped_with_warning() {
        let report = decode(json!({
            "students": [{
                "id": "7d5b2b8e-3f0a-4a53-9d55-2c6f6f2f9d11",
                "name": "Alex Yeoh",
                "phone": "91234567",
                "lesson_time": "Mon 1600",
                "participation": [null, { "date": "2026-10-01", "score": 4 }, null]
            }]
        }));
        let student = &report.roster.students[0];
        assert_eq!(student.participation.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("dropped 2"));
    }

    #[test]
    fn legacy_prefix_split() {
        assert_eq!(
            split_legacy_prefix("PM: pay up"),
            Some((ReminderKind::Payment, "pay up"))
        );
        assert_eq!(split_legacy_prefix("XX nope"), None);
        assert_eq!(split_legacy_prefix("H"), None);
    }
}
