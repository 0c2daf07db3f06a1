use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::resolver::{loose_matches, normalize_keyword, resolve, Resolution};
use crate::domain::{normalize_key, LessonTime, Phone, Roster, Student, StudentName};

use super::{student, ServiceError, ServiceResult};

/// Field updates for [`StudentService::edit`]. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct StudentChanges {
    pub name: Option<StudentName>,
    pub phone: Option<Phone>,
    pub lesson_time: Option<LessonTime>,
}

impl StudentChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.lesson_time.is_none()
    }
}

pub struct StudentService;

impl StudentService {
    pub fn add(roster: &mut Roster, student: Student, today: NaiveDate) -> ServiceResult<()> {
        Self::validate_name(roster, None, &student.name)?;
        tracing::info!(student = %student.name, "student added");
        roster.students.push(student);
        roster.refresh_reminders(today);
        roster.touch();
        Ok(())
    }

    pub fn edit(
        roster: &mut Roster,
        id: Uuid,
        changes: StudentChanges,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        if changes.is_empty() {
            return Err(ServiceError::Invalid("No changes supplied".into()));
        }
        if let Some(name) = &changes.name {
            Self::validate_name(roster, Some(id), name)?;
        }
        let old_name = student(roster, id)?.name.clone();
        let target = super::student_mut(roster, id)?;
        if let Some(name) = changes.name {
            target.name = name;
        }
        if let Some(phone) = changes.phone {
            target.phone = phone;
        }
        if let Some(lesson_time) = changes.lesson_time {
            target.lesson_time = lesson_time;
        }
        let new_name = target.name.clone();
        roster
            .attendance
            .rename(old_name.as_str(), new_name.as_str());
        roster.refresh_reminders(today);
        roster.touch();
        Ok(())
    }

    pub fn remove(roster: &mut Roster, id: Uuid, today: NaiveDate) -> ServiceResult<Student> {
        let position = roster
            .students
            .iter()
            .position(|candidate| candidate.id == id)
            .ok_or_else(|| ServiceError::NotFound("Student not found".into()))?;
        let removed = roster.students.remove(position);
        let marks = roster.attendance.remove_all_for(removed.name.as_str());
        roster.refresh_reminders(today);
        roster.touch();
        tracing::info!(student = %removed.name, attendance = marks, "student removed");
        Ok(removed)
    }

    /// Students whose name, phone or lesson time contains any keyword.
    pub fn find<'a>(roster: &'a Roster, keywords: &[String]) -> Vec<&'a Student> {
        loose_matches(&roster.students, keywords)
    }

    /// Resolves `keywords` against the students in `scope` (in display order)
    /// and removes the student only when the resolution is unique.
    pub fn remove_by_keyword(
        roster: &mut Roster,
        scope: &[Uuid],
        keywords: &[String],
        today: NaiveDate,
    ) -> ServiceResult<Resolution<Student>> {
        let candidates: Vec<&Student> = scope
            .iter()
            .filter_map(|id| roster.student(*id))
            .collect();
        let pool = loose_matches(candidates, keywords);
        let resolution = resolve(pool, &normalize_keyword(keywords)).map(Student::clone);
        if let Resolution::Unique(found) = &resolution {
            Self::remove(roster, found.id, today)?;
        }
        Ok(resolution)
    }

    fn validate_name(
        roster: &Roster,
        exclude: Option<Uuid>,
        candidate: &StudentName,
    ) -> ServiceResult<()> {
        let normalized = normalize_key(candidate.as_str());
        let duplicate = roster.students.iter().any(|existing| {
            existing.name.key() == normalized && exclude.map_or(true, |id| existing.id != id)
        });
        if duplicate {
            Err(ServiceError::Invalid(format!(
                "Student `{}` already exists",
                candidate
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::fixtures::{date, roster_with, student};
    use crate::domain::Homework;
    use crate::reminder::{Description, ReminderKind};

    #[test]
    fn add_rejects_duplicate_names_ignoring_case() {
        let (mut roster, _) = roster_with(&["Alex Yeoh"]);
        let err = StudentService::add(
            &mut roster,
            student("alex  yeoh", "92222222", "Tue 1500"),
            date("2026-10-19"),
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));
        assert_eq!(roster.student_count(), 1);
    }

    #[test]
    fn add_generates_payment_reminder() {
        let mut roster = Roster::new("test");
        StudentService::add(
            &mut roster,
            student("Alex Yeoh", "91234567", "Mon 1600"),
            date("2026-10-19"),
        )
        .unwrap();
        let view = roster.reminders.sorted_view();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].kind(), ReminderKind::Payment);
        assert_eq!(
            view[0].description().as_str(),
            "Collect October 2026 payment from Alex Yeoh"
        );
    }

    #[test]
    fn rename_moves_attendance_and_regenerates_reminders() {
        let (mut roster, ids) = roster_with(&["Alex Yeoh"]);
        let today = date("2026-10-19");
        roster.attendance.record("Alex Yeoh", today, true);
        roster.refresh_reminders(today);

        let changes = StudentChanges {
            name: Some(StudentName::new("Alexis Yeoh").unwrap()),
            ..StudentChanges::default()
        };
        StudentService::edit(&mut roster, ids[0], changes, today).unwrap();

        assert_eq!(
            roster.attendance.lookup("alexis yeoh", today),
            crate::domain::AttendanceMark::Present
        );
        let descriptions: Vec<_> = roster
            .reminders
            .iter()
            .map(|r| r.description().to_string())
            .collect();
        assert_eq!(
            descriptions,
            vec!["Collect October 2026 payment from Alexis Yeoh".to_string()]
        );
    }

    #[test]
    fn remove_drops_attendance_and_reminders() {
        let (mut roster, ids) = roster_with(&["Alex Yeoh", "Bea Tan"]);
        let today = date("2026-10-19");
        roster.students[0].homework.push(Homework::new(
            Description::new("Essay").unwrap(),
            date("2026-10-20"),
        ));
        roster.attendance.record("Alex Yeoh", today, false);
        roster.refresh_reminders(today);
        assert_eq!(roster.reminders.len(), 3);

        StudentService::remove(&mut roster, ids[0], today).unwrap();
        assert_eq!(roster.reminders.len(), 1);
        assert_eq!(roster.attendance.summary_for("Alex Yeoh"), (0, 0));
    }

    #[test]
    fn remove_by_keyword_only_mutates_on_unique_match() {
        let (mut roster, ids) = roster_with(&["Marcus Ng", "Marcus Tan"]);
        let today = date("2026-10-19");
        let keywords = vec!["marcus".to_string()];
        let outcome =
            StudentService::remove_by_keyword(&mut roster, &ids, &keywords, today).unwrap();
        assert!(matches!(outcome, Resolution::Ambiguous(ref found) if found.len() == 2));
        assert_eq!(roster.student_count(), 2);

        let keywords = vec!["Marcus".to_string(), "Tan".to_string()];
        let outcome =
            StudentService::remove_by_keyword(&mut roster, &ids, &keywords, today).unwrap();
        assert!(outcome.is_unique());
        assert_eq!(roster.student_count(), 1);
        assert_eq!(roster.students[0].name.as_str(), "Marcus Ng");
    }

    #[test]
    fn remove_by_keyword_respects_scope() {
        let (mut roster, ids) = roster_with(&["Marcus Ng", "Marcus Tan"]);
        let keywords = vec!["marcus".to_string()];
        let outcome = StudentService::remove_by_keyword(
            &mut roster,
            &ids[1..],
            &keywords,
            date("2026-10-19"),
        )
        .unwrap();
        match outcome {
            Resolution::Ambiguous(found) => assert_eq!(found.len(), 1),
            other => panic!("expected ambiguity over the scoped pool, got {other:?}"),
        }
    }
}
