use chrono::{NaiveDate, NaiveTime};

use super::{
    due_date::DueDate,
    list::ReminderList,
    record::{Description, Reminder, ReminderKind},
};
use crate::domain::{BillingMonth, Homework, Student};

/// Homework is surfaced when its deadline is this many days away or fewer.
const HOMEWORK_WINDOW_DAYS: i64 = 1;

/// A synthesized reminder that was dropped because a structurally-equal
/// reminder was already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerationCollision {
    pub dropped: Reminder,
    pub kept_kind: ReminderKind,
}

/// Outcome of a [`ReminderRegenerator::refresh`] pass.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    pub removed: usize,
    pub payment_added: usize,
    pub homework_added: usize,
    pub collisions: Vec<RegenerationCollision>,
}

impl RefreshReport {
    pub fn added(&self) -> usize {
        self.payment_added + self.homework_added
    }
}

/// Rebuilds system-generated reminders from student state.
pub struct ReminderRegenerator;

impl ReminderRegenerator {
    /// Discards every homework and payment reminder and synthesizes a fresh set
    /// for `today`. User reminders are never touched.
    ///
    /// Collisions are resolved by keeping the record already present, so
    /// calling this twice with unchanged input yields the same contents.
    pub fn refresh(
        list: &mut ReminderList,
        students: &[Student],
        today: NaiveDate,
    ) -> RefreshReport {
        let mut report = RefreshReport {
            removed: list.remove_where(|reminder| reminder.kind().is_system()),
            ..RefreshReport::default()
        };

        for reminder in Self::synthesize(students, today) {
            if let Some(existing) = list.get(&reminder) {
                tracing::debug!(
                    reminder = %reminder,
                    kept = existing.kind().label(),
                    "dropping colliding system reminder"
                );
                report.collisions.push(RegenerationCollision {
                    kept_kind: existing.kind(),
                    dropped: reminder,
                });
                continue;
            }
            let kind = reminder.kind();
            if list.add(reminder).is_ok() {
                match kind {
                    ReminderKind::Payment => report.payment_added += 1,
                    ReminderKind::Homework => report.homework_added += 1,
                    ReminderKind::User => {}
                }
            }
        }

        tracing::debug!(
            removed = report.removed,
            payment = report.payment_added,
            homework = report.homework_added,
            collisions = report.collisions.len(),
            "reminders regenerated"
        );
        report
    }

    /// All system reminders implied by `students` on `today`, in student order.
    pub fn synthesize(students: &[Student], today: NaiveDate) -> Vec<Reminder> {
        let month = BillingMonth::of(today);
        let mut reminders = Vec::new();
        for student in students {
            if let Some(reminder) = Self::payment_reminder(student, month) {
                reminders.push(reminder);
            }
        }
        for student in students {
            for homework in student.pending_homework() {
                if Self::homework_is_due(homework, today) {
                    reminders.push(Self::homework_reminder(student, homework));
                }
            }
        }
        reminders
    }

    /// The reminder for an unpaid `month`, or `None` once the student has paid.
    pub fn payment_reminder(student: &Student, month: BillingMonth) -> Option<Reminder> {
        if student.has_paid(month) {
            return None;
        }
        Self::payment_reminder_for(student, month)
    }

    /// The payment reminder `student` would get for `month`, ignoring whether
    /// it has been paid.
    pub fn payment_reminder_for(student: &Student, month: BillingMonth) -> Option<Reminder> {
        let due = DueDate::end_of_month(month.year(), month.month())?;
        let text = format!("Collect {} payment from {}", month.label(), student.name);
        let description = Description::new(text).ok()?;
        Some(Reminder::new(due, description, ReminderKind::Payment))
    }

    pub fn homework_reminder(student: &Student, homework: &Homework) -> Reminder {
        let due = DueDate::from_date(homework.deadline);
        let text = format!("{}: {} (due {})", student.name, homework.description, due);
        // Built from a non-empty name and description, so never blank.
        let description =
            Description::new(&text).unwrap_or_else(|_| homework.description.clone());
        Reminder::new(due, description, ReminderKind::Homework)
    }

    pub fn homework_is_due(homework: &Homework, today: NaiveDate) -> bool {
        let reference = today.and_time(NaiveTime::MIN);
        let days = DueDate::from_date(homework.deadline).days_until(reference);
        (0..=HOMEWORK_WINDOW_DAYS).contains(&days)
    }

    /// Removes the homework reminder for one item, if one was generated.
    pub fn clear_homework(
        list: &mut ReminderList,
        student: &Student,
        homework: &Homework,
    ) -> bool {
        let expected = Self::homework_reminder(student, homework);
        Self::remove_if_kind(list, &expected, ReminderKind::Homework)
    }

    /// Removes the payment reminder for one student and month, if present.
    pub fn clear_payment(
        list: &mut ReminderList,
        student: &Student,
        month: BillingMonth,
    ) -> bool {
        match Self::payment_reminder_for(student, month) {
            Some(expected) => Self::remove_if_kind(list, &expected, ReminderKind::Payment),
            None => false,
        }
    }

    fn remove_if_kind(list: &mut ReminderList, expected: &Reminder, kind: ReminderKind) -> bool {
        let matches = list
            .get(expected)
            .map(|stored| stored.kind() == kind)
            .unwrap_or(false);
        matches && list.remove(expected).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LessonTime, Phone, StudentName};

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn student(name: &str) -> Student {
        Student::new(
            StudentName::new(name).unwrap(),
            Phone::new("91234567").unwrap(),
            LessonTime::parse("Mon 1600").unwrap(),
        )
    }

    fn homework(text: &str, deadline: &str) -> Homework {
        Homework::new(Description::new(text).unwrap(), date(deadline))
    }

    #[test]
    fn homework_window_covers_today_and_tomorrow() {
        let today = date("2025-09-19");
        assert!(!ReminderRegenerator::homework_is_due(&homework("a", "2025-09-18"), today));
        assert!(ReminderRegenerator::homework_is_due(&homework("a", "2025-09-19"), today));
        assert!(ReminderRegenerator::homework_is_due(&homework("a", "2025-09-20"), today));
        assert!(!ReminderRegenerator::homework_is_due(&homework("a", "2025-09-21"), today));
    }

    #[test]
    fn payment_reminder_is_due_at_end_of_month() {
        let alex = student("Alex Yeoh");
        let reminder =
            ReminderRegenerator::payment_reminder(&alex, BillingMonth::parse("2025-09").unwrap())
                .unwrap();
        assert_eq!(reminder.due().input_form(), "2025-09-30 2359");
        assert_eq!(
            reminder.description().as_str(),
            "Collect September 2025 payment from Alex Yeoh"
        );
    }

    #[test]
    fn colliding_homework_is_deduplicated() {
        let mut a = student("Twin");
        let mut b = student("Twin");
        a.homework.push(homework("Essay", "2025-09-20"));
        b.homework.push(homework("Essay", "2025-09-20"));
        let month = BillingMonth::parse("2025-09").unwrap();
        a.paid_months.insert(month);
        b.paid_months.insert(month);

        let mut list = ReminderList::new();
        let report = ReminderRegenerator::refresh(&mut list, &[a, b], date("2025-09-19"));
        assert_eq!(list.len(), 1);
        assert_eq!(report.homework_added, 1);
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].kept_kind, ReminderKind::Homework);
    }
}
