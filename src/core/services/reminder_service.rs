use crate::core::resolver::{loose_matches, normalize_keyword, resolve, Resolution};
use crate::domain::Roster;
use crate::reminder::{Description, DueDate, Reminder};

use super::{ServiceError, ServiceResult};

/// User-facing reminder operations. Positions index the sorted view.
pub struct ReminderService;

impl ReminderService {
    pub fn add(roster: &mut Roster, due: DueDate, description: Description) -> ServiceResult<()> {
        let reminder = Reminder::user(due, description);
        tracing::debug!(reminder = %reminder, "adding reminder");
        roster.reminders.add(reminder)?;
        roster.touch();
        Ok(())
    }

    /// Replaces the due date and/or description of the reminder at `index`.
    pub fn edit(
        roster: &mut Roster,
        index: usize,
        due: Option<DueDate>,
        description: Option<Description>,
    ) -> ServiceResult<Reminder> {
        if due.is_none() && description.is_none() {
            return Err(ServiceError::Invalid("No changes supplied".into()));
        }
        let current = Self::modifiable_at(roster, index)?;
        let updated = current.with_changes(due, description);
        roster.reminders.replace(&current, updated.clone())?;
        roster.touch();
        Ok(updated)
    }

    pub fn remove_at(roster: &mut Roster, index: usize) -> ServiceResult<Reminder> {
        let current = Self::modifiable_at(roster, index)?;
        let removed = roster.reminders.remove(&current)?;
        roster.touch();
        Ok(removed)
    }

    /// Resolves `keywords` against user reminders only and removes the match
    /// when it is unique.
    pub fn remove_by_keyword(
        roster: &mut Roster,
        keywords: &[String],
    ) -> ServiceResult<Resolution<Reminder>> {
        let editable: Vec<&Reminder> = roster
            .reminders
            .sorted_view()
            .into_iter()
            .filter(|reminder| reminder.is_modifiable())
            .collect();
        let pool = loose_matches(editable, keywords);
        let resolution = match resolve(pool, &normalize_keyword(keywords)) {
            Resolution::Ambiguous(found) => Resolution::Ambiguous(
                found
                    .into_iter()
                    .filter(|reminder| reminder.is_modifiable())
                    .cloned()
                    .collect(),
            ),
            other => other.map(Reminder::clone),
        };
        if let Resolution::Unique(found) = &resolution {
            roster.reminders.remove(found)?;
            roster.touch();
        }
        Ok(resolution)
    }

    /// The reminder at `index` in the sorted view.
    pub fn at(roster: &Roster, index: usize) -> ServiceResult<Reminder> {
        roster
            .reminders
            .sorted_view()
            .get(index)
            .map(|reminder| (*reminder).clone())
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No reminder at position {}", index + 1))
            })
    }

    fn modifiable_at(roster: &Roster, index: usize) -> ServiceResult<Reminder> {
        let reminder = Self::at(roster, index)?;
        match reminder.kind().lock_message() {
            Some(message) => Err(ServiceError::Locked(message.to_string())),
            None => Ok(reminder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::fixtures::{date, roster_with};
    use crate::domain::Homework;
    use crate::errors::RosterError;
    use crate::reminder::ReminderKind;

    fn due(raw: &str) -> DueDate {
        DueDate::parse(raw).unwrap()
    }

    fn text(raw: &str) -> Description {
        Description::new(raw).unwrap()
    }

    #[test]
    fn add_rejects_structural_duplicates() {
        let mut roster = Roster::new("test");
        ReminderService::add(&mut roster, due("2026-10-20"), text("Buy books")).unwrap();
        let err =
            ReminderService::add(&mut roster, due("2026-10-20 0000"), text("Buy books"))
                .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Roster(RosterError::DuplicateReminder(_))
        ));
    }

    #[test]
    fn edit_and_remove_reject_system_reminders() {
        let (mut roster, _) = roster_with(&["Alex Yeoh"]);
        let today = date("2026-10-19");
        roster.students[0]
            .homework
            .push(Homework::new(text("Algebra worksheet"), date("2026-10-20")));
        roster.refresh_reminders(today);
        ReminderService::add(&mut roster, due("2026-10-21"), text("Plan term")).unwrap();

        let view: Vec<ReminderKind> = roster
            .reminders
            .sorted_view()
            .iter()
            .map(|r| r.kind())
            .collect();
        assert_eq!(
            view,
            vec![
                ReminderKind::Homework,
                ReminderKind::User,
                ReminderKind::Payment
            ]
        );

        let err = ReminderService::edit(&mut roster, 0, None, Some(text("x"))).unwrap_err();
        assert!(matches!(err, ServiceError::Locked(_)));
        let err = ReminderService::remove_at(&mut roster, 2).unwrap_err();
        assert!(matches!(err, ServiceError::Locked(_)));
        assert_eq!(roster.reminders.len(), 3);

        let removed = ReminderService::remove_at(&mut roster, 1).unwrap();
        assert_eq!(removed.description().as_str(), "Plan term");
    }

    #[test]
    fn edit_keeps_position_semantics_of_sorted_view() {
        let mut roster = Roster::new("test");
        ReminderService::add(&mut roster, due("2026-10-20"), text("A")).unwrap();
        ReminderService::add(&mut roster, due("2026-10-25"), text("B")).unwrap();
        let updated =
            ReminderService::edit(&mut roster, 0, Some(due("2026-10-30 0900")), None).unwrap();
        assert_eq!(updated.description().as_str(), "A");
        let order: Vec<_> = roster
            .reminders
            .sorted_view()
            .iter()
            .map(|r| r.description().to_string())
            .collect();
        assert_eq!(order, vec!["B", "A"]);
    }

    #[test]
    fn edit_to_existing_reminder_is_duplicate() {
        let mut roster = Roster::new("test");
        ReminderService::add(&mut roster, due("2026-10-20"), text("A")).unwrap();
        ReminderService::add(&mut roster, due("2026-10-25"), text("A")).unwrap();
        let err = ReminderService::edit(&mut roster, 1, Some(due("2026-10-20")), None).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Roster(RosterError::DuplicateReminder(_))
        ));
    }

    #[test]
    fn out_of_range_index_is_not_found() {
        let mut roster = Roster::new("test");
        let err = ReminderService::remove_at(&mut roster, 0).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn remove_by_keyword_ignores_system_reminders() {
        let (mut roster, _) = roster_with(&["Alex Yeoh"]);
        roster.refresh_reminders(date("2026-10-19"));
        ReminderService::add(&mut roster, due("2026-10-22"), text("Collect textbook")).unwrap();

        let keywords = vec!["collect".to_string()];
        let outcome = ReminderService::remove_by_keyword(&mut roster, &keywords).unwrap();
        match outcome {
            Resolution::Ambiguous(found) => {
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].kind(), ReminderKind::User);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }

        let keywords = vec!["Collect".to_string(), "textbook".to_string()];
        let outcome = ReminderService::remove_by_keyword(&mut roster, &keywords).unwrap();
        assert!(outcome.is_unique());
        assert_eq!(roster.reminders.len(), 1);
    }

    #[test]
    fn remove_by_keyword_matches_due_rendering_first() {
        let mut roster = Roster::new("test");
        ReminderService::add(&mut roster, due("2026-10-22"), text("Call parent")).unwrap();
        ReminderService::add(&mut roster, due("2026-10-23"), text("Call parent")).unwrap();
        let keywords: Vec<String> = ["22", "Oct", "2026"].iter().map(|s| s.to_string()).collect();
        let outcome = ReminderService::remove_by_keyword(&mut roster, &keywords).unwrap();
        match outcome {
            Resolution::Unique(found) => assert_eq!(found.due().input_form(), "2026-10-22"),
            other => panic!("expected unique, got {other:?}"),
        }
        assert_eq!(roster.reminders.len(), 1);
    }
}
