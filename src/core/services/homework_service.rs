use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Homework, Roster};
use crate::reminder::{Description, ReminderRegenerator};

use super::{student_mut, ServiceError, ServiceResult};

pub struct HomeworkService;

impl HomeworkService {
    pub fn add(
        roster: &mut Roster,
        student_id: Uuid,
        description: Description,
        deadline: NaiveDate,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        let student = student_mut(roster, student_id)?;
        student.homework.push(Homework::new(description, deadline));
        roster.refresh_reminders(today);
        roster.touch();
        Ok(())
    }

    /// Marks the homework at `index` done and drops its reminder, if any.
    pub fn mark_done(roster: &mut Roster, student_id: Uuid, index: usize) -> ServiceResult<()> {
        let student = student_mut(roster, student_id)?;
        let homework = student
            .homework
            .get_mut(index)
            .ok_or_else(|| missing_homework(index))?;
        if homework.done {
            return Err(ServiceError::Invalid("Homework already marked done".into()));
        }
        homework.done = true;
        let snapshot = homework.clone();
        // An identical pending item still needs the reminder they share.
        let shared = student.homework.iter().any(|other| {
            other.is_pending()
                && other.description == snapshot.description
                && other.deadline == snapshot.deadline
        });
        let owner = student.clone();
        let cleared = !shared
            && ReminderRegenerator::clear_homework(&mut roster.reminders, &owner, &snapshot);
        tracing::debug!(student = %owner.name, cleared, shared, "homework marked done");
        roster.touch();
        Ok(())
    }

    pub fn mark_undone(
        roster: &mut Roster,
        student_id: Uuid,
        index: usize,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        let student = student_mut(roster, student_id)?;
        let homework = student
            .homework
            .get_mut(index)
            .ok_or_else(|| missing_homework(index))?;
        if !homework.done {
            return Err(ServiceError::Invalid("Homework is not marked done".into()));
        }
        homework.done = false;
        roster.refresh_reminders(today);
        roster.touch();
        Ok(())
    }
}

fn missing_homework(index: usize) -> ServiceError {
    ServiceError::NotFound(format!("No homework at position {}", index + 1))
}
