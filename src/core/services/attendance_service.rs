use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{AttendanceMark, Roster};

use super::{student, ServiceResult};

pub struct AttendanceService;

impl AttendanceService {
    /// Upserts the mark for `date` and moves the list cursor to it.
    pub fn record(
        roster: &mut Roster,
        student_id: Uuid,
        date: NaiveDate,
        present: bool,
    ) -> ServiceResult<()> {
        let name = student(roster, student_id)?.name.clone();
        roster.attendance.record(name.as_str(), date, present);
        roster.attendance.set_current_ui_date(date);
        tracing::debug!(student = %name, %date, present, "attendance recorded");
        Ok(())
    }

    pub fn lookup(
        roster: &Roster,
        student_id: Uuid,
        date: NaiveDate,
    ) -> ServiceResult<AttendanceMark> {
        let student = student(roster, student_id)?;
        Ok(roster.attendance.lookup(student.name.as_str(), date))
    }
}
