use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{BillingMonth, Roster};
use crate::reminder::ReminderRegenerator;

use super::{student_mut, ServiceError, ServiceResult};

pub struct PaymentService;

impl PaymentService {
    /// Records `month` as paid. The matching payment reminder, if one was
    /// generated, is removed; other reminders are untouched.
    pub fn mark_paid(
        roster: &mut Roster,
        student_id: Uuid,
        month: BillingMonth,
    ) -> ServiceResult<()> {
        let student = student_mut(roster, student_id)?;
        if !student.paid_months.insert(month) {
            return Err(ServiceError::Invalid(format!(
                "{} has already paid for {}",
                student.name,
                month.label()
            )));
        }
        let owner = student.clone();
        ReminderRegenerator::clear_payment(&mut roster.reminders, &owner, month);
        tracing::info!(student = %owner.name, %month, "payment recorded");
        roster.touch();
        Ok(())
    }

    pub fn mark_unpaid(
        roster: &mut Roster,
        student_id: Uuid,
        month: BillingMonth,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        let student = student_mut(roster, student_id)?;
        if !student.paid_months.remove(&month) {
            return Err(ServiceError::Invalid(format!(
                "{} has no payment recorded for {}",
                student.name,
                month.label()
            )));
        }
        roster.refresh_reminders(today);
        roster.touch();
        Ok(())
    }
}
