pub mod attendance_service;
pub mod homework_service;
pub mod participation_service;
pub mod payment_service;
pub mod reminder_service;
pub mod student_service;

pub use attendance_service::AttendanceService;
pub use homework_service::HomeworkService;
pub use participation_service::ParticipationService;
pub use payment_service::PaymentService;
pub use reminder_service::ReminderService;
pub use student_service::{StudentChanges, StudentService};

use uuid::Uuid;

use crate::domain::{Roster, Student};
use crate::errors::RosterError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Locked(String),
}

pub(crate) fn student_mut(roster: &mut Roster, id: Uuid) -> ServiceResult<&mut Student> {
    roster
        .student_mut(id)
        .ok_or_else(|| ServiceError::NotFound("Student not found".into()))
}

pub(crate) fn student(roster: &Roster, id: Uuid) -> ServiceResult<&Student> {
    roster
        .student(id)
        .ok_or_else(|| ServiceError::NotFound("Student not found".into()))
}
