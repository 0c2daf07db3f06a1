//! Student records and the per-student bounded collections derived from them.

pub mod attendance;
pub mod billing;
pub mod common;
pub mod homework;
pub mod lesson;
pub mod participation;
pub mod roster;
pub mod student;

pub use attendance::{AttendanceIndex, AttendanceMark};
pub use billing::BillingMonth;
pub use common::normalize_key;
pub use homework::Homework;
pub use lesson::LessonTime;
pub use participation::{ParticipationHistory, ParticipationRecord, HISTORY_CAPACITY};
pub use roster::Roster;
pub use student::{Phone, Student, StudentName};
