//! Reminder value model, the structurally-unique reminder list and the
//! regeneration pass that keeps system reminders in step with student state.

pub mod due_date;
pub mod list;
pub mod record;
pub mod regenerator;

pub use due_date::{DueDate, DueStatus, DUE_SOON_DAYS};
pub use list::ReminderList;
pub use record::{Description, Reminder, ReminderKind};
pub use regenerator::{RefreshReport, RegenerationCollision, ReminderRegenerator};
