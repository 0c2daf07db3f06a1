use thiserror::Error;

/// Validation and identity failures raised by the roster domain types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Invalid date `{0}` (use YYYY-MM-DD or YYYY-MM-DD HHMM)")]
    InvalidDateFormat(String),
    #[error("Participation score {0} is out of range (0-5)")]
    InvalidScore(i64),
    #[error("Description must not be empty")]
    EmptyDescription,
    #[error("Invalid student name `{0}`")]
    InvalidName(String),
    #[error("Invalid phone number `{0}` (3-15 digits, optional leading +)")]
    InvalidPhone(String),
    #[error("Invalid lesson time `{0}` (use e.g. `Mon 1600`)")]
    InvalidLessonTime(String),
    #[error("Invalid month `{0}` (use YYYY-MM)")]
    InvalidMonth(String),
    #[error("Reminder already exists: {0}")]
    DuplicateReminder(String),
    #[error("Reminder not found: {0}")]
    ReminderNotFound(String),
}

/// Error type that captures persistence failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Roster not found: {0}")]
    NotFound(String),
    #[error("Corrupt roster data: {0}")]
    Corrupt(String),
}

impl From<RosterError> for StorageError {
    fn from(err: RosterError) -> Self {
        StorageError::Corrupt(err.to_string())
    }
}

/// Fatal shell errors. Command failures are reported inline and never reach
/// this type unless the shell itself cannot continue.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("input error: {0}")]
    Input(String),
    #[error("{0}")]
    Command(String),
}
