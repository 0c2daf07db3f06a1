use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reminder::Description;

/// A homework item assigned to a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    pub description: Description,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub done: bool,
}

impl Homework {
    pub fn new(description: Description, deadline: NaiveDate) -> Self {
        Self {
            description,
            deadline,
            done: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.done
    }
}
