use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::RosterError;

/// Number of participation entries kept per student.
pub const HISTORY_CAPACITY: usize = 5;
pub const MAX_SCORE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub date: NaiveDate,
    pub score: u8,
}

/// Chronological participation scores, at most one per date and at most
/// [`HISTORY_CAPACITY`] entries, oldest first.
///
/// Re-recording a date moves that entry to the newest position, which changes
/// which entry is evicted next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<Option<ParticipationRecord>>",
    into = "Vec<ParticipationRecord>"
)]
pub struct ParticipationHistory {
    entries: VecDeque<ParticipationRecord>,
}

impl ParticipationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, date: NaiveDate, score: i64) -> Result<(), RosterError> {
        let score = u8::try_from(score)
            .ok()
            .filter(|value| *value <= MAX_SCORE)
            .ok_or(RosterError::InvalidScore(score))?;
        self.entries.retain(|record| record.date != date);
        self.entries.push_back(ParticipationRecord { date, score });
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn most_recent(&self) -> Option<&ParticipationRecord> {
        self.entries.back()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&ParticipationRecord> {
        self.entries.iter().find(|record| record.date == date)
    }

    /// Exactly [`HISTORY_CAPACITY`] slots, oldest to newest, with empty
    /// leading slots when fewer entries exist.
    pub fn padded_view(&self) -> [Option<&ParticipationRecord>; HISTORY_CAPACITY] {
        let mut slots: [Option<&ParticipationRecord>; HISTORY_CAPACITY] =
            [None; HISTORY_CAPACITY];
        let offset = HISTORY_CAPACITY - self.entries.len();
        for (idx, record) in self.entries.iter().enumerate() {
            slots[offset + idx] = Some(record);
        }
        slots
    }

    pub fn average(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let total: u32 = self.entries.iter().map(|record| record.score as u32).sum();
        Some(total as f64 / self.entries.len() as f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipationRecord> {
        self.entries.iter()
    }
}

impl TryFrom<Vec<Option<ParticipationRecord>>> for ParticipationHistory {
    type Error = RosterError;

    fn try_from(records: Vec<Option<ParticipationRecord>>) -> Result<Self, Self::Error> {
        let mut history = ParticipationHistory::new();
        for record in records.into_iter().flatten() {
            history.add(record.date, record.score as i64)?;
        }
        Ok(history)
    }
}

impl From<ParticipationHistory> for Vec<ParticipationRecord> {
    fn from(history: ParticipationHistory) -> Self {
        history.entries.into_iter().collect()
    }
}
