use std::collections::HashSet;

use super::record::Reminder;
use crate::errors::RosterError;

/// Structurally-unique set of reminders.
///
/// The list never caches an ordering: [`ReminderList::sorted_view`] sorts the
/// current contents on every call.
#[derive(Debug, Clone, Default)]
pub struct ReminderList {
    entries: HashSet<Reminder>,
}

impl ReminderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, reminder: &Reminder) -> bool {
        self.entries.contains(reminder)
    }

    /// Returns the stored record that is structurally equal to `reminder`.
    pub fn get(&self, reminder: &Reminder) -> Option<&Reminder> {
        self.entries.get(reminder)
    }

    pub fn add(&mut self, reminder: Reminder) -> Result<(), RosterError> {
        if self.entries.contains(&reminder) {
            return Err(RosterError::DuplicateReminder(reminder.to_string()));
        }
        self.entries.insert(reminder);
        Ok(())
    }

    pub fn replace(&mut self, old: &Reminder, new: Reminder) -> Result<(), RosterError> {
        if !self.entries.contains(old) {
            return Err(RosterError::ReminderNotFound(old.to_string()));
        }
        if &new != old && self.entries.contains(&new) {
            return Err(RosterError::DuplicateReminder(new.to_string()));
        }
        self.entries.remove(old);
        self.entries.insert(new);
        Ok(())
    }

    pub fn remove(&mut self, reminder: &Reminder) -> Result<Reminder, RosterError> {
        self.entries
            .take(reminder)
            .ok_or_else(|| RosterError::ReminderNotFound(reminder.to_string()))
    }

    /// Removes every reminder matching `predicate`, returning how many were dropped.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Reminder) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|reminder| !predicate(reminder));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Ascending by due date, ties broken by description.
    pub fn sorted_view(&self) -> Vec<&Reminder> {
        let mut view: Vec<&Reminder> = self.entries.iter().collect();
        view.sort_by(|a, b| {
            a.due()
                .cmp(b.due())
                .then_with(|| a.description().as_str().cmp(b.description().as_str()))
        });
        view
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.entries.iter()
    }
}

impl From<Vec<Reminder>> for ReminderList {
    fn from(reminders: Vec<Reminder>) -> Self {
        Self {
            entries: reminders.into_iter().collect(),
        }
    }
}

impl From<ReminderList> for Vec<Reminder> {
    fn from(list: ReminderList) -> Self {
        list.sorted_view().into_iter().cloned().collect()
    }
}
