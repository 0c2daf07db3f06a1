//! Command table for the roster shell.
//!
//! Every command belongs to a [`CommandGroup`] (how `help` lays it out) and
//! declares what a leading number in its arguments points at, so the shell
//! can tell a list position from a phone number or an all-digit description.

use std::collections::BTreeMap;

use strsim::levenshtein;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Unknown words further than this from every command get no suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandGroup {
    Students,
    Homework,
    Payments,
    Attendance,
    Reminders,
    Storage,
    Settings,
    Shell,
}

impl CommandGroup {
    pub fn title(self) -> &'static str {
        match self {
            CommandGroup::Students => "Students",
            CommandGroup::Homework => "Homework",
            CommandGroup::Payments => "Payments",
            CommandGroup::Attendance => "Attendance & participation",
            CommandGroup::Reminders => "Reminders",
            CommandGroup::Storage => "Saving & loading",
            CommandGroup::Settings => "Settings",
            CommandGroup::Shell => "Shell",
        }
    }
}

/// What a numeric first argument refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    None,
    /// A row of the last `list` or `find` output.
    Student,
    /// A row of the `reminders` output.
    Reminder,
}

impl Position {
    pub fn explanation(self) -> Option<&'static str> {
        match self {
            Position::None => None,
            Position::Student => Some("<student#> is a row number from the last `list` or `find`."),
            Position::Reminder => Some("<reminder#> is a row number from `reminders`."),
        }
    }
}

pub struct CommandEntry {
    pub name: &'static str,
    pub group: CommandGroup,
    pub usage: &'static str,
    pub summary: &'static str,
    pub position: Position,
    pub aliases: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub fn new(
        name: &'static str,
        group: CommandGroup,
        usage: &'static str,
        summary: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            group,
            usage,
            summary,
            position: Position::None,
            aliases: &[],
            handler,
        }
    }

    pub fn positional(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// The argument part of the usage line, without the command name.
    pub fn argument_usage(&self) -> &'static str {
        self.usage
            .split_once(' ')
            .map(|(_, rest)| rest)
            .unwrap_or("")
    }
}

/// Commands in registration order, addressable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    words: BTreeMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry` unless its name or one of its aliases is already taken.
    pub fn register(&mut self, entry: CommandEntry) -> bool {
        let mut words = vec![entry.name];
        words.extend_from_slice(entry.aliases);
        if let Some(clash) = words.iter().find(|word| self.words.contains_key(*word)) {
            tracing::warn!(command = entry.name, word = *clash, "command word already registered");
            return false;
        }
        let index = self.entries.len();
        for word in words {
            self.words.insert(word, index);
        }
        self.entries.push(entry);
        true
    }

    /// Looks up a command by name or alias, ignoring case.
    pub fn resolve(&self, word: &str) -> Option<&CommandEntry> {
        self.words
            .get(word.to_lowercase().as_str())
            .map(|index| &self.entries[*index])
    }

    pub fn entries(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    /// Every name and alias, sorted.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.words.keys().copied()
    }

    /// Non-empty groups in display order, each with its commands in
    /// registration order.
    pub fn grouped(&self) -> Vec<(CommandGroup, Vec<&CommandEntry>)> {
        let mut groups: BTreeMap<CommandGroup, Vec<&CommandEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.group).or_default().push(entry);
        }
        groups.into_iter().collect()
    }

    /// The command name closest to a mistyped `input`, if any is close enough.
    /// Ties go to the command registered first.
    pub fn closest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        let mut best: Option<(usize, &'static str)> = None;
        for entry in &self.entries {
            let distance = std::iter::once(entry.name)
                .chain(entry.aliases.iter().copied())
                .map(|word| levenshtein(word, &needle))
                .min()
                .unwrap_or(usize::MAX);
            if best.map_or(true, |(current, _)| distance < current) {
                best = Some((distance, entry.name));
            }
        }
        best.filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .map(|(_, name)| name)
    }
}
