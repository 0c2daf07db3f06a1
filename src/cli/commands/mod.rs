pub mod attendance;
pub mod config;
pub mod homework;
pub mod payment;
pub mod reminder;
pub mod storage;
pub mod student;
pub mod system;

use crate::cli::core::{CommandError, ShellContext};
use crate::cli::registry::{CommandEntry, CommandRegistry, Position};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(student::definitions());
    commands.extend(homework::definitions());
    commands.extend(payment::definitions());
    commands.extend(attendance::definitions());
    commands.extend(reminder::definitions());
    commands.extend(storage::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

/// Fails with `message` unless at least `min` arguments were given.
pub(crate) fn require_args(args: &[&str], min: usize, message: &str) -> Result<(), CommandError> {
    if args.len() < min {
        Err(CommandError::InvalidArguments(message.to_string()))
    } else {
        Ok(())
    }
}

/// Reads a lone numeric argument as a row of the list `position` refers
/// to. Anything else, including a number past the end of that list, is left
/// for keyword matching so phones and all-digit descriptions still resolve.
pub(crate) fn visible_position(
    context: &ShellContext,
    position: Position,
    args: &[&str],
) -> Option<usize> {
    let [raw] = args else {
        return None;
    };
    let row = raw.trim().parse::<usize>().ok()?;
    let len = match position {
        Position::None => return None,
        Position::Student => context.visible_ids().len(),
        Position::Reminder => context.with_roster(|roster| roster.reminders.len()),
    };
    (1..=len).contains(&row).then(|| row - 1)
}

pub(crate) fn keywords(args: &[&str]) -> Vec<String> {
    args.iter()
        .map(|arg| arg.trim())
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads `field=value` pairs. Bare words extend the previous value so that
/// `lesson=Tue 1500` works without quotes.
pub(crate) fn field_pairs(args: &[&str]) -> Result<Vec<(String, String)>, CommandError> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for arg in args {
        match arg.split_once('=') {
            Some((field, value)) => pairs.push((field.trim().to_lowercase(), value.to_string())),
            None => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(arg);
                }
                None => {
                    return Err(CommandError::InvalidArguments(format!(
                        "Expected field=value, got `{}`",
                        arg
                    )))
                }
            },
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_registered_once() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.entries().map(|entry| entry.name).collect();
        for expected in [
            "list",
            "find",
            "show",
            "add-student",
            "edit-student",
            "delete-student",
            "add-homework",
            "mark-done",
            "mark-undone",
            "mark-paid",
            "mark-unpaid",
            "attendance",
            "participation",
            "reminders",
            "add-reminder",
            "edit-reminder",
            "delete-reminder",
            "save",
            "load",
            "backups",
            "restore",
            "config",
            "version",
            "help",
            "exit",
        ] {
            assert!(names.contains(&expected), "missing `{expected}`");
        }
        assert_eq!(names.len(), all_definitions().len());
    }
}
