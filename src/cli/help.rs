use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};

/// One section per command group.
pub fn print_overview(registry: &CommandRegistry) {
    for (group, entries) in registry.grouped() {
        output_section(group.title());
        for entry in entries {
            io::print_info(format!("  {:<16} {}", entry.name, entry.summary));
        }
    }
    io::print_hint(
        "Numbers in commands are row numbers from the last `list`, `find` or `reminders`.",
    );
    io::print_hint("Use `help <command>` for the arguments a command takes.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("{} ({})", entry.name, entry.group.title()));
    for line in command_lines(entry) {
        io::print_info(line);
    }
}

fn command_lines(entry: &CommandEntry) -> Vec<String> {
    let mut lines = vec![
        format!("  {}", entry.summary),
        format!("  Usage: {}", entry.usage),
    ];
    if !entry.aliases.is_empty() {
        lines.push(format!("  Also typed as: {}", entry.aliases.join(", ")));
    }
    if let Some(explanation) = entry.position.explanation() {
        lines.push(format!("  {}", explanation));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn student_commands_explain_row_numbers() {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let lines = command_lines(registry.resolve("mark-paid").unwrap());
        assert!(lines.iter().any(|line| line.contains("Usage: mark-paid")));
        assert!(lines.iter().any(|line| line.contains("last `list` or `find`")));

        let lines = command_lines(registry.resolve("exit").unwrap());
        assert!(lines.iter().any(|line| line.contains("Also typed as: quit")));
        assert!(!lines.iter().any(|line| line.contains("row number")));
    }
}
