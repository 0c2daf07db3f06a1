use crate::cli::core::{parse_index, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{raw as output_raw, section as output_section};
use crate::cli::registry::{CommandEntry, CommandGroup, Position};
use crate::cli::render;
use crate::core::resolver::Resolution;
use crate::core::services::ReminderService;
use crate::reminder::{Description, DueDate};

use super::{field_pairs, keywords, require_args, visible_position};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "reminders",
            CommandGroup::Reminders,
            "reminders",
            "Show reminders, soonest first",
            cmd_reminders,
        ),
        CommandEntry::new(
            "add-reminder",
            CommandGroup::Reminders,
            "add-reminder <YYYY-MM-DD|\"YYYY-MM-DD HHMM\"> <description>",
            "Add a reminder",
            cmd_add_reminder,
        ),
        CommandEntry::new(
            "edit-reminder",
            CommandGroup::Reminders,
            "edit-reminder <reminder#> [due=<YYYY-MM-DD [HHMM]>] [desc=<description>]",
            "Change a reminder's due date or description",
            cmd_edit_reminder,
        )
        .positional(Position::Reminder),
        CommandEntry::new(
            "delete-reminder",
            CommandGroup::Reminders,
            "delete-reminder <reminder#> | delete-reminder <keyword>...",
            "Delete a reminder by position or keyword",
            cmd_delete_reminder,
        )
        .positional(Position::Reminder),
    ]
}

fn cmd_reminders(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let reference = context.reference_instant();
    let soon = context.config.due_soon_days;
    let table = context.with_roster(|roster| {
        let view = roster.reminders.sorted_view();
        if view.is_empty() {
            None
        } else {
            Some(render::reminder_table(&view, reference, soon))
        }
    });
    match table {
        Some(table) => {
            output_section("Reminders");
            output_raw(table.render());
        }
        None => io::print_info("No reminders."),
    }
    Ok(())
}

/// Splits `<due> <description...>`. A time of day only counts when it is
/// quoted together with the date, so a description may start with digits.
fn split_due(args: &[&str]) -> Result<(DueDate, Description), CommandError> {
    let (due, rest) = args.split_first().ok_or_else(|| {
        CommandError::InvalidArguments("add-reminder needs a due date".into())
    })?;
    Ok((DueDate::parse(due)?, Description::new(rest.join(" "))?))
}

fn cmd_add_reminder(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "add-reminder needs a due date and a description")?;
    let (due, description) = split_due(args)?;
    let summary = format!("{} (due {})", description, due);
    context.mutate(|roster, _| Ok(ReminderService::add(roster, due, description)?))?;
    io::print_success(format!("Reminder added: {}", summary));
    Ok(())
}

fn cmd_edit_reminder(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "edit-reminder needs a position and at least one change")?;
    let index = parse_index(args[0], "reminder")?;
    let mut due = None;
    let mut description = None;
    for (field, value) in field_pairs(&args[1..])? {
        match field.as_str() {
            "due" | "date" => due = Some(DueDate::parse(&value)?),
            "desc" | "description" => description = Some(Description::new(&value)?),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "Unknown field `{}` (expected due or desc)",
                    other
                )))
            }
        }
    }
    let updated =
        context.mutate(|roster, _| Ok(ReminderService::edit(roster, index, due, description)?))?;
    io::print_success(format!("Reminder updated: {}", updated));
    Ok(())
}

fn cmd_delete_reminder(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "delete-reminder needs a position or a keyword")?;
    if let Some(index) = visible_position(context, Position::Reminder, args) {
        let removed = context.mutate(|roster, _| Ok(ReminderService::remove_at(roster, index)?))?;
        io::print_success(format!("Deleted reminder: {}", removed));
        return Ok(());
    }

    let keywords = keywords(args);
    let resolution =
        context.mutate(|roster, _| Ok(ReminderService::remove_by_keyword(roster, &keywords)?))?;
    match resolution {
        Resolution::Unique(removed) => {
            io::print_success(format!("Deleted reminder: {}", removed));
        }
        Resolution::NoMatch => {
            io::print_warning(format!(
                "No editable reminder matches `{}`.",
                keywords.join(" ")
            ));
        }
        Resolution::Ambiguous(candidates) => {
            io::print_warning("More than one reminder matches; nothing was deleted.");
            for candidate in &candidates {
                io::print_info(format!("  {}", candidate));
            }
            io::print_hint("Use the exact due date or description, or a list position.");
        }
    }
    Ok(())
}
