use crate::cli::core::{parse_date, parse_index, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::{CommandEntry, CommandGroup, Position};
use crate::core::services::HomeworkService;
use crate::reminder::Description;

use super::require_args;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add-homework",
            CommandGroup::Homework,
            "add-homework <student#> <YYYY-MM-DD> <description>",
            "Assign homework to a student",
            cmd_add_homework,
        )
        .positional(Position::Student),
        CommandEntry::new(
            "mark-done",
            CommandGroup::Homework,
            "mark-done <student#> <homework#>",
            "Mark a student's homework as done",
            cmd_mark_done,
        )
        .positional(Position::Student),
        CommandEntry::new(
            "mark-undone",
            CommandGroup::Homework,
            "mark-undone <student#> <homework#>",
            "Reopen a student's completed homework",
            cmd_mark_undone,
        )
        .positional(Position::Student),
    ]
}

fn cmd_add_homework(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(
        args,
        3,
        "add-homework needs a student, a deadline and a description",
    )?;
    let id = context.student_id_at(args[0])?;
    let deadline = parse_date(args[1])?;
    let description = Description::new(args[2..].join(" "))?;
    let summary = format!("{} (due {})", description, deadline.format("%d %b %Y"));
    context.mutate(|roster, today| {
        Ok(HomeworkService::add(roster, id, description, deadline, today)?)
    })?;
    io::print_success(format!("Homework added: {}", summary));
    Ok(())
}

fn cmd_mark_done(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "mark-done needs a student and a homework position")?;
    let id = context.student_id_at(args[0])?;
    let index = parse_index(args[1], "homework")?;
    context.mutate(|roster, _| Ok(HomeworkService::mark_done(roster, id, index)?))?;
    io::print_success(format!("Homework {} marked done.", index + 1));
    Ok(())
}

fn cmd_mark_undone(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "mark-undone needs a student and a homework position")?;
    let id = context.student_id_at(args[0])?;
    let index = parse_index(args[1], "homework")?;
    context.mutate(|roster, today| Ok(HomeworkService::mark_undone(roster, id, index, today)?))?;
    io::print_success(format!("Homework {} is pending again.", index + 1));
    Ok(())
}
