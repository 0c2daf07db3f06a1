use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{raw as output_raw, section as output_section};
use crate::cli::registry::{CommandEntry, CommandGroup, Position};
use crate::cli::render;
use crate::core::resolver::Resolution;
use crate::core::services::{StudentChanges, StudentService};
use crate::domain::{LessonTime, Phone, Student, StudentName};

use super::{field_pairs, keywords, require_args, visible_position};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "list",
            CommandGroup::Students,
            "list",
            "Show every student",
            cmd_list,
        )
        .aliases(&["ls"]),
        CommandEntry::new(
            "find",
            CommandGroup::Students,
            "find <keyword>...",
            "Show students whose name, phone or lesson time contains a keyword",
            cmd_find,
        ),
        CommandEntry::new(
            "show",
            CommandGroup::Students,
            "show <student#>",
            "Show a student's homework, payments and participation",
            cmd_show,
        )
        .positional(Position::Student),
        CommandEntry::new(
            "add-student",
            CommandGroup::Students,
            "add-student <name> <phone> <day> <HHMM>",
            "Add a student",
            cmd_add_student,
        ),
        CommandEntry::new(
            "edit-student",
            CommandGroup::Students,
            "edit-student <student#> [name=<name>] [phone=<phone>] [lesson=<day HHMM>]",
            "Change a student's name, phone or lesson time",
            cmd_edit_student,
        )
        .positional(Position::Student),
        CommandEntry::new(
            "delete-student",
            CommandGroup::Students,
            "delete-student <student#> | delete-student <keyword>...",
            "Delete a student by position or keyword",
            cmd_delete_student,
        )
        .positional(Position::Student),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.filter = None;
    print_students(context, "Students");
    Ok(())
}

fn cmd_find(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "find needs at least one keyword")?;
    let keywords = keywords(args);
    let ids = context.with_roster(|roster| {
        StudentService::find(roster, &keywords)
            .into_iter()
            .map(|student| student.id)
            .collect::<Vec<_>>()
    });
    let found = ids.len();
    context.filter = Some(ids);
    if found == 0 {
        io::print_info(format!("No students match `{}`.", keywords.join(" ")));
        io::print_hint("Use `list` to show every student again.");
        return Ok(());
    }
    print_students(context, &format!("{} student(s) found", found));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "show needs a student position")?;
    let id = context.student_id_at(args[0])?;
    let today = context.today();
    let (name, lines) = context.with_roster(|roster| {
        roster
            .student(id)
            .map(|student| {
                (
                    student.name.to_string(),
                    render::student_detail(roster, student, today),
                )
            })
            .ok_or_else(|| CommandError::Message("Student not found".into()))
    })?;
    output_section(name);
    output_raw(lines.join("\n"));
    Ok(())
}

fn cmd_add_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(
        args,
        3,
        "add-student needs a name, a phone number and a lesson time",
    )?;
    let student = Student::new(
        StudentName::new(args[0])?,
        Phone::new(args[1])?,
        LessonTime::parse(&args[2..].join(" "))?,
    );
    let name = student.name.to_string();
    context.mutate(|roster, today| Ok(StudentService::add(roster, student, today)?))?;
    context.filter = None;
    io::print_success(format!("Added student {}.", name));
    Ok(())
}

fn cmd_edit_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "edit-student needs a position and at least one change")?;
    let id = context.student_id_at(args[0])?;
    let changes = parse_changes(&args[1..])?;
    context.mutate(|roster, today| Ok(StudentService::edit(roster, id, changes, today)?))?;
    let name = context.with_roster(|roster| roster.student(id).map(|s| s.name.to_string()));
    io::print_success(format!(
        "Updated {}.",
        name.unwrap_or_else(|| "student".into())
    ));
    Ok(())
}

fn parse_changes(args: &[&str]) -> Result<StudentChanges, CommandError> {
    let pairs = field_pairs(args)?;
    let mut changes = StudentChanges::default();
    for (field, value) in pairs {
        match field.as_str() {
            "name" => changes.name = Some(StudentName::new(&value)?),
            "phone" => changes.phone = Some(Phone::new(&value)?),
            "lesson" | "time" => changes.lesson_time = Some(LessonTime::parse(&value)?),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "Unknown field `{}` (expected name, phone or lesson)",
                    other
                )))
            }
        }
    }
    Ok(changes)
}

fn cmd_delete_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "delete-student needs a position or a keyword")?;
    if let Some(index) = visible_position(context, Position::Student, args) {
        return delete_by_position(context, index);
    }

    let keywords = keywords(args);
    let scope = context.visible_ids();
    let resolution = context.mutate(|roster, today| {
        Ok(StudentService::remove_by_keyword(
            roster, &scope, &keywords, today,
        )?)
    })?;
    match resolution {
        Resolution::Unique(student) => {
            forget(context, &student);
            io::print_success(format!("Deleted student {}.", student.name));
        }
        Resolution::NoMatch => {
            io::print_warning(format!("No student matches `{}`.", keywords.join(" ")));
        }
        Resolution::Ambiguous(candidates) => {
            io::print_warning("More than one student matches; nothing was deleted.");
            for candidate in &candidates {
                io::print_info(format!(
                    "  {} ({}, {})",
                    candidate.name, candidate.phone, candidate.lesson_time
                ));
            }
            io::print_hint("Use the exact name, phone or lesson time, or a list position.");
        }
    }
    Ok(())
}

fn delete_by_position(context: &mut ShellContext, index: usize) -> CommandResult {
    let id = context.visible_ids()[index];
    let name = context
        .with_roster(|roster| roster.student(id).map(|student| student.name.to_string()))
        .unwrap_or_default();
    if context.mode == CliMode::Interactive
        && !io::confirm_action(&context.theme, &format!("Delete {}?", name), false)?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    let removed = context.mutate(|roster, today| Ok(StudentService::remove(roster, id, today)?))?;
    forget(context, &removed);
    io::print_success(format!("Deleted student {}.", removed.name));
    Ok(())
}

fn forget(context: &mut ShellContext, student: &Student) {
    if let Some(ids) = context.filter.as_mut() {
        ids.retain(|id| *id != student.id);
    }
}

pub(crate) fn print_students(context: &ShellContext, title: &str) {
    let ids = context.visible_ids();
    if ids.is_empty() {
        io::print_info("No students yet. Use `add-student` to add one.");
        return;
    }
    let today = context.today();
    let (day, table) = context.with_roster(|roster| {
        (
            render::attendance_day(roster, today),
            render::student_table(roster, &ids, today),
        )
    });
    output_section(format!("{} (attendance for {})", title, day.format("%d %b %Y")));
    output_raw(table.render());
}
