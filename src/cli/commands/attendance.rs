use chrono::NaiveDate;
use uuid::Uuid;

use crate::cli::core::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandGroup, Position};
use crate::cli::render;
use crate::core::services::{AttendanceService, ParticipationService};

use super::{require_args, student::print_students};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "attendance",
            CommandGroup::Attendance,
            "attendance <student#> <present|absent> [YYYY-MM-DD] | attendance <YYYY-MM-DD>",
            "Mark a student present or absent, or pick the day `list` shows",
            cmd_attendance,
        )
        .positional(Position::Student),
        CommandEntry::new(
            "participation",
            CommandGroup::Attendance,
            "participation <student#> [<score> [YYYY-MM-DD]]",
            "Record a participation score (0-5) or show a student's history",
            cmd_participation,
        )
        .positional(Position::Student),
    ]
}

fn date_or_today(context: &ShellContext, raw: Option<&&str>) -> Result<NaiveDate, CommandError> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(context.today()),
    }
}

fn cmd_attendance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "attendance needs a student position or a date")?;

    if args.len() == 1 {
        if let Ok(day) = parse_date(args[0]) {
            context
                .manager_mut()
                .roster_mut()
                .attendance
                .set_current_ui_date(day);
            print_students(context, "Students");
            return Ok(());
        }
        let id = context.student_id_at(args[0])?;
        let today = context.today();
        let (name, mark, (present, marked), day) = context.with_roster(|roster| {
            let day = render::attendance_day(roster, today);
            let student = roster.student(id);
            (
                student.map(|s| s.name.to_string()).unwrap_or_default(),
                AttendanceService::lookup(roster, id, day),
                student
                    .map(|s| roster.attendance.summary_for(s.name.as_str()))
                    .unwrap_or_default(),
                day,
            )
        });
        io::print_info(format!(
            "{} on {}: {} ({} of {} marked days present this session)",
            name,
            day.format("%d %b %Y"),
            mark?.label(),
            present,
            marked
        ));
        return Ok(());
    }

    let id = context.student_id_at(args[0])?;
    let present = match args[1].to_lowercase().as_str() {
        "present" | "p" | "yes" => true,
        "absent" | "a" | "no" => false,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "`{}` is not present/absent",
                other
            )))
        }
    };
    let day = date_or_today(context, args.get(2))?;
    // Attendance is session state; nothing is written to disk.
    AttendanceService::record(context.manager_mut().roster_mut(), id, day, present)?;
    io::print_success(format!(
        "Marked {} on {}.",
        if present { "present" } else { "absent" },
        day.format("%d %b %Y")
    ));
    Ok(())
}

fn cmd_participation(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "participation needs a student position")?;
    let id = context.student_id_at(args[0])?;

    let Some(raw_score) = args.get(1) else {
        return show_participation(context, id);
    };
    let score: i64 = raw_score.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{}` is not a whole number", raw_score))
    })?;
    let day = date_or_today(context, args.get(2))?;
    context.mutate(|roster, _| Ok(ParticipationService::record(roster, id, day, score)?))?;
    io::print_success(format!(
        "Participation {} recorded for {}.",
        score,
        day.format("%d %b %Y")
    ));
    Ok(())
}

fn show_participation(context: &ShellContext, id: Uuid) -> CommandResult {
    let lines = context.with_roster(|roster| {
        roster.student(id).map(|student| {
            let mut lines: Vec<String> = student
                .participation
                .iter()
                .map(|record| {
                    format!("  {}  {}", record.date.format("%d %b %Y"), record.score)
                })
                .collect();
            lines.push(match student.participation.average() {
                Some(avg) => format!("  Average: {:.1}", avg),
                None => "  No participation recorded yet.".to_string(),
            });
            (student.name.to_string(), lines)
        })
    });
    let (name, lines) =
        lines.ok_or_else(|| CommandError::Message("Student not found".into()))?;
    output_section(format!("Participation: {}", name));
    for line in lines {
        io::print_info(line);
    }
    Ok(())
}
