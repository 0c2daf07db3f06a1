//! Text views of the roster: the student list, a student's detail card and
//! the reminder list.

use chrono::{NaiveDate, NaiveDateTime};
use colored::Colorize;
use uuid::Uuid;

use crate::cli::table::{Column, Table};
use crate::domain::{BillingMonth, ParticipationHistory, Roster, Student};
use crate::reminder::{DueStatus, Reminder, ReminderKind};

const DATE_FORMAT: &str = "%d %b %Y";

/// Day whose attendance the student list shows.
pub fn attendance_day(roster: &Roster, today: NaiveDate) -> NaiveDate {
    roster.attendance.current_ui_date().unwrap_or(today)
}

pub fn student_table(roster: &Roster, ids: &[Uuid], today: NaiveDate) -> Table {
    let day = attendance_day(roster, today);
    let month = BillingMonth::of(today);
    let mut table = Table::new(vec![
        Column::right("#"),
        Column::left("Name").max(28),
        Column::left("Phone"),
        Column::left("Lesson"),
        Column::left("Paid"),
        Column::right("HW"),
        Column::left("Attendance"),
        Column::left("Participation"),
    ]);
    let students = ids.iter().filter_map(|id| roster.student(*id));
    for (position, student) in students.enumerate() {
        let paid = if student.has_paid(month) {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        };
        table.push(vec![
            (position + 1).to_string(),
            student.name.to_string(),
            student.phone.to_string(),
            student.lesson_time.to_string(),
            paid,
            student.pending_homework().count().to_string(),
            roster
                .attendance
                .lookup(student.name.as_str(), day)
                .label()
                .to_string(),
            participation_slots(&student.participation),
        ]);
    }
    table
}

/// The five history slots, oldest first, with `-` for empty slots.
pub fn participation_slots(history: &ParticipationHistory) -> String {
    history
        .padded_view()
        .iter()
        .map(|slot| slot.map_or_else(|| "-".to_string(), |record| record.score.to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn student_detail(roster: &Roster, student: &Student, today: NaiveDate) -> Vec<String> {
    let mut lines = vec![
        format!("  Phone        : {}", student.phone),
        format!("  Lesson       : {}", student.lesson_time),
    ];

    let months: Vec<String> = student
        .paid_months
        .iter()
        .rev()
        .map(BillingMonth::label)
        .collect();
    lines.push(format!(
        "  Paid months  : {}",
        if months.is_empty() {
            "none".to_string()
        } else {
            months.join(", ")
        }
    ));

    let (present, marked) = roster.attendance.summary_for(student.name.as_str());
    lines.push(format!(
        "  Attendance   : {} ({} of {} marked days present this session)",
        roster
            .attendance
            .lookup(student.name.as_str(), attendance_day(roster, today))
            .label(),
        present,
        marked
    ));

    lines.push(format!(
        "  Participation: {}{}",
        participation_slots(&student.participation),
        student
            .participation
            .average()
            .map(|avg| format!(" (average {:.1})", avg))
            .unwrap_or_default()
    ));

    if student.homework.is_empty() {
        lines.push("  Homework     : none".into());
    } else {
        lines.push("  Homework     :".into());
        for (position, homework) in student.homework.iter().enumerate() {
            let state = if homework.done {
                "done".green().to_string()
            } else if homework.deadline < today {
                "overdue".red().to_string()
            } else {
                "pending".to_string()
            };
            lines.push(format!(
                "    {}. {} (due {}) [{}]",
                position + 1,
                homework.description,
                homework.deadline.format(DATE_FORMAT),
                state
            ));
        }
    }
    lines
}

pub fn reminder_table(reminders: &[&Reminder], reference: NaiveDateTime, soon: i64) -> Table {
    let mut table = Table::new(vec![
        Column::right("#"),
        Column::left("Due"),
        Column::left("Description").max(60),
        Column::left("Type"),
        Column::left("Status"),
    ]);
    for (position, reminder) in reminders.iter().enumerate() {
        let status = match reminder.due().status(reference, soon) {
            DueStatus::Overdue => "overdue".red().bold().to_string(),
            DueStatus::DueSoon => "due soon".yellow().to_string(),
            DueStatus::Upcoming => String::new(),
        };
        let kind = match reminder.kind() {
            ReminderKind::User => reminder.kind().label().to_string(),
            system => format!("{} (auto)", system.label()),
        };
        table.push(vec![
            (position + 1).to_string(),
            reminder.due().to_string(),
            reminder.description().to_string(),
            kind,
            status,
        ]);
    }
    table
}
