mod common;

use common::{date, student, TODAY};
use roster_core::{
    core::{
        services::{
            AttendanceService, HomeworkService, ParticipationService, PaymentService,
            ReminderService, ServiceError, StudentChanges, StudentService,
        },
        Resolution,
    },
    domain::{AttendanceMark, BillingMonth, Roster, StudentName},
    errors::RosterError,
    reminder::{Description, DueDate, ReminderKind},
};
use uuid::Uuid;

fn text(raw: &str) -> Description {
    Description::new(raw).unwrap()
}

fn prepared_roster() -> (Roster, Vec<Uuid>) {
    let today = date(TODAY);
    let mut roster = Roster::new("Term 4");
    let mut ids = Vec::new();
    for (name, phone, lesson) in [
        ("Alex Yeoh", "91234567", "Mon 1600"),
        ("Bea Tan", "92222222", "Tue 1500"),
        ("Bea Lim", "93333333", "Tue 1500"),
    ] {
        let record = student(name, phone, lesson);
        ids.push(record.id);
        StudentService::add(&mut roster, record, today).unwrap();
    }
    (roster, ids)
}

fn kinds(roster: &Roster) -> Vec<ReminderKind> {
    roster
        .reminders
        .sorted_view()
        .iter()
        .map(|reminder| reminder.kind())
        .collect()
}

#[test]
fn every_unpaid_student_gets_one_payment_reminder() {
    let (roster, _) = prepared_roster();
    assert_eq!(kinds(&roster), vec![ReminderKind::Payment; 3]);
    let first = roster.reminders.sorted_view()[0].clone();
    assert_eq!(first.due().input_form(), "2026-10-31 2359");
}

#[test]
fn paying_and_unpaying_toggles_only_that_reminder() {
    let (mut roster, ids) = prepared_roster();
    let october = BillingMonth::of(date(TODAY));
    PaymentService::mark_paid(&mut roster, ids[0], october).unwrap();
    assert_eq!(roster.reminders.len(), 2);
    assert!(roster
        .reminders
        .iter()
        .all(|reminder| !reminder.description().as_str().contains("Alex Yeoh")));

    let again = PaymentService::mark_paid(&mut roster, ids[0], october).unwrap_err();
    assert!(matches!(again, ServiceError::Invalid(_)));

    PaymentService::mark_unpaid(&mut roster, ids[0], october, date(TODAY)).unwrap();
    assert_eq!(roster.reminders.len(), 3);
}

#[test]
fn paying_another_month_keeps_the_current_reminder() {
    let (mut roster, ids) = prepared_roster();
    let november = BillingMonth::parse("2026-11").unwrap();
    PaymentService::mark_paid(&mut roster, ids[0], november).unwrap();
    assert_eq!(roster.reminders.len(), 3);
}

#[test]
fn homework_reminders_follow_the_deadline_window() {
    let (mut roster, ids) = prepared_roster();
    let today = date(TODAY);
    HomeworkService::add(&mut roster, ids[1], text("Essay"), date("2026-10-20"), today).unwrap();
    HomeworkService::add(&mut roster, ids[1], text("Project"), date("2026-11-20"), today).unwrap();
    assert_eq!(
        kinds(&roster)
            .into_iter()
            .filter(|kind| *kind == ReminderKind::Homework)
            .count(),
        1
    );

    HomeworkService::mark_done(&mut roster, ids[1], 0).unwrap();
    assert!(!kinds(&roster).contains(&ReminderKind::Homework));

    // Nothing new is generated for homework outside the window on the next refresh.
    let report = roster.refresh_reminders(date("2026-10-21"));
    assert_eq!(report.homework_added, 0);
}

#[test]
fn system_reminders_are_locked_but_user_reminders_are_not() {
    let (mut roster, _) = prepared_roster();
    ReminderService::add(
        &mut roster,
        DueDate::parse("2026-10-25 0900").unwrap(),
        text("Book room"),
    )
    .unwrap();
    let view: Vec<_> = roster.reminders.sorted_view().into_iter().cloned().collect();
    let user_index = view
        .iter()
        .position(|reminder| reminder.kind() == ReminderKind::User)
        .unwrap();
    let payment_index = view
        .iter()
        .position(|reminder| reminder.kind() == ReminderKind::Payment)
        .unwrap();

    let locked = ReminderService::remove_at(&mut roster, payment_index).unwrap_err();
    assert!(matches!(locked, ServiceError::Locked(_)));
    let locked = ReminderService::edit(&mut roster, payment_index, None, Some(text("x")))
        .unwrap_err();
    assert!(matches!(locked, ServiceError::Locked(_)));

    let updated = ReminderService::edit(
        &mut roster,
        user_index,
        Some(DueDate::parse("2026-10-26").unwrap()),
        None,
    )
    .unwrap();
    assert_eq!(updated.description().as_str(), "Book room");
    assert_eq!(roster.reminders.len(), 4);
}

#[test]
fn duplicate_user_reminders_are_rejected() {
    let mut roster = Roster::new("dupes");
    let due = DueDate::parse("2026-10-25").unwrap();
    ReminderService::add(&mut roster, due, text("Book room")).unwrap();
    let err = ReminderService::add(
        &mut roster,
        DueDate::parse("2026-10-25 0000").unwrap(),
        text("Book room"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Roster(RosterError::DuplicateReminder(_))
    ));
}

#[test]
fn keyword_delete_never_guesses_between_exact_matches() {
    let (mut roster, ids) = prepared_roster();
    let today = date(TODAY);
    let keywords = vec!["Tue".to_string(), "1500".to_string()];
    let outcome = StudentService::remove_by_keyword(&mut roster, &ids, &keywords, today).unwrap();
    match outcome {
        Resolution::Ambiguous(found) => assert_eq!(found.len(), 2),
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert_eq!(roster.student_count(), 3);

    let keywords = vec!["bea".to_string(), "tan".to_string()];
    let outcome = StudentService::remove_by_keyword(&mut roster, &ids, &keywords, today).unwrap();
    assert!(outcome.is_unique());
    assert_eq!(roster.student_count(), 2);
    assert_eq!(roster.reminders.len(), 2);
}

#[test]
fn renaming_keeps_attendance_and_payment_state() {
    let (mut roster, ids) = prepared_roster();
    let today = date(TODAY);
    AttendanceService::record(&mut roster, ids[0], today, true).unwrap();
    ParticipationService::record(&mut roster, ids[0], today, 4).unwrap();

    let changes = StudentChanges {
        name: Some(StudentName::new("Alexander Yeoh").unwrap()),
        ..StudentChanges::default()
    };
    StudentService::edit(&mut roster, ids[0], changes, today).unwrap();

    assert_eq!(
        AttendanceService::lookup(&roster, ids[0], today).unwrap(),
        AttendanceMark::Present
    );
    assert!(roster
        .reminders
        .iter()
        .any(|reminder| reminder.description().as_str().ends_with("Alexander Yeoh")));
    assert_eq!(
        roster.students[0].participation.most_recent().map(|r| r.score),
        Some(4)
    );
}

#[test]
fn removing_a_student_drops_their_reminders() {
    let (mut roster, ids) = prepared_roster();
    let removed = StudentService::remove(&mut roster, ids[2], date(TODAY)).unwrap();
    assert_eq!(removed.name.as_str(), "Bea Lim");
    assert_eq!(roster.reminders.len(), 2);
    assert!(StudentService::remove(&mut roster, ids[2], date(TODAY)).is_err());
}

#[test]
fn finishing_one_of_two_identical_homeworks_keeps_the_reminder() {
    let (mut roster, ids) = prepared_roster();
    let today = date(TODAY);
    for _ in 0..2 {
        HomeworkService::add(&mut roster, ids[1], text("Essay"), date("2026-10-20"), today)
            .unwrap();
    }
    let homework_reminders = |roster: &Roster| {
        kinds(roster)
            .into_iter()
            .filter(|kind| *kind == ReminderKind::Homework)
            .count()
    };
    assert_eq!(homework_reminders(&roster), 1);

    HomeworkService::mark_done(&mut roster, ids[1], 1).unwrap();
    assert_eq!(homework_reminders(&roster), 1);

    HomeworkService::mark_done(&mut roster, ids[1], 0).unwrap();
    assert_eq!(homework_reminders(&roster), 0);
}

#[test]
fn names_are_stored_with_single_spaces() {
    let name = StudentName::new("Cy   Lim").unwrap();
    assert_eq!(name.as_str(), "Cy Lim");
    assert_eq!(name.to_string(), "Cy Lim");
}
