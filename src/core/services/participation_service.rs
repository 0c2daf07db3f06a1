use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::Roster;

use super::{student_mut, ServiceResult};

pub struct ParticipationService;

impl ParticipationService {
    /// Records a participation score for `date`. A score already recorded for
    /// the same date is replaced and becomes the newest entry.
    pub fn record(
        roster: &mut Roster,
        student_id: Uuid,
        date: NaiveDate,
        score: i64,
    ) -> ServiceResult<()> {
        let student = student_mut(roster, student_id)?;
        student.participation.add(date, score)?;
        tracing::debug!(student = %student.name, %date, score, "participation recorded");
        roster.attendance.set_current_ui_date(date);
        roster.touch();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{
        fixtures::{date, roster_with},
        ServiceError,
    };
    use crate::errors::RosterError;

    #[test]
    fn out_of_range_score_leaves_history_untouched() {
        let (mut roster, ids) = roster_with(&["Alex Yeoh"]);
        let err =
            ParticipationService::record(&mut roster, ids[0], date("2026-10-19"), 6).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Roster(RosterError::InvalidScore(6))
        ));
        assert!(roster.students[0].participation.is_empty());
        assert_eq!(roster.attendance.current_ui_date(), None);
    }

    #[test]
    fn history_keeps_five_newest() {
        let (mut roster, ids) = roster_with(&["Alex Yeoh"]);
        for day in 1..=6 {
            let when = date(&format!("2026-10-0{day}"));
            ParticipationService::record(&mut roster, ids[0], when, day as i64 % 6).unwrap();
        }
        let history = &roster.students[0].participation;
        assert_eq!(history.len(), 5);
        assert_eq!(history.iter().next().map(|r| r.date), Some(date("2026-10-02")));
        assert_eq!(history.most_recent().map(|r| r.score), Some(0));
        assert_eq!(roster.attendance.current_ui_date(), Some(date("2026-10-06")));
    }
}
