use crate::db::{Database, HabitRow};
use anyhow::Result;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct HabitStatus {
    pub habit: HabitRow,
    pub completed_today: bool,
}

/// Completion state for each active habit on `reference` day.
///
/// A habit counts as completed only when a log row exists for the exact
/// `(habit_id, date)` key and it is marked completed. A missing log is
/// "not completed", never an error.
pub fn habit_statuses(
    database: &Database,
    user_id: &str,
    reference: NaiveDate,
) -> Result<Vec<HabitStatus>> {
    database
        .active_habits(user_id)?
        .into_iter()
        .map(|habit| {
            let completed_today = database
                .habit_log(habit.id, reference)?
                .map(|log| log.is_completed)
                .unwrap_or(false);

            Ok(HabitStatus {
                habit,
                completed_today,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::habit_statuses;
    use crate::db::Database;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn missing_log_means_not_completed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = Database::open(&dir.path().join("test.db")).expect("open db");
        database.insert_user("u1", "Test User").expect("user");
        database.insert_habit("u1", "meditate").expect("habit");

        let statuses = habit_statuses(&database, "u1", date(2024, 1, 5)).expect("statuses");
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].completed_today);
    }

    #[test]
    fn incomplete_log_today_is_not_completed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = Database::open(&dir.path().join("test.db")).expect("open db");
        database.insert_user("u1", "Test User").expect("user");
        let habit_id = database.insert_habit("u1", "meditate").expect("habit");
        let today = date(2024, 1, 5);
        database
            .upsert_habit_log(habit_id, today, false)
            .expect("log");

        let statuses = habit_statuses(&database, "u1", today).expect("statuses");
        assert!(!statuses[0].completed_today);
    }

    #[test]
    fn completed_log_on_another_day_does_not_leak() {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = Database::open(&dir.path().join("test.db")).expect("open db");
        database.insert_user("u1", "Test User").expect("user");
        let habit_id = database.insert_habit("u1", "meditate").expect("habit");
        database
            .upsert_habit_log(habit_id, date(2024, 1, 4), true)
            .expect("log");

        let statuses = habit_statuses(&database, "u1", date(2024, 1, 5)).expect("statuses");
        assert!(!statuses[0].completed_today);
    }

    #[test]
    fn completed_log_today_is_completed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = Database::open(&dir.path().join("test.db")).expect("open db");
        database.insert_user("u1", "Test User").expect("user");
        let habit_id = database.insert_habit("u1", "meditate").expect("habit");
        let today = date(2024, 1, 5);
        database
            .upsert_habit_log(habit_id, today, true)
            .expect("log");

        let statuses = habit_statuses(&database, "u1", today).expect("statuses");
        assert!(statuses[0].completed_today);
    }
}
