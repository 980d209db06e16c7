pub mod queries;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rusqlite::{Connection, params};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct EntryRecord {
    pub id: i64,
    pub occurred_on: NaiveDate,
    pub mood: String,
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HabitRow {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct HabitLogRow {
    pub habit_id: i64,
    pub log_date: NaiveDate,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create DB directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite DB: {}", path.display()))?;

        let database = Self { conn };
        database.init_schema()?;

        Ok(database)
    }

    pub fn init_schema(&self) -> Result<()> {
        queries::schema_statements()
            .iter()
            .try_for_each(|statement| {
                self.conn
                    .execute(statement, [])
                    .context("Failed to initialize schema")
                    .map(|_| ())
            })
    }

    pub fn user_exists(&self, user_id: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .ok();

        Ok(found.is_some())
    }

    pub fn insert_user(&self, user_id: &str, display_name: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO users (id, display_name) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET display_name=excluded.display_name",
                params![user_id, display_name],
            )
            .context("Failed to insert user")?;

        Ok(())
    }

    pub fn insert_entry(
        &mut self,
        user_id: &str,
        occurred_on: NaiveDate,
        mood: &str,
        title: &str,
        body: &str,
        tags: &[&str],
    ) -> Result<i64> {
        let transaction = self
            .conn
            .transaction()
            .context("Failed to start transaction")?;

        transaction
            .execute(
                "INSERT INTO entries (user_id, occurred_on, mood, title, body) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user_id, occurred_on, mood, title, body],
            )
            .context("Failed to insert entry")?;
        let entry_id = transaction.last_insert_rowid();

        tags.iter().try_for_each(|tag| {
            transaction
                .execute(
                    "INSERT OR IGNORE INTO entry_tags (entry_id, tag_name) VALUES (?1, ?2)",
                    params![entry_id, tag],
                )
                .context("Failed to insert entry tag")
                .map(|_| ())
        })?;

        transaction.commit().context("Failed to commit entry")?;
        Ok(entry_id)
    }

    /// Distinct calendar days with at least one entry, most recent first,
    /// bounded to a lookback window ending at `reference`.
    pub fn distinct_entry_dates(
        &self,
        user_id: &str,
        lookback_days: u32,
        reference: NaiveDate,
    ) -> Result<Vec<NaiveDate>> {
        let cutoff = reference - Duration::days(i64::from(lookback_days));
        let mut statement = self.conn.prepare(
            "SELECT DISTINCT occurred_on FROM entries
             WHERE user_id = ?1 AND occurred_on >= ?2
             ORDER BY occurred_on DESC",
        )?;

        let dates = statement
            .query_map(params![user_id, cutoff], |row| row.get(0))?
            .collect::<Result<Vec<NaiveDate>, _>>()
            .context("Failed to query entry dates")?;

        Ok(dates)
    }

    pub fn entries_for_user(&self, user_id: &str) -> Result<Vec<EntryRecord>> {
        self.query_entries(
            "SELECT e.id, e.occurred_on, e.mood, e.title,
                    COALESCE(GROUP_CONCAT(t.tag_name, ','), '')
             FROM entries e
             LEFT JOIN entry_tags t ON t.entry_id = e.id
             WHERE e.user_id = ?1
             GROUP BY e.id
             ORDER BY e.occurred_on DESC, e.id DESC",
            params![user_id],
        )
    }

    pub fn recent_entries(&self, user_id: &str, limit: usize) -> Result<Vec<EntryRecord>> {
        self.query_entries(
            "SELECT e.id, e.occurred_on, e.mood, e.title,
                    COALESCE(GROUP_CONCAT(t.tag_name, ','), '')
             FROM entries e
             LEFT JOIN entry_tags t ON t.entry_id = e.id
             WHERE e.user_id = ?1
             GROUP BY e.id
             ORDER BY e.occurred_on DESC, e.id DESC
             LIMIT ?2",
            params![user_id, limit as i64],
        )
    }

    fn query_entries(
        &self,
        sql: &str,
        parameters: impl rusqlite::Params,
    ) -> Result<Vec<EntryRecord>> {
        let mut statement = self.conn.prepare(sql)?;

        let rows = statement
            .query_map(parameters, |row| {
                let joined_tags: String = row.get(4)?;
                Ok(EntryRecord {
                    id: row.get(0)?,
                    occurred_on: row.get(1)?,
                    mood: row.get(2)?,
                    title: row.get(3)?,
                    tags: split_tags(&joined_tags),
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query entries")?;

        Ok(rows)
    }

    pub fn entry_count(&self, user_id: &str) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM entries WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .context("Failed to count entries")?;

        Ok(count.max(0) as u64)
    }

    pub fn insert_transaction(
        &self,
        user_id: &str,
        occurred_on: NaiveDate,
        kind: TransactionKind,
        amount: f64,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO transactions (user_id, occurred_on, kind, amount) VALUES (?1, ?2, ?3, ?4)",
                params![user_id, occurred_on, kind.as_str(), amount],
            )
            .context("Failed to insert transaction")?;

        Ok(())
    }

    pub fn expense_total(&self, user_id: &str) -> Result<f64> {
        let total: f64 = self
            .conn
            .query_row(
                "SELECT COALESCE(SUM(amount), 0) FROM transactions
                 WHERE user_id = ?1 AND kind = 'expense'",
                params![user_id],
                |row| row.get(0),
            )
            .context("Failed to sum expenses")?;

        Ok(total)
    }

    pub fn insert_habit(&self, user_id: &str, name: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO habits (user_id, name) VALUES (?1, ?2)",
                params![user_id, name],
            )
            .context("Failed to insert habit")?;

        Ok(self.conn.last_insert_rowid())
    }

    pub fn set_habit_active(&self, habit_id: i64, is_active: bool) -> Result<()> {
        self.conn
            .execute(
                "UPDATE habits SET is_active = ?2 WHERE id = ?1",
                params![habit_id, is_active],
            )
            .context("Failed to update habit")?;

        Ok(())
    }

    pub fn active_habits(&self, user_id: &str) -> Result<Vec<HabitRow>> {
        let mut statement = self.conn.prepare(
            "SELECT id, name, is_active FROM habits
             WHERE user_id = ?1 AND is_active = 1
             ORDER BY id ASC",
        )?;

        let rows = statement
            .query_map(params![user_id], |row| {
                Ok(HabitRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    is_active: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query habits")?;

        Ok(rows)
    }

    pub fn habit_log(&self, habit_id: i64, date: NaiveDate) -> Result<Option<HabitLogRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT habit_id, log_date, is_completed FROM habit_logs
                 WHERE habit_id = ?1 AND log_date = ?2",
                params![habit_id, date],
                |row| {
                    Ok(HabitLogRow {
                        habit_id: row.get(0)?,
                        log_date: row.get(1)?,
                        is_completed: row.get(2)?,
                    })
                },
            )
            .ok();

        Ok(row)
    }

    /// Create-or-flip on the natural key `(habit_id, log_date)`. The read
    /// side (`habit_log`) uses the same date-only key.
    pub fn upsert_habit_log(
        &self,
        habit_id: i64,
        log_date: NaiveDate,
        is_completed: bool,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO habit_logs (habit_id, log_date, is_completed)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(habit_id, log_date)
                 DO UPDATE SET is_completed=excluded.is_completed",
                params![habit_id, log_date, is_completed],
            )
            .context("Failed to upsert habit log")?;

        Ok(())
    }

    pub fn user_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .context("Failed to count users")?;

        Ok(count.max(0) as u64)
    }
}

fn split_tags(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Database, TransactionKind};
    use chrono::NaiveDate;

    fn open_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("temp dir");
        let database = Database::open(&dir.path().join("test.db")).expect("open db");
        database.insert_user("u1", "Test User").expect("user");
        (dir, database)
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn distinct_dates_collapse_same_day_and_sort_descending() {
        let (_dir, mut database) = open_test_db();
        let day = date(2024, 1, 5);
        database
            .insert_entry("u1", day, "happy", "morning", "", &[])
            .expect("entry");
        database
            .insert_entry("u1", day, "calm", "evening", "", &[])
            .expect("entry");
        database
            .insert_entry("u1", date(2024, 1, 3), "sad", "", "", &[])
            .expect("entry");

        let dates = database
            .distinct_entry_dates("u1", 365, day)
            .expect("dates");
        assert_eq!(dates, vec![day, date(2024, 1, 3)]);
    }

    #[test]
    fn distinct_dates_respect_lookback_window() {
        let (_dir, mut database) = open_test_db();
        let today = date(2024, 6, 1);
        database
            .insert_entry("u1", date(2023, 1, 1), "happy", "", "", &[])
            .expect("entry");
        database
            .insert_entry("u1", today, "happy", "", "", &[])
            .expect("entry");

        let dates = database
            .distinct_entry_dates("u1", 30, today)
            .expect("dates");
        assert_eq!(dates, vec![today]);
    }

    #[test]
    fn entry_tags_round_trip() {
        let (_dir, mut database) = open_test_db();
        database
            .insert_entry(
                "u1",
                date(2024, 2, 10),
                "excited",
                "trip",
                "",
                &["travel", "favorite"],
            )
            .expect("entry");

        let entries = database.entries_for_user("u1").expect("entries");
        assert_eq!(entries.len(), 1);
        let mut tags = entries[0].tags.clone();
        tags.sort();
        assert_eq!(tags, vec!["favorite", "travel"]);
    }

    #[test]
    fn habit_log_upsert_flips_completion() {
        let (_dir, database) = open_test_db();
        let habit_id = database.insert_habit("u1", "exercise").expect("habit");
        let day = date(2024, 3, 1);

        database
            .upsert_habit_log(habit_id, day, true)
            .expect("upsert");
        database
            .upsert_habit_log(habit_id, day, false)
            .expect("upsert");

        let log = database
            .habit_log(habit_id, day)
            .expect("query")
            .expect("log exists");
        assert!(!log.is_completed);
        assert_eq!(log.habit_id, habit_id);
        assert_eq!(log.log_date, day);
    }

    #[test]
    fn expense_total_ignores_income() {
        let (_dir, database) = open_test_db();
        let day = date(2024, 4, 1);
        database
            .insert_transaction("u1", day, TransactionKind::Expense, 12.5)
            .expect("tx");
        database
            .insert_transaction("u1", day, TransactionKind::Expense, 7.5)
            .expect("tx");
        database
            .insert_transaction("u1", day, TransactionKind::Income, 100.0)
            .expect("tx");

        let total = database.expense_total("u1").expect("total");
        assert!((total - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn inactive_habits_are_excluded() {
        let (_dir, database) = open_test_db();
        let keep = database.insert_habit("u1", "read").expect("habit");
        let drop = database.insert_habit("u1", "run").expect("habit");
        database.set_habit_active(drop, false).expect("deactivate");

        let habits = database.active_habits("u1").expect("habits");
        assert_eq!(habits.len(), 1);
        assert_eq!(habits[0].id, keep);
    }
}
