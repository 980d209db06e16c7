pub mod aggregate;
pub mod habits;
pub mod streak;

use crate::config::Config;
use crate::db::{Database, EntryRecord};
use aggregate::{EntryFilter, MONTH_NAMES, MoodCount};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use habits::HabitStatus;

/// Reference clock for "today". Injected so streak and monthly logic stay
/// deterministic under test and in the `summary --date` CLI path.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Fixed reference date, for reproducible summaries.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug)]
pub struct DashboardSummary {
    pub total_entries: u64,
    pub total_expenses: f64,
    pub streak: u32,
    pub top_mood: Option<String>,
    pub recent_entries: Vec<EntryRecord>,
}

#[derive(Debug)]
pub struct MonthBucket {
    pub month: &'static str,
    pub count: u32,
}

#[derive(Debug)]
pub struct HighlightReport {
    pub total_memories: u64,
    pub most_active_month: Option<&'static str>,
    pub top_mood: Option<String>,
    pub monthly_breakdown: Vec<MonthBucket>,
    pub mood_summary: Vec<MoodCount>,
}

pub fn dashboard_summary(
    database: &Database,
    clock: &dyn Clock,
    config: &Config,
    user_id: &str,
) -> Result<DashboardSummary> {
    let today = clock.today();
    let active_dates =
        database.distinct_entry_dates(user_id, config.streak_lookback_days, today)?;
    let streak = streak::current_streak(&active_dates, today);

    let entries = database.entries_for_user(user_id)?;
    let refs = entries.iter().collect::<Vec<_>>();
    let summary = aggregate::mood_summary(&refs);
    let top_mood = aggregate::top_mood(&summary).map(ToOwned::to_owned);

    Ok(DashboardSummary {
        total_entries: database.entry_count(user_id)?,
        total_expenses: database.expense_total(user_id)?,
        streak,
        top_mood,
        recent_entries: database.recent_entries(user_id, config.recent_entries_limit)?,
    })
}

/// Highlight view: totals, busiest month of the current year, and the mood
/// distribution, all under one optional filter applied before aggregation.
pub fn highlight_report(
    database: &Database,
    clock: &dyn Clock,
    user_id: &str,
    filter: &EntryFilter,
) -> Result<HighlightReport> {
    let entries = database.entries_for_user(user_id)?;
    let refs = filter.apply(&entries);

    let year = clock.today().year();
    let buckets = aggregate::monthly_breakdown(&refs, year);
    let most_active_month = aggregate::most_active_month(&buckets).map(|index| MONTH_NAMES[index]);

    let monthly_breakdown = MONTH_NAMES
        .into_iter()
        .zip(buckets)
        .map(|(month, count)| MonthBucket { month, count })
        .collect();

    let mood_summary = aggregate::mood_summary(&refs);
    let top_mood = aggregate::top_mood(&mood_summary).map(ToOwned::to_owned);

    Ok(HighlightReport {
        total_memories: refs.len() as u64,
        most_active_month,
        top_mood,
        monthly_breakdown,
        mood_summary,
    })
}

pub fn habit_overview(
    database: &Database,
    clock: &dyn Clock,
    user_id: &str,
) -> Result<Vec<HabitStatus>> {
    habits::habit_statuses(database, user_id, clock.today())
}
