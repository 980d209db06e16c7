use crate::db::EntryRecord;
use chrono::Datelike;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Tag whose presence marks an entry as a favorite.
pub const FAVORITE_TAG: &str = "favorite";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Optional narrowing predicate, applied before any aggregation.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub mood: Option<String>,
    pub favorite: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &EntryRecord) -> bool {
        if let Some(mood) = &self.mood {
            if !entry.mood.eq_ignore_ascii_case(mood) {
                return false;
            }
        }

        if self.favorite && !entry.tags.iter().any(|tag| tag == FAVORITE_TAG) {
            return false;
        }

        if let Some(start) = self.start_date {
            if entry.occurred_on < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if entry.occurred_on > end {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, entries: &'a [EntryRecord]) -> Vec<&'a EntryRecord> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MoodCount {
    pub mood: String,
    pub count: u32,
}

/// Entry counts per calendar month of `year`, zero-filled Jan through Dec.
pub fn monthly_breakdown(entries: &[&EntryRecord], year: i32) -> [u32; 12] {
    entries
        .iter()
        .filter(|entry| entry.occurred_on.year() == year)
        .fold([0u32; 12], |mut buckets, entry| {
            buckets[entry.occurred_on.month0() as usize] += 1;
            buckets
        })
}

/// Index of the busiest month, `None` when every bucket is zero. Ties go to
/// the earliest month for determinism.
pub fn most_active_month(buckets: &[u32; 12]) -> Option<usize> {
    let (index, max) = buckets
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best: Option<(usize, u32)>, (index, count)| {
            match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((index, count)),
            }
        })?;

    (max > 0).then_some(index)
}

/// Occurrence counts per mood label, sorted non-increasing by count with
/// label order breaking ties.
pub fn mood_summary(entries: &[&EntryRecord]) -> Vec<MoodCount> {
    let counts = entries.iter().fold(HashMap::new(), |mut acc, entry| {
        let entry_mood = entry.mood.trim();
        let slot = acc.entry(entry_mood.to_string()).or_insert(0u32);
        *slot += 1;
        acc
    });

    let mut summary = counts
        .into_iter()
        .map(|(mood, count)| MoodCount { mood, count })
        .collect::<Vec<_>>();

    summary.sort_by(|left, right| {
        right
            .count
            .cmp(&left.count)
            .then_with(|| left.mood.cmp(&right.mood))
    });

    summary
}

pub fn top_mood(summary: &[MoodCount]) -> Option<&str> {
    summary.first().map(|entry| entry.mood.as_str())
}

/// Display glyph for a mood label; unknown labels fall back to a generic one.
pub fn mood_glyph(mood: &str) -> &'static str {
    match mood.trim().to_lowercase().as_str() {
        "happy" => "😊",
        "sad" => "😢",
        "angry" => "😠",
        "excited" => "🤩",
        "calm" => "😌",
        "anxious" => "😰",
        "tired" => "😴",
        "grateful" => "🙏",
        "loved" => "🥰",
        "neutral" => "😐",
        _ => "🙂",
    }
}
