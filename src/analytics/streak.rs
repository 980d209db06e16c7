use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Current consecutive-day activity streak.
///
/// `active_dates` is the distinct set of calendar days with at least one
/// entry, sorted most-recent first. The streak anchors on today, or on
/// yesterday as a grace day so a user is not penalized before logging
/// today's entry. A latest date older than yesterday means the streak is
/// broken.
pub fn current_streak(active_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&latest) = active_dates.first() else {
        return 0;
    };

    let yesterday = today - Duration::days(1);
    let anchor = if latest == today {
        today
    } else if latest == yesterday {
        yesterday
    } else {
        return 0;
    };

    let active: HashSet<NaiveDate> = active_dates.iter().copied().collect();

    let mut streak = 0;
    let mut cursor = anchor;
    while active.contains(&cursor) {
        streak += 1;
        cursor = cursor - Duration::days(1);
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::current_streak;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn descending(dates: &[NaiveDate]) -> Vec<NaiveDate> {
        let mut sorted = dates.to_vec();
        sorted.sort_by(|left, right| right.cmp(left));
        sorted
    }

    #[test]
    fn empty_date_set_has_no_streak() {
        assert_eq!(current_streak(&[], date(2024, 1, 5)), 0);
    }

    #[test]
    fn five_consecutive_days_ending_today() {
        let dates = descending(&[
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 3),
            date(2024, 1, 4),
            date(2024, 1, 5),
        ]);
        assert_eq!(current_streak(&dates, date(2024, 1, 5)), 5);
    }

    #[test]
    fn gap_before_yesterday_breaks_streak() {
        let dates = descending(&[date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert_eq!(current_streak(&dates, date(2024, 1, 5)), 0);
    }

    #[test]
    fn yesterday_only_counts_as_grace_day() {
        let dates = vec![date(2024, 1, 4)];
        assert_eq!(current_streak(&dates, date(2024, 1, 5)), 1);
    }

    #[test]
    fn run_ending_yesterday_keeps_full_length() {
        let dates = descending(&[date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4)]);
        assert_eq!(current_streak(&dates, date(2024, 1, 5)), 3);
    }

    #[test]
    fn only_today_yields_one() {
        let dates = vec![date(2024, 1, 5)];
        assert_eq!(current_streak(&dates, date(2024, 1, 5)), 1);
    }

    #[test]
    fn streak_stops_at_first_missing_day() {
        // 5th, 4th, then a hole on the 3rd; the 2nd must not count.
        let dates = descending(&[date(2024, 1, 2), date(2024, 1, 4), date(2024, 1, 5)]);
        assert_eq!(current_streak(&dates, date(2024, 1, 5)), 2);
    }

    #[test]
    fn streak_spans_month_boundary() {
        let dates = descending(&[date(2024, 1, 30), date(2024, 1, 31), date(2024, 2, 1)]);
        assert_eq!(current_streak(&dates, date(2024, 2, 1)), 3);
    }
}
