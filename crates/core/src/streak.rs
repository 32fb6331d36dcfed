//! Logging streak over a fixed window of days.

use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// Entry counts for the `window_days` days ending today, plus the current streak.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreakSummary {
    pub today: NaiveDate,
    pub window_days: u32,
    /// One element per window day, oldest first.
    pub days: Vec<(NaiveDate, usize)>,
    /// Consecutive logged days ending today, or ending yesterday while today is still empty.
    pub current_streak: u32,
    /// Window days with at least one entry.
    pub logged_days: u32,
}

impl StreakSummary {
    pub fn compute(
        entry_dates: impl IntoIterator<Item = NaiveDate>,
        today: NaiveDate,
        window_days: u32,
    ) -> Self {
        let window_days = window_days.max(1);
        let start = today
            .checked_sub_days(Days::new(u64::from(window_days - 1)))
            .unwrap_or(NaiveDate::MIN);

        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for date in entry_dates {
            if date >= start && date <= today {
                *counts.entry(date).or_default() += 1;
            }
        }

        let days: Vec<(NaiveDate, usize)> = start
            .iter_days()
            .take_while(|date| *date <= today)
            .map(|date| (date, counts.get(&date).copied().unwrap_or(0)))
            .collect();

        let logged_days = days.iter().filter(|(_, count)| *count > 0).count() as u32;

        let mut run = days.iter().rev().peekable();
        if matches!(run.peek(), Some((_, 0))) {
            // Today has nothing yet; the streak is still alive if yesterday was logged.
            run.next();
        }
        let current_streak = run.take_while(|(_, count)| *count > 0).count() as u32;

        Self {
            today,
            window_days,
            days,
            current_streak,
            logged_days,
        }
    }

    /// True once every day of the window has been logged in an unbroken run.
    pub fn is_complete(&self) -> bool {
        self.current_streak >= self.window_days
    }

    pub fn logged_today(&self) -> bool {
        matches!(self.days.last(), Some((date, count)) if *date == self.today && *count > 0)
    }

    pub fn days_remaining(&self) -> u32 {
        self.window_days.saturating_sub(self.current_streak)
    }
}
