//! Streak engine.
//!
//! Completion days accumulate in an append-only per-user log. The log
//! tolerates duplicate rows at the storage layer; the engine deduplicates
//! by day before using it and refuses to apply a second streak increment
//! for a day already recorded. The duplicate check and the streak update
//! run under the per-user lock as one unit, so concurrent completions for
//! the same day serialize and increment at most once.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::Result;
use crate::storage::Storage;

/// Default bound on the completion history returned by [`StreakEngine::summary`].
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Default rolling-window length for [`StreakEngine::last_n_days`].
pub const DEFAULT_WINDOW_DAYS: usize = 7;

/// Per-user streak state, upserted on every recorded completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakRecord {
    pub user_id: String,
    pub current_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
}

impl StreakRecord {
    fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            current_streak: 0,
            last_completed_date: None,
        }
    }
}

/// One row of the append-only completion log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletedDay {
    pub date: NaiveDate,
}

/// Read model returned by [`StreakEngine::summary`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
    /// Deduplicated completion days, most recent first, bounded.
    pub completed_dates: Vec<NaiveDate>,
}

/// One day of the rolling window.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DayMark {
    pub day: NaiveDate,
    pub completed: bool,
}

#[derive(Clone)]
pub struct StreakEngine {
    storage: Storage,
    clock: Arc<dyn Clock>,
    history_limit: usize,
}

impl StreakEngine {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>, history_limit: usize) -> Self {
        Self {
            storage,
            clock,
            history_limit,
        }
    }

    /// Record a completion for `day` and update the streak.
    ///
    /// A day already in the log is a no-op: no duplicate row, no second
    /// increment. Otherwise the day is appended and the streak
    /// recomputed against the previous `last_completed_date`:
    /// consecutive day extends the streak, a gap resets it to 1.
    pub fn record_completion(&self, user_id: &str, day: NaiveDate) -> Result<()> {
        let _lock = self.storage.lock_user(user_id)?;

        let recorded = self.recorded_days(user_id)?;
        if recorded.contains(&day) {
            return Ok(());
        }

        self.storage
            .append_jsonl(&self.storage.completed_log(user_id), &CompletedDay { date: day })?;

        let mut record = self.load_record(user_id)?;
        match record.last_completed_date {
            None => record.current_streak = 1,
            Some(last) => {
                let gap = (day - last).num_days();
                if gap == 1 {
                    record.current_streak += 1;
                } else if gap > 1 {
                    record.current_streak = 1;
                } else {
                    // Same-day gaps are excluded by the dedup above; an
                    // earlier day means the log and record disagree.
                    // Inconsistent input, not a crash.
                    tracing::warn!(
                        user_id,
                        %day,
                        %last,
                        "completion day not after last recorded day; streak unchanged"
                    );
                }
            }
        }
        record.last_completed_date = Some(day);

        self.storage
            .write_json(&self.storage.streak_file(user_id), &record)?;

        Ok(())
    }

    /// Streak record plus bounded, deduplicated completion history.
    pub fn summary(&self, user_id: &str) -> Result<StreakSummary> {
        let record = self.load_record(user_id)?;
        let recorded = self.recorded_days(user_id)?;

        // BTreeSet iterates ascending; most recent first, then bound.
        let completed_dates: Vec<NaiveDate> = recorded
            .into_iter()
            .rev()
            .take(self.history_limit)
            .collect();

        Ok(StreakSummary {
            current_streak: record.current_streak,
            last_completed_date: record.last_completed_date,
            completed_dates,
        })
    }

    /// Today and the `n - 1` preceding days in chronological order, each
    /// flagged against the completion log. Pure projection.
    pub fn last_n_days(&self, user_id: &str, n: usize) -> Result<Vec<DayMark>> {
        let recorded = self.recorded_days(user_id)?;
        let today = self.clock.today();

        let mut window = Vec::with_capacity(n);
        for offset in (0..n as i64).rev() {
            let day = today - chrono::Duration::days(offset);
            window.push(DayMark {
                day,
                completed: recorded.contains(&day),
            });
        }

        Ok(window)
    }

    fn load_record(&self, user_id: &str) -> Result<StreakRecord> {
        Ok(self
            .storage
            .read_json(&self.storage.streak_file(user_id))?
            .unwrap_or_else(|| StreakRecord::empty(user_id)))
    }

    fn recorded_days(&self, user_id: &str) -> Result<BTreeSet<NaiveDate>> {
        let entries: Vec<CompletedDay> = self
            .storage
            .read_jsonl(&self.storage.completed_log(user_id))?;
        Ok(entries.into_iter().map(|entry| entry.date).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
    use tempfile::TempDir;

    fn day(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    fn engine(temp: &TempDir, clock: FixedClock) -> StreakEngine {
        let storage = Storage::new(temp.path().to_path_buf(), DEFAULT_LOCK_TIMEOUT_MS);
        StreakEngine::new(storage, Arc::new(clock), DEFAULT_HISTORY_LIMIT)
    }

    #[test]
    fn first_completion_starts_streak_at_one() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, FixedClock::on_day(day("2024-01-01")));

        engine.record_completion("u1", day("2024-01-01")).unwrap();

        let summary = engine.summary("u1").unwrap();
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.last_completed_date, Some(day("2024-01-01")));
    }

    #[test]
    fn duplicate_day_increments_once() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, FixedClock::on_day(day("2024-01-01")));

        engine.record_completion("u1", day("2024-01-01")).unwrap();
        engine.record_completion("u1", day("2024-01-01")).unwrap();

        let summary = engine.summary("u1").unwrap();
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.completed_dates, vec![day("2024-01-01")]);
    }

    #[test]
    fn consecutive_days_increment_and_gap_resets() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, FixedClock::on_day(day("2024-01-04")));

        engine.record_completion("u1", day("2024-01-01")).unwrap();
        assert_eq!(engine.summary("u1").unwrap().current_streak, 1);

        engine.record_completion("u1", day("2024-01-02")).unwrap();
        assert_eq!(engine.summary("u1").unwrap().current_streak, 2);

        // Day 3 skipped; the streak breaks back to 1.
        engine.record_completion("u1", day("2024-01-04")).unwrap();
        let summary = engine.summary("u1").unwrap();
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.last_completed_date, Some(day("2024-01-04")));
    }

    #[test]
    fn earlier_day_leaves_streak_unchanged() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, FixedClock::on_day(day("2024-01-05")));

        engine.record_completion("u1", day("2024-01-04")).unwrap();
        engine.record_completion("u1", day("2024-01-05")).unwrap();
        assert_eq!(engine.summary("u1").unwrap().current_streak, 2);

        // Backdated completion: recorded in the log, streak untouched.
        engine.record_completion("u1", day("2024-01-02")).unwrap();
        let summary = engine.summary("u1").unwrap();
        assert_eq!(summary.current_streak, 2);
        assert!(summary.completed_dates.contains(&day("2024-01-02")));
    }

    #[test]
    fn summary_deduplicates_storage_level_duplicates() {
        let temp = TempDir::new().unwrap();
        let clock = FixedClock::on_day(day("2024-01-02"));
        let engine = engine(&temp, clock);

        // Seed duplicate rows directly, below the engine's dedup guard.
        let storage = Storage::new(temp.path().to_path_buf(), DEFAULT_LOCK_TIMEOUT_MS);
        for date in [day("2024-01-01"), day("2024-01-01"), day("2024-01-02")] {
            storage
                .append_jsonl(&storage.completed_log("u1"), &CompletedDay { date })
                .unwrap();
        }

        let summary = engine.summary("u1").unwrap();
        assert_eq!(
            summary.completed_dates,
            vec![day("2024-01-02"), day("2024-01-01")]
        );
    }

    #[test]
    fn summary_bounds_history() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().to_path_buf(), DEFAULT_LOCK_TIMEOUT_MS);
        let engine = StreakEngine::new(
            storage,
            Arc::new(FixedClock::on_day(day("2024-03-01"))),
            5,
        );

        let start = day("2024-01-01");
        for offset in 0..10 {
            engine
                .record_completion("u1", start + chrono::Duration::days(offset))
                .unwrap();
        }

        let summary = engine.summary("u1").unwrap();
        assert_eq!(summary.completed_dates.len(), 5);
        assert_eq!(summary.completed_dates[0], day("2024-01-10"));
        assert_eq!(summary.current_streak, 10);
    }

    #[test]
    fn window_always_has_exactly_n_entries() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, FixedClock::on_day(day("2024-02-10")));

        // Sparse log: only two completions inside the window.
        engine.record_completion("u1", day("2024-02-05")).unwrap();
        engine.record_completion("u1", day("2024-02-09")).unwrap();

        let window = engine.last_n_days("u1", DEFAULT_WINDOW_DAYS).unwrap();
        assert_eq!(window.len(), 7);
        assert_eq!(window.first().unwrap().day, day("2024-02-04"));
        assert_eq!(window.last().unwrap().day, day("2024-02-10"));

        let completed: Vec<NaiveDate> = window
            .iter()
            .filter(|mark| mark.completed)
            .map(|mark| mark.day)
            .collect();
        assert_eq!(completed, vec![day("2024-02-05"), day("2024-02-09")]);
    }

    #[test]
    fn window_for_empty_log_is_all_incomplete() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, FixedClock::on_day(day("2024-02-10")));

        let window = engine.last_n_days("u1", 7).unwrap();
        assert_eq!(window.len(), 7);
        assert!(window.iter().all(|mark| !mark.completed));
    }

    #[test]
    fn summary_for_unknown_user_is_empty() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp, FixedClock::on_day(day("2024-02-10")));

        let summary = engine.summary("nobody").unwrap();
        assert_eq!(summary.current_streak, 0);
        assert_eq!(summary.last_completed_date, None);
        assert!(summary.completed_dates.is_empty());
    }
}
