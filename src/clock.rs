//! Clock capability.
//!
//! Streak and rollover semantics are defined over calendar days, so every
//! "what day is it" decision goes through an injected [`Clock`] instead of
//! reading the wall clock inline. Day boundaries are UTC days: a
//! completion belongs to whatever UTC date its timestamp falls on.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar day.
    fn today(&self) -> NaiveDate {
        calendar_day(self.now())
    }
}

/// Project an instant onto its calendar day.
pub fn calendar_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock pinned to a fixed instant, advanceable by whole days.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: std::sync::Arc<std::sync::Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Arc::new(std::sync::Mutex::new(now)),
        }
    }

    /// Pin the clock to noon UTC on the given day.
    pub fn on_day(day: NaiveDate) -> Self {
        let noon = day.and_hms_opt(12, 0, 0).expect("valid time");
        Self::at(DateTime::from_naive_utc_and_offset(noon, Utc))
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().expect("clock poisoned");
        *now += chrono::Duration::days(days);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().expect("clock poisoned");
        *now = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock poisoned")
    }
}
