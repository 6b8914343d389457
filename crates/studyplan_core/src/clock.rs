//! crates/studyplan_core/src/clock.rs
//!
//! The ambient "current time" modelled as an explicit capability, so every
//! date-relative computation stays deterministic under test.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar date; all scheduling comparisons are date-only.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to midnight on one date. Used by tests and date-shifted
/// plan previews.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }
}
