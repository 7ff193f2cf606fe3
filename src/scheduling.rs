use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Source of the current instant. Swapped out in tests to simulate day boundaries.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Computes review dates in a single fixed timezone.
#[derive(Clone)]
pub struct DatePolicy {
    zone: Tz,
    clock: Arc<dyn Clock>,
}

impl DatePolicy {
    pub fn new(zone: Tz, clock: Arc<dyn Clock>) -> Self {
        Self { zone, clock }
    }

    pub fn system(zone: Tz) -> Self {
        Self::new(zone, Arc::new(SystemClock))
    }

    /// Calendar date in the fixed zone, ignoring both UTC and server-local time.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.zone).date_naive()
    }

    /// Wall-clock time in the fixed zone, without an offset attached.
    pub fn now_local(&self) -> NaiveDateTime {
        self.clock.now().with_timezone(&self.zone).naive_local()
    }

    /// `today + offset_days`. Zero and negative offsets are allowed; `None` only
    /// when the result falls outside the calendar chrono can represent.
    pub fn next_pick_date(&self, offset_days: i64) -> Option<NaiveDate> {
        let today = self.today();
        let magnitude = Days::new(offset_days.unsigned_abs());
        if offset_days >= 0 {
            today.checked_add_days(magnitude)
        } else {
            today.checked_sub_days(magnitude)
        }
    }
}

#[cfg(test)]
pub use manual::ManualClock;
