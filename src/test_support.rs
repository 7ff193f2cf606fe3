use std::sync::Arc;

use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use diesel::prelude::*;

use crate::{
    config::DEFAULT_TIMEZONE,
    data::models::ReviewSchedule,
    db::{self, DbPool},
    router,
    scheduling::{DatePolicy, ManualClock},
    schema::review_schedules,
    state::AppState,
};

/// Router over a private in-memory database with a hand-driven clock.
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    pub clock: Arc<ManualClock>,
    dates: DatePolicy,
}

impl TestApp {
    /// 04:00 UTC, mid-morning in the default zone.
    pub fn new() -> Self {
        Self::at_utc(2024, 5, 1, 4, 0)
    }

    pub fn at_utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        let now = Utc
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .unwrap();
        let clock = Arc::new(ManualClock::at(now));
        let dates = DatePolicy::new(DEFAULT_TIMEZONE, clock.clone());
        // One connection: every `:memory:` connection is its own database.
        let pool = db::init_pool(":memory:", 1).unwrap();
        let router = router::app(AppState::new(pool.clone(), dates.clone()));
        Self {
            router,
            pool,
            clock,
            dates,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.dates.today()
    }

    pub fn snapshot(&self) -> Vec<ReviewSchedule> {
        let mut conn = self.pool.get().unwrap();
        review_schedules::table
            .order(review_schedules::id)
            .select(ReviewSchedule::as_select())
            .load(&mut conn)
            .unwrap()
    }

    pub fn row_count(&self) -> usize {
        self.snapshot().len()
    }

    pub fn drop_table(&self) {
        let mut conn = self.pool.get().unwrap();
        diesel::sql_query("DROP TABLE review_schedules")
            .execute(&mut conn)
            .unwrap();
    }
}
