use chrono::NaiveDate;
use diesel::prelude::*;

use crate::data::models::{
    DueQuestion, NewReviewSchedule, ReviewChanges, ReviewSchedule, StoreError,
};
use crate::schema::review_schedules;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Inserts one row and returns it with its generated `id`. The transaction
    /// only commits once the row has come back from the database.
    pub fn insert(
        conn: &mut SqliteConnection,
        record: &NewReviewSchedule<'_>,
    ) -> Result<ReviewSchedule, diesel::result::Error> {
        conn.transaction(|conn| {
            diesel::insert_into(review_schedules::table)
                .values(record)
                .returning(ReviewSchedule::as_returning())
                .get_result(conn)
        })
    }

    /// Active rows whose next pick date is exactly `day`, in storage order.
    pub fn due_on(
        conn: &mut SqliteConnection,
        day: NaiveDate,
    ) -> Result<Vec<DueQuestion>, diesel::result::Error> {
        review_schedules::table
            .filter(review_schedules::next_pick_date.eq(day))
            .filter(review_schedules::is_active.eq(true))
            .select(DueQuestion::as_select())
            .load(conn)
    }

    pub fn update_by_id(
        conn: &mut SqliteConnection,
        id: i32,
        changes: &ReviewChanges,
    ) -> Result<ReviewSchedule, StoreError> {
        diesel::update(review_schedules::table.find(id))
            .set(changes)
            .returning(ReviewSchedule::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or(StoreError::NotFound { id })
    }
}
