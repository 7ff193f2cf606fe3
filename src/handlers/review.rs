use axum::extract::{Json, Path, State};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use validator::Validate;

use crate::{
    data::models::{
        ApiError, CreateReviewRequest, DueQuestion, NewReviewSchedule, ReviewChanges,
        ReviewSchedule, StoreError, UpdateReviewRequest,
    },
    data::repositories::ReviewRepository,
    db,
    scheduling::DatePolicy,
    state::AppState,
};

fn pick_date(dates: &DatePolicy, offset_days: i64) -> Result<NaiveDate, ApiError> {
    dates.next_pick_date(offset_days).ok_or_else(|| {
        ApiError::Validation(format!("next_pick_day {} is out of range", offset_days))
    })
}

#[axum::debug_handler]
pub async fn create_review(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateReviewRequest>, ApiError>,
) -> Result<Json<ReviewSchedule>, ApiError> {
    payload.validate()?;
    let problem_url = payload
        .normalized_url()
        .map_err(|e| ApiError::Validation(format!("url: {}", e)))?;

    let next_pick_date = pick_date(&state.dates, payload.next_pick_day)?;
    let record_last_updated = state.dates.now_local();

    let row = db::interact(&state.pool, move |conn| {
        let record = NewReviewSchedule {
            problem_url: problem_url.as_str(),
            current_stage: payload.current_stage,
            next_pick_date,
            is_active: payload.is_active.unwrap_or(true),
            record_last_updated,
        };
        ReviewRepository::insert(conn, &record).map_err(StoreError::from)
    })
    .await
    .map_err(ApiError::InsertFailed)?;

    log::info!(
        "Created review {} for {} due {}",
        row.id,
        row.problem_url,
        row.next_pick_date
    );
    Ok(Json(row))
}

pub async fn daily_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<DueQuestion>>, ApiError> {
    let today = state.dates.today();

    let rows = db::interact(&state.pool, move |conn| {
        ReviewRepository::due_on(conn, today).map_err(StoreError::from)
    })
    .await?;

    log::debug!("{} questions due on {}", rows.len(), today);
    Ok(Json(rows))
}

#[axum::debug_handler]
pub async fn update_review(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateReviewRequest>, ApiError>,
) -> Result<Json<ReviewSchedule>, ApiError> {
    let changes = ReviewChanges {
        current_stage: payload.current_stage,
        next_pick_date: pick_date(&state.dates, payload.next_pick_day)?,
        is_active: payload.is_active.unwrap_or(true),
        record_last_updated: state.dates.now_local(),
    };

    let row = db::interact(&state.pool, move |conn| {
        ReviewRepository::update_by_id(conn, id, &changes)
    })
    .await
    .inspect_err(|e| {
        if let StoreError::NotFound { id } = e {
            log::warn!("Update for missing review {}", id);
        }
    })?;

    log::info!(
        "Review {} moved to {} due {}",
        row.id,
        row.current_stage,
        row.next_pick_date
    );
    Ok(Json(row))
}
