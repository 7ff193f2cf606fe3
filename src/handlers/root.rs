use axum::{extract::State, Json};

use crate::{
    data::models::{ApiError, RootResponse, StoreError},
    db,
    state::AppState,
};

pub async fn read_root(State(state): State<AppState>) -> Result<Json<RootResponse>, ApiError> {
    let now = db::interact(&state.pool, |conn| {
        db::database_time(conn).map_err(StoreError::from)
    })
    .await?;

    Ok(Json(RootResponse {
        result: now.to_string(),
    }))
}
