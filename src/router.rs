use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{
    handlers::{review, root},
    state::AppState,
};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::read_root))
        .route("/space-repetition/create", post(review::create_review))
        .route(
            "/spaced-repetition/daily-questions",
            get(review::daily_questions),
        )
        .route(
            "/spaced-repetition/question-update/{id}",
            put(review::update_review),
        )
        .with_state(state)
}
