use axum::http::StatusCode;
use diesel::result::Error as DieselError;
use thiserror::Error;

// Errors raised while talking to the database
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record {id} not found")]
    NotFound { id: i32 },
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// Errors surfaced to HTTP clients
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
    #[error("{0}")]
    Validation(String),
    #[error("Insert failed")]
    InsertFailed(#[source] StoreError),
    #[error("Record not found.")]
    NotFound,
    #[error("Internal server error")]
    Internal(#[source] StoreError),
}
