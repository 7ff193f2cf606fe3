pub mod error_models;
pub mod review_models;

pub use error_models::{ApiError, StoreError};
pub use review_models::{
    CreateReviewRequest, DueQuestion, NewReviewSchedule, ReviewChanges, ReviewSchedule,
    RootResponse, Stage, UpdateReviewRequest,
};
