use crate::db::DbPool;
use crate::scheduling::DatePolicy;

/// Shared by every handler. The pool is the only resource behind it.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub dates: DatePolicy,
}

impl AppState {
    pub fn new(pool: DbPool, dates: DatePolicy) -> Self {
        Self { pool, dates }
    }
}
