use std::time::Duration;

use chrono::NaiveDateTime;
use diesel::{
    connection::SimpleConnection,
    prelude::*,
    r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection},
    SqliteConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::data::models::StoreError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Applied to every connection the pool opens.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds the process-wide pool and brings the schema up to date.
///
/// Any failure here is fatal for the caller: the service must not start
/// serving requests without a working database.
pub fn init_pool(database_url: &str, max_size: u32) -> anyhow::Result<DbPool> {
    init_pool_with_timeout(database_url, max_size, CONNECTION_TIMEOUT)
}

/// Same as [`init_pool`], bounding how long startup waits for the first
/// connections before giving up.
pub fn init_pool_with_timeout(
    database_url: &str,
    max_size: u32,
    connection_timeout: Duration,
) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(connection_timeout)
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: BUSY_TIMEOUT,
        }))
        .build(manager)?;

    log::info!("DB pool created ({} connections max)", max_size);

    run_migrations(&pool)?;
    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    for version in &applied {
        log::info!("Applied migration {}", version);
    }
    Ok(())
}

/// Releases this handle on the pool. Connections close once the last handle is
/// dropped, so call it once at teardown after the server has stopped.
pub fn close_pool(pool: DbPool) {
    let state = pool.state();
    drop(pool);
    log::info!(
        "DB pool handle released ({} connections, {} idle)",
        state.connections,
        state.idle_connections
    );
}

/// The database's own notion of the current time.
pub fn database_time(conn: &mut SqliteConnection) -> Result<NaiveDateTime, diesel::result::Error> {
    diesel::select(diesel::dsl::now).get_result(conn)
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// Waiting for a free connection happens there too, so an exhausted pool
/// suspends the request task without stalling the runtime.
pub async fn interact<F, T>(pool: &DbPool, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn: DbConnection = pool.get()?;
        f(&mut *conn)
    })
    .await?
}
