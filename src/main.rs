use anyhow::Context;
use tokio::net::TcpListener;

mod config;
mod data;
mod db;
mod features;
mod handlers;
mod router;
mod scheduling;
mod schema;
mod state;
#[cfg(test)]
mod test_support;

use crate::{config::Config, scheduling::DatePolicy, state::AppState};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let pool = db::init_pool(&config.database_url, config.pool_size)
        .with_context(|| format!("Failed to create DB pool for {}", config.database_url))?;

    let state = AppState::new(pool.clone(), DatePolicy::system(config.timezone));
    let app = router::app(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.bind_addr))?;

    log::info!(
        "Server running on http://{} (schedule zone {})",
        listener.local_addr()?,
        config.timezone
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db::close_pool(pool);
    served.context("Server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::warn!("Received Ctrl+C, shutting down"),
        _ = terminate => log::warn!("Received SIGTERM, shutting down"),
    }
}
