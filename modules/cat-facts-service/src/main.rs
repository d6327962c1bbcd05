//! Cat Facts Service: standalone binary storing cat facts in SQLite.
//!
//! Hosts the REST API and a dashboard UI on the same port.
//! Default: http://127.0.0.1:8000/

mod config;
mod dashboard;
mod db;
mod error;
mod routes;
mod upstream;

use routes::AppState;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = config::Config::from_env();

    log::info!("Opening database at: {}", config.db_path);
    let database = match db::Db::open(&config.db_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let upstream = match upstream::Upstream::new(&config.upstream_url, config.upstream_timeout) {
        Ok(u) => Arc::new(u),
        Err(e) => {
            log::error!("Failed to build upstream client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Random facts from {} (timeout {}s)",
        upstream.url(),
        config.upstream_timeout.as_secs()
    );

    let state = Arc::new(AppState {
        db: database,
        upstream,
        start_time: Instant::now(),
    });

    let app = routes::router(state);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Cat Facts Service listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
