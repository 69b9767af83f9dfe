pub mod utility;

use authex_core::repositories::KlvRepository;
use authex_primitives::models::{AppConfig, AppState};
use axum::Router;
use eyre::{eyre, Report};
use std::sync::Arc;
use tracing::info;

use crate::utility::db_pool::create_db_pool;
use crate::utility::logging::setup_logging;
use crate::utility::server::serve;

pub async fn run() -> Result<(), Report> {
    // 1. Logging first, so everything after it is visible
    setup_logging();
    info!("Starting authex application...");

    // 2. Environment and configuration
    utility::load_env();
    let config = AppConfig::from_env()?;

    // 3. Connection pools
    let db_read = create_db_pool(&config.conn_str_read, "read")?;
    let db_write = create_db_pool(&config.conn_str_write, "write")?;

    // 4. KLV dictionary, loaded once for the process lifetime
    let klv = {
        let mut conn = db_read
            .get()
            .map_err(|e| eyre!("cannot get a read connection: {}", e))?;
        KlvRepository::load_dictionary(&mut conn)
            .map_err(|e| eyre!("cannot load the KLV dictionary: {}", e))?
    };
    if klv.is_empty() {
        return Err(eyre!("pmtol_klvmap is empty, tx-data cannot be decoded"));
    }
    info!("KLV dictionary loaded with {} keys", klv.len());

    // 5. Application state and router
    let state = AppState::new(db_read, db_write, config, klv);
    let app = build_router(state);

    // 6. HTTP server with graceful shutdown
    serve(app).await?;

    info!("authex application shut down gracefully");
    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    authex_api::app::create_router(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
