use authex_primitives::models::app_state::app_config::DB_POOL_MAX_CONNS;
use authex_primitives::models::DbPool;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use eyre::Report;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::info;

pub fn create_db_pool(conn_str: &SecretString, label: &str) -> Result<DbPool, Report> {
    let manager = ConnectionManager::<PgConnection>::new(conn_str.expose_secret());

    let pool = Pool::builder()
        .max_size(DB_POOL_MAX_CONNS)
        .min_idle(Some(5))
        .connection_timeout(Duration::from_secs(8))
        .idle_timeout(Some(Duration::from_secs(300)))
        .max_lifetime(Some(Duration::from_secs(1800)))
        .test_on_check_out(true)
        .build(manager)?;

    info!(
        "PostgreSQL {} connection pool created (max_size: {})",
        label, DB_POOL_MAX_CONNS
    );

    Ok(pool)
}
