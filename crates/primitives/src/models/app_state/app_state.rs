use crate::models::app_state::app_config::AppConfig;
use crate::models::entities::klv::KlvDictionary;
use diesel::r2d2::{self, ConnectionManager};
use diesel::PgConnection;
use std::sync::Arc;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Shared per-process state: the two connection pools, the terminal
/// configuration and the KLV dictionary (read-only after startup).
#[derive(Clone)]
pub struct AppState {
    pub db_read: DbPool,
    pub db_write: DbPool,
    pub config: AppConfig,
    pub klv: KlvDictionary,
}

impl AppState {
    pub fn new(
        db_read: DbPool,
        db_write: DbPool,
        config: AppConfig,
        klv: KlvDictionary,
    ) -> Arc<Self> {
        Arc::new(Self {
            db_read,
            db_write,
            config,
            klv,
        })
    }
}
