pub mod db_pool;
pub mod logging;
pub mod server;
pub mod shutdown;

use tracing::info;

pub fn load_env() {
    if dotenvy::dotenv().is_ok() {
        info!("Loaded .env file");
    } else {
        info!("No .env file found, using system environment");
    }
}
