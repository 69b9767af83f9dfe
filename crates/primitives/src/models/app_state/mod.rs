pub mod app_config;
pub mod app_state;

pub use app_config::{AppConfig, SecretStore, TerminalInfo};
pub use app_state::{AppState, DbPool};
