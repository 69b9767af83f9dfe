pub mod app_state;
pub mod entities;

pub use app_state::app_config::AppConfig;
pub use app_state::app_state::{AppState, DbPool};
pub use entities::card::CardInfo;
pub use entities::klv::{KlvDictionary, KlvEntry};
pub use entities::transaction::{NewWalletTransaction, WalletTransaction};
pub use entities::wallet::WalletInfo;
