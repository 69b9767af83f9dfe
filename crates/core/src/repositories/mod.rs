pub mod card_repository;
pub mod klv_repository;
pub mod wallet_repository;

pub use card_repository::CardRepository;
pub use klv_repository::KlvRepository;
pub use wallet_repository::{BalanceMovement, WalletRepository};
