pub mod card;
pub mod klv;
pub mod transaction;
pub mod wallet;
