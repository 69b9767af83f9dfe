pub mod deduct_service;
pub mod load_service;
pub mod stop_service;

pub use deduct_service::DeductService;
pub use load_service::LoadService;
pub use stop_service::StopService;
