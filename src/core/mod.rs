pub mod services;
pub mod store_manager;
pub mod utils;
