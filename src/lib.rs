pub mod checkers;
pub mod classify;
pub mod config;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
