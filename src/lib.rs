pub mod config;
pub mod enums;
pub mod error;
pub mod retry;
pub mod db;
pub mod api;

pub use config::Config;
pub use enums::AccountStatus;
pub use error::{ AppError, Result };
