pub mod action;
pub mod config;
pub mod error;

pub use action::DispatchAction;
pub use config::ZapdropConfig;
pub use error::{Result, ZapdropError};
