//! Orders

mod assembly;
pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::{CartValidationError, OrdersServiceError};
pub use service::*;
