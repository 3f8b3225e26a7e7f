//! API token authentication
//!
//! Tokens are opaque bearer strings. Only their SHA-256 digest is stored;
//! a token resolves to the [`Principal`] it was issued for until revoked.

mod errors;
mod models;
mod repository;
mod service;
mod token;

pub use errors::AuthServiceError;
pub use models::*;
pub use service::*;
pub use token::{API_TOKEN_PREFIX, generate_api_token, hash_api_token};
