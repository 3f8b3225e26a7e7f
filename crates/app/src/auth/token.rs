//! API token generation and hashing.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// API token prefix.
pub const API_TOKEN_PREFIX: &str = "shop";

/// Number of random bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

/// Generate a new raw bearer token: `shop_` followed by 64 hex characters.
#[must_use]
pub fn generate_api_token() -> String {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    format!("{API_TOKEN_PREFIX}_{}", hex::encode(secret))
}

/// Digest stored in place of the raw token.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
