//! Auth data models.

use jiff::Timestamp;

use crate::ids::TypedId;

/// Shop customer or operator. Users live outside this module; only their ids
/// are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum User {}

pub type UserId = TypedId<User>;

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,

    /// May manage the catalog and see stock and sale prices.
    pub is_admin: bool,
}

/// API token metadata persisted in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTokenRecord {
    pub id: i64,
    pub user_id: UserId,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// API token issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub record: ApiTokenRecord,
}
