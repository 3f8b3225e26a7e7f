//! Order Records

use jiff::Timestamp;
use uuid::Uuid;

use crate::{auth::UserId, domain::items::records::ItemId, ids::TypedId, pagination::Cursor};

/// Order ID
pub type OrderId = TypedId<OrderRecord>;

/// Order Line ID
pub type OrderLineId = TypedId<OrderLineRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_price: u64,
    pub external_session_ref: Option<String>,
    pub client_correlation_id: Uuid,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Cursor for OrderRecord {
    fn cursor(&self) -> i64 {
        self.id.into_inner()
    }
}

/// Order Line Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRecord {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub item_id: ItemId,

    /// Unit price charged at purchase time, in minor units.
    pub price_snapshot: u64,
    pub quantity: u64,
}

/// An order line joined with the item's current catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineDetails {
    pub item_id: ItemId,
    pub item_name: String,
    pub item_picture: Option<String>,
    pub item_description: Option<String>,
    pub price_snapshot: u64,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub order: OrderRecord,
    pub lines: Vec<OrderLineDetails>,
}

/// A cart line resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedLine {
    pub item_id: ItemId,
    pub lookup_key: String,
    pub unit_price: u64,
    pub quantity: u64,
}

/// Result of order assembly. Nothing has been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedOrder {
    pub user_id: UserId,
    pub total_price: u64,
    pub lines: Vec<PreparedLine>,
}

/// A pending order with an open checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order: OrderRecord,
    pub lines: Vec<PreparedLine>,
    pub checkout_url: Option<String>,
}

/// Outcome of applying a payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finalization {
    Completed {
        order: OrderRecord,
        lines: Vec<OrderLineRecord>,
    },

    /// The confirmation was already applied; nothing changed.
    AlreadyCompleted(OrderRecord),
}
