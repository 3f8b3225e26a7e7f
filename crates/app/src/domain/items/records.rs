//! Item Records

use jiff::Timestamp;

use crate::{ids::TypedId, pagination::Cursor};

/// Item ID
pub type ItemId = TypedId<ItemRecord>;

/// Item Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub picture: Option<String>,
    pub price: u64,
    pub sale_price: Option<u64>,
    pub description: Option<String>,
    pub shippable: bool,
    pub quantity: u64,
    pub external_product_ref: String,
    pub external_price_key: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ItemRecord {
    /// Unit price charged at checkout: the sale price when set.
    pub fn effective_price(&self) -> u64 {
        self.sale_price.unwrap_or(self.price)
    }
}

impl Cursor for ItemRecord {
    fn cursor(&self) -> i64 {
        self.id.into_inner()
    }
}
