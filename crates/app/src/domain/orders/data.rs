//! Orders Data

use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::{
    auth::UserId, domain::items::records::ItemId, domain::orders::errors::CartValidationError,
};

/// One requested line of a cart, as received from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub item_id: i64,
    pub quantity: i64,
}

/// Items a user wants to buy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRequest {
    pub user_id: UserId,
    pub items: Vec<CartLine>,
}

impl CartRequest {
    /// # Errors
    ///
    /// Returns the first problem found: user, then emptiness, then each line in
    /// order.
    pub fn validate(&self) -> Result<(), CartValidationError> {
        if !self.user_id.is_valid() {
            return Err(CartValidationError::InvalidUserId);
        }

        if self.items.is_empty() {
            return Err(CartValidationError::ItemsEmpty);
        }

        for line in &self.items {
            if line.item_id <= 0 {
                return Err(CartValidationError::InvalidItemId);
            }

            if line.quantity <= 0 {
                return Err(CartValidationError::InvalidItemQuantity);
            }
        }

        Ok(())
    }

    /// Validated lines with repeated items merged, in order of first mention.
    pub(crate) fn merged_lines(&self) -> Result<Vec<(ItemId, u64)>, CartValidationError> {
        self.validate()?;

        let mut merged: Vec<(ItemId, u64)> = Vec::with_capacity(self.items.len());
        let mut positions: FxHashMap<ItemId, usize> = FxHashMap::default();

        for line in &self.items {
            let item = ItemId::new(line.item_id);
            let quantity = u64::try_from(line.quantity)
                .map_err(|_negative| CartValidationError::InvalidItemQuantity)?;

            match positions.get(&item).and_then(|index| merged.get_mut(*index)) {
                Some((_, total)) => {
                    *total = total
                        .checked_add(quantity)
                        .ok_or(CartValidationError::InvalidItemQuantity)?;
                }
                None => {
                    positions.insert(item, merged.len());
                    merged.push((item, quantity));
                }
            }
        }

        Ok(merged)
    }
}

/// Payment confirmation for a checkout session, as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub session_reference: String,
    pub client_correlation_id: Uuid,

    /// Amount charged, in minor units.
    pub total_price: u64,
}
