//! Order assembly: turning carts and processor line items into order lines.

use rustc_hash::FxHashMap;

use crate::{
    auth::UserId,
    domain::{
        items::records::{ItemId, ItemRecord},
        orders::{
            errors::OrdersServiceError,
            records::{PreparedLine, PreparedOrder},
        },
    },
    payments::SessionLineItem,
};

/// Resolve merged cart lines against the fetched catalog rows.
///
/// `items` holds whatever the batch lookup returned for the requested ids;
/// a missing row means the item does not exist (or was deleted).
pub(crate) fn assemble(
    user_id: UserId,
    lines: &[(ItemId, u64)],
    items: Vec<ItemRecord>,
) -> Result<PreparedOrder, OrdersServiceError> {
    if items.len() != lines.len() {
        return Err(OrdersServiceError::SomeItemsDoNotExist);
    }

    let catalog: FxHashMap<ItemId, ItemRecord> =
        items.into_iter().map(|item| (item.id, item)).collect();

    let mut total_price: u64 = 0;
    let mut prepared = Vec::with_capacity(lines.len());

    for (item_id, quantity) in lines {
        let item = catalog
            .get(item_id)
            .ok_or(OrdersServiceError::SomeItemsDoNotExist)?;

        if *quantity > item.quantity {
            return Err(OrdersServiceError::InsufficientStock);
        }

        let unit_price = item.effective_price();

        total_price = unit_price
            .checked_mul(*quantity)
            .and_then(|subtotal| total_price.checked_add(subtotal))
            .ok_or(OrdersServiceError::InvalidData)?;

        prepared.push(PreparedLine {
            item_id: *item_id,
            lookup_key: item.external_price_key.clone(),
            unit_price,
            quantity: *quantity,
        });
    }

    Ok(PreparedOrder {
        user_id,
        total_price,
        lines: prepared,
    })
}

/// A purchased product as charged by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PurchasedLine {
    pub product_ref: String,
    pub unit_amount: u64,
    pub quantity: u64,
}

/// Merge session line items that refer to the same product. The first unit
/// amount seen for a product is kept.
pub(crate) fn merge_session_lines(
    lines: Vec<SessionLineItem>,
) -> Result<Vec<PurchasedLine>, OrdersServiceError> {
    let mut merged: Vec<PurchasedLine> = Vec::with_capacity(lines.len());
    let mut positions: FxHashMap<String, usize> = FxHashMap::default();

    for line in lines {
        if let Some(existing) = positions
            .get(&line.product_ref)
            .and_then(|index| merged.get_mut(*index))
        {
            existing.quantity = existing
                .quantity
                .checked_add(line.quantity)
                .ok_or(OrdersServiceError::InvalidData)?;

            continue;
        }

        positions.insert(line.product_ref.clone(), merged.len());

        merged.push(PurchasedLine {
            product_ref: line.product_ref,
            unit_amount: line.unit_amount,
            quantity: line.quantity,
        });
    }

    Ok(merged)
}
