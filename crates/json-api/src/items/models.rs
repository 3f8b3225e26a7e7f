//! Item request and response bodies.

use rusty_money::iso::Currency;
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};

use shop_app::domain::items::{data::ItemData, records::ItemRecord};

use crate::{money::display_amount, pagination::PaginationResponse};

/// Item as shown to shop visitors.
///
/// The sale price and stock quantity are only filled in for authenticated
/// callers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ItemResponse {
    /// Item id
    pub id: i64,

    pub item_name: String,

    pub item_picture: Option<String>,

    /// List price in major units
    pub item_price: f64,

    /// ISO 4217 currency code
    pub item_currency: String,

    /// Sale price in major units
    pub item_sale_price: Option<f64>,

    pub item_description: Option<String>,

    pub shippable: bool,

    /// Units in stock
    pub quantity: Option<u64>,
}

impl ItemResponse {
    pub(crate) fn new(
        item: ItemRecord,
        currency: &'static Currency,
        authorized: bool,
    ) -> Result<Self, StatusError> {
        let item_sale_price = match item.sale_price {
            Some(sale_price) if authorized => Some(display_amount(sale_price, currency)?),
            _ => None,
        };

        Ok(Self {
            id: item.id.into_inner(),
            item_name: item.name,
            item_picture: item.picture,
            item_price: display_amount(item.price, currency)?,
            item_currency: currency.iso_alpha_code.to_string(),
            item_sale_price,
            item_description: item.description,
            shippable: item.shippable,
            quantity: authorized.then_some(item.quantity),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ItemsResponse {
    /// One page of items, newest first
    pub items: Vec<ItemResponse>,

    pub pagination: PaginationResponse,
}

/// Item create and update payload. Amounts are in minor units.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ItemRequest {
    pub item_name: String,

    #[serde(default)]
    pub item_picture: Option<String>,

    pub item_price: i64,

    #[serde(default)]
    pub item_sale_price: Option<i64>,

    #[serde(default)]
    pub item_description: Option<String>,

    #[serde(default)]
    pub shippable: bool,

    pub quantity: i64,

    /// Price lookup key at the payment processor; generated when omitted.
    /// Ignored on update.
    #[serde(default)]
    pub lookup_key: Option<String>,
}

impl From<ItemRequest> for ItemData {
    fn from(request: ItemRequest) -> Self {
        ItemData {
            name: request.item_name,
            picture: request.item_picture,
            price: request.item_price,
            sale_price: request.item_sale_price,
            description: request.item_description,
            shippable: request.shippable,
            quantity: request.quantity,
            lookup_key: request.lookup_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::test_helpers::make_item;

    use super::*;

    #[test]
    fn test_anonymous_view_hides_sale_price_and_stock() -> TestResult {
        let response = ItemResponse::new(make_item(3), EUR, false)?;

        assert_eq!(response.id, 3);
        assert!((response.item_price - 19.99).abs() < f64::EPSILON);
        assert_eq!(response.item_currency, "EUR");
        assert_eq!(response.item_sale_price, None);
        assert_eq!(response.quantity, None);

        Ok(())
    }

    #[test]
    fn test_authorized_view_shows_sale_price_and_stock() -> TestResult {
        let response = ItemResponse::new(make_item(3), EUR, true)?;

        assert!(
            response
                .item_sale_price
                .is_some_and(|sale_price| (sale_price - 14.99).abs() < f64::EPSILON)
        );
        assert_eq!(response.quantity, Some(12));

        Ok(())
    }
}
