//! Order request and response bodies.

use rusty_money::iso::Currency;
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shop_app::{
    auth::UserId,
    domain::orders::{
        data::{CartLine, CartRequest},
        records::{OrderLineDetails, OrderRecord, PlacedOrder},
    },
};

use crate::{money::display_amount, pagination::PaginationResponse};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub item_id: i64,

    /// Current catalog name of the item
    pub item_name: String,

    pub item_picture: Option<String>,

    pub item_description: Option<String>,

    /// Unit price charged at purchase time, in major units
    pub item_price: f64,

    pub quantity: u64,
}

impl OrderLineResponse {
    fn new(line: OrderLineDetails, currency: &'static Currency) -> Result<Self, StatusError> {
        Ok(Self {
            item_id: line.item_id.into_inner(),
            item_name: line.item_name,
            item_picture: line.item_picture,
            item_description: line.item_description,
            item_price: display_amount(line.price_snapshot, currency)?,
            quantity: line.quantity,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// Order id
    pub id: i64,

    /// Order total in major units
    pub total_price: f64,

    /// ISO 4217 currency code
    pub currency: String,

    pub completed: bool,

    pub created_at: String,

    pub updated_at: String,

    /// Purchased lines; only present on single order responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderLineResponse>>,
}

impl OrderResponse {
    pub(crate) fn new(order: OrderRecord, currency: &'static Currency) -> Result<Self, StatusError> {
        Ok(Self {
            id: order.id.into_inner(),
            total_price: display_amount(order.total_price, currency)?,
            currency: currency.iso_alpha_code.to_string(),
            completed: order.completed,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
            items: None,
        })
    }

    pub(crate) fn with_lines(
        mut self,
        lines: Vec<OrderLineDetails>,
        currency: &'static Currency,
    ) -> Result<Self, StatusError> {
        self.items = Some(
            lines
                .into_iter()
                .map(|line| OrderLineResponse::new(line, currency))
                .collect::<Result<_, _>>()?,
        );

        Ok(self)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// One page of orders, newest first
    pub orders: Vec<OrderResponse>,

    pub pagination: PaginationResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineRequest {
    pub item_id: i64,
    pub quantity: i64,
}

/// Cart to check out. Lines for the same item are merged.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub items: Vec<OrderLineRequest>,
}

impl CreateOrderRequest {
    pub(crate) fn into_cart(self, user_id: UserId) -> CartRequest {
        CartRequest {
            user_id,
            items: self
                .items
                .into_iter()
                .map(|line| CartLine {
                    item_id: line.item_id,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// A pending order and where to pay for it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderPlacedResponse {
    /// Order id
    pub id: i64,

    /// Correlation id echoed back by the payment processor
    pub client_reference_id: Uuid,

    /// Checkout session at the payment processor
    pub session_id: Option<String>,

    /// Hosted checkout page to redirect the customer to
    pub checkout_url: Option<String>,

    /// Amount to be charged, in major units
    pub total_price: f64,

    pub currency: String,
}

impl OrderPlacedResponse {
    pub(crate) fn new(placed: PlacedOrder, currency: &'static Currency) -> Result<Self, StatusError> {
        let PlacedOrder {
            order,
            checkout_url,
            ..
        } = placed;

        Ok(Self {
            id: order.id.into_inner(),
            client_reference_id: order.client_correlation_id,
            session_id: order.external_session_ref,
            checkout_url,
            total_price: display_amount(order.total_price, currency)?,
            currency: currency.iso_alpha_code.to_string(),
        })
    }
}
