//! Payment gateway contract.

use async_trait::async_trait;
use mockall::automock;

use crate::payments::PaymentError;

/// Catalog product to create or update at the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductParams {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProduct {
    pub id: String,
}

/// Price to create for an existing product, in the gateway's configured
/// currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceParams {
    pub product_ref: String,
    pub unit_amount: u64,
    pub lookup_key: String,

    /// Move the lookup key over from the product's previous price.
    pub transfer_lookup_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPrice {
    pub id: String,
    pub lookup_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub price_ref: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutParams {
    /// Correlates the session with the pending order on confirmation.
    pub client_reference_id: String,
    pub lines: Vec<CheckoutLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// A purchased line of a completed checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLineItem {
    pub product_ref: String,
    pub unit_amount: u64,
    pub quantity: u64,
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an active product.
    async fn create_product(&self, product: ProductParams)
    -> Result<ExternalProduct, PaymentError>;

    /// Replace the name and description of a product.
    async fn update_product(
        &self,
        product_ref: &str,
        product: ProductParams,
    ) -> Result<ExternalProduct, PaymentError>;

    /// Deactivate a product so it can no longer be sold.
    async fn archive_product(&self, product_ref: &str) -> Result<(), PaymentError>;

    async fn create_price(&self, price: PriceParams) -> Result<ExternalPrice, PaymentError>;

    /// Resolve active prices by lookup key.
    async fn find_prices(&self, lookup_keys: Vec<String>)
    -> Result<Vec<ExternalPrice>, PaymentError>;

    async fn create_checkout_session(
        &self,
        checkout: CheckoutParams,
    ) -> Result<CheckoutSession, PaymentError>;

    /// All purchased lines of a session, across every result page.
    async fn list_session_line_items(
        &self,
        session_ref: &str,
    ) -> Result<Vec<SessionLineItem>, PaymentError>;
}
