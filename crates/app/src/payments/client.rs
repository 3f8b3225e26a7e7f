//! Stripe compatible HTTP client.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Response};
use rusty_money::iso::Currency;
use serde::{Deserialize, de::DeserializeOwned};

use crate::payments::{
    CheckoutParams, CheckoutSession, ExternalPrice, ExternalProduct, PaymentError,
    PaymentGateway, PriceParams, ProductParams, SessionLineItem,
};

/// Page size requested from list endpoints; the processor's maximum.
const LIST_LIMIT: &str = "100";

/// Configuration for connecting to the payment processor.
#[derive(Clone)]
pub struct PaymentsConfig {
    /// API base address, e.g. `"https://api.stripe.com"`.
    pub api_base: String,

    /// Secret API key sent as a bearer token.
    pub secret_key: String,

    /// Currency of every created price.
    pub currency: &'static Currency,

    /// Where the processor redirects after a successful checkout.
    pub success_url: String,

    /// Where the processor redirects when checkout is abandoned.
    pub cancel_url: String,
}

impl fmt::Debug for PaymentsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentsConfig")
            .field("api_base", &self.api_base)
            .field("secret_key", &"**redacted**")
            .field("currency", &self.currency.iso_alpha_code)
            .field("success_url", &self.success_url)
            .field("cancel_url", &self.cancel_url)
            .finish()
    }
}

/// HTTP client for the processor's products, prices and checkout APIs.
#[derive(Debug, Clone)]
pub struct StripeClient {
    config: PaymentsConfig,
    http: Client,
}

type Form = Vec<(String, String)>;

impl StripeClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: PaymentsConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.config.api_base.trim_end_matches('/'))
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, form: &Form) -> Result<T, PaymentError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.config.secret_key)
            .form(form)
            .send()
            .await?;

        parse(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &Form) -> Result<T, PaymentError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.config.secret_key)
            .query(query)
            .send()
            .await?;

        parse(response).await
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    #[tracing::instrument(name = "payments.create_product", skip(self, product), err)]
    async fn create_product(
        &self,
        product: ProductParams,
    ) -> Result<ExternalProduct, PaymentError> {
        let mut form = product_form(product);
        form.push(("active".to_string(), "true".to_string()));

        let created: ProductResponse = self.post("products", &form).await?;

        Ok(ExternalProduct { id: created.id })
    }

    #[tracing::instrument(name = "payments.update_product", skip(self, product), err)]
    async fn update_product(
        &self,
        product_ref: &str,
        product: ProductParams,
    ) -> Result<ExternalProduct, PaymentError> {
        let updated: ProductResponse = self
            .post(&format!("products/{product_ref}"), &product_form(product))
            .await?;

        Ok(ExternalProduct { id: updated.id })
    }

    #[tracing::instrument(name = "payments.archive_product", skip(self), err)]
    async fn archive_product(&self, product_ref: &str) -> Result<(), PaymentError> {
        let form = vec![("active".to_string(), "false".to_string())];

        let _archived: ProductResponse = self
            .post(&format!("products/{product_ref}"), &form)
            .await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "payments.create_price",
        skip(self, price),
        fields(lookup_key = %price.lookup_key, unit_amount = price.unit_amount),
        err
    )]
    async fn create_price(&self, price: PriceParams) -> Result<ExternalPrice, PaymentError> {
        let created: PriceResponse = self
            .post("prices", &price_form(price, self.config.currency))
            .await?;

        Ok(created.into())
    }

    #[tracing::instrument(name = "payments.find_prices", skip(self), err)]
    async fn find_prices(
        &self,
        lookup_keys: Vec<String>,
    ) -> Result<Vec<ExternalPrice>, PaymentError> {
        let mut query: Form = lookup_keys
            .into_iter()
            .map(|key| ("lookup_keys[]".to_string(), key))
            .collect();
        query.push(("active".to_string(), "true".to_string()));
        query.push(("limit".to_string(), LIST_LIMIT.to_string()));

        let prices: ListResponse<PriceResponse> = self.get("prices", &query).await?;

        Ok(prices.data.into_iter().map(ExternalPrice::from).collect())
    }

    #[tracing::instrument(
        name = "payments.create_checkout_session",
        skip(self, checkout),
        fields(client_reference_id = %checkout.client_reference_id),
        err
    )]
    async fn create_checkout_session(
        &self,
        checkout: CheckoutParams,
    ) -> Result<CheckoutSession, PaymentError> {
        let form = checkout_form(checkout, &self.config);

        let session: SessionResponse = self.post("checkout/sessions", &form).await?;

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }

    #[tracing::instrument(name = "payments.list_session_line_items", skip(self), err)]
    async fn list_session_line_items(
        &self,
        session_ref: &str,
    ) -> Result<Vec<SessionLineItem>, PaymentError> {
        let path = format!("checkout/sessions/{session_ref}/line_items");
        let mut lines = Vec::new();
        let mut starting_after: Option<String> = None;

        loop {
            let mut query = vec![("limit".to_string(), LIST_LIMIT.to_string())];

            if let Some(cursor) = starting_after.take() {
                query.push(("starting_after".to_string(), cursor));
            }

            let page: ListResponse<LineItemResponse> = self.get(&path, &query).await?;

            starting_after = page.data.last().map(|line| line.id.clone());

            for line in page.data {
                lines.push(line.try_into()?);
            }

            if !page.has_more || starting_after.is_none() {
                break;
            }
        }

        Ok(lines)
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, PaymentError> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await?;

        return Err(provider_error(status.as_u16(), text));
    }

    Ok(response.json().await?)
}

/// Prefer the processor's own error message, falling back to the raw body.
fn provider_error(status: u16, text: String) -> PaymentError {
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or(text);

    PaymentError::Provider { status, message }
}

fn product_form(product: ProductParams) -> Form {
    let mut form = vec![("name".to_string(), product.name)];

    if let Some(description) = product.description {
        form.push(("description".to_string(), description));
    }

    form
}

fn price_form(price: PriceParams, currency: &Currency) -> Form {
    let mut form = vec![
        ("product".to_string(), price.product_ref),
        (
            "currency".to_string(),
            currency.iso_alpha_code.to_ascii_lowercase(),
        ),
        ("unit_amount".to_string(), price.unit_amount.to_string()),
        ("lookup_key".to_string(), price.lookup_key),
    ];

    if price.transfer_lookup_key {
        form.push(("transfer_lookup_key".to_string(), "true".to_string()));
    }

    form
}

fn checkout_form(checkout: CheckoutParams, config: &PaymentsConfig) -> Form {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), config.success_url.clone()),
        ("cancel_url".to_string(), config.cancel_url.clone()),
        (
            "client_reference_id".to_string(),
            checkout.client_reference_id,
        ),
    ];

    for (index, line) in checkout.lines.into_iter().enumerate() {
        form.push((format!("line_items[{index}][price]"), line.price_ref));
        form.push((
            format!("line_items[{index}][quantity]"),
            line.quantity.to_string(),
        ));
    }

    form
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    id: String,
    lookup_key: Option<String>,
}

impl From<PriceResponse> for ExternalPrice {
    fn from(price: PriceResponse) -> Self {
        Self {
            id: price.id,
            lookup_key: price.lookup_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LineItemResponse {
    id: String,
    quantity: Option<u64>,
    price: Option<LineItemPrice>,
}

#[derive(Debug, Deserialize)]
struct LineItemPrice {
    unit_amount: Option<u64>,
    product: String,
}

impl TryFrom<LineItemResponse> for SessionLineItem {
    type Error = PaymentError;

    fn try_from(line: LineItemResponse) -> Result<Self, Self::Error> {
        let incomplete =
            || PaymentError::UnexpectedResponse(format!("line item {} is incomplete", line.id));

        let price = line.price.as_ref().ok_or_else(incomplete)?;

        Ok(Self {
            product_ref: price.product.clone(),
            unit_amount: price.unit_amount.ok_or_else(incomplete)?,
            quantity: line.quantity.ok_or_else(incomplete)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
