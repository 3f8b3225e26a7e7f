//! Webhook event payloads.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use shop_app::domain::orders::data::PaymentConfirmation;

pub(crate) const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Event envelope. Only the fields this service acts on are read.
#[derive(Debug, Deserialize)]
pub(crate) struct WebhookEvent {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub kind: String,

    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventData {
    pub object: Value,
}

/// The `data.object` of a completed checkout session.
#[derive(Debug, Deserialize)]
pub(crate) struct CompletedSession {
    pub id: String,
    pub client_reference_id: Uuid,
    pub amount_total: u64,
}

impl From<CompletedSession> for PaymentConfirmation {
    fn from(session: CompletedSession) -> Self {
        PaymentConfirmation {
            session_reference: session.id,
            client_correlation_id: session.client_reference_id,
            total_price: session.amount_total,
        }
    }
}
