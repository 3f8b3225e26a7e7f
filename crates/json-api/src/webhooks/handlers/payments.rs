//! Payment Webhook Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;
use tracing::{error, info, warn};

use shop_app::domain::orders::{OrdersServiceError, data::PaymentConfirmation, records::Finalization};

use crate::{
    extensions::*,
    orders::into_status_error,
    state::State,
    webhooks::{
        models::{CHECKOUT_SESSION_COMPLETED, CompletedSession, WebhookEvent},
        signature::{SIGNATURE_HEADER, verify},
    },
};

/// Payment Webhook Handler
///
/// Receives signed payment processor events. A completed checkout session
/// finalizes the matching order; every other event type is acknowledged and
/// ignored. An unknown order answers 404 so the processor redelivers.
#[endpoint(
    tags("webhooks"),
    summary = "Payment Processor Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Event accepted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid signature or payload"),
        (status_code = StatusCode::NOT_FOUND, description = "No pending order for the session"),
        (status_code = StatusCode::CONFLICT, description = "Paid order exceeds remaining stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let header = req
        .header::<String>(SIGNATURE_HEADER)
        .ok_or_else(|| StatusError::bad_request().brief("Missing signature header"))?;

    let payload = req.payload().await.or_400("Unreadable request body")?;

    verify(&state.http.webhook_secret, &header, payload, Timestamp::now()).map_err(|error| {
        warn!("rejected webhook delivery: {error}");

        StatusError::bad_request().brief("Invalid signature")
    })?;

    let event: WebhookEvent = serde_json::from_slice(payload).or_400("Invalid event payload")?;

    if event.kind != CHECKOUT_SESSION_COMPLETED {
        info!(event_id = ?event.id, kind = %event.kind, "ignoring webhook event");

        return Ok(StatusCode::OK);
    }

    let session: CompletedSession =
        serde_json::from_value(event.data.object).or_400("Invalid checkout session")?;

    let confirmation = PaymentConfirmation::from(session);
    let session_reference = confirmation.session_reference.clone();
    let correlation_id = confirmation.client_correlation_id;

    match state.app.orders.finalize_order(confirmation).await {
        Ok(Finalization::Completed { order, lines }) => {
            info!(order_id = %order.id, lines = lines.len(), "order paid");
        }
        Ok(Finalization::AlreadyCompleted(order)) => {
            info!(order_id = %order.id, "duplicate payment confirmation");
        }
        Err(OrdersServiceError::NotFound) => {
            warn!(event_id = ?event.id, "payment confirmation for an unknown order");

            return Err(StatusError::not_found().brief("Order not found"));
        }
        Err(OrdersServiceError::InsufficientStock) => {
            error!(
                event_id = ?event.id,
                session = %session_reference,
                correlation_id = %correlation_id,
                "paid order cannot be finalized: insufficient stock"
            );

            return Err(into_status_error(OrdersServiceError::InsufficientStock));
        }
        Err(error) => return Err(into_status_error(error)),
    }

    Ok(StatusCode::OK)
}
