//! Payment processor error mapping.

use salvo::http::StatusError;
use tracing::error;

use shop_app::payments::PaymentError;

/// Payment processor failures surface as 502, carrying the processor's own
/// message when it gave one.
pub(crate) fn payment_status_error(error: &PaymentError) -> StatusError {
    error!("payment processor call failed: {error}");

    match error {
        PaymentError::Provider { message, .. } => StatusError::bad_gateway().brief(message.clone()),
        PaymentError::Http(_) | PaymentError::UnexpectedResponse(_) => {
            StatusError::bad_gateway().brief("Payment processor unavailable")
        }
    }
}
