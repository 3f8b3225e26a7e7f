//! Payment processor errors.

use thiserror::Error;

/// Errors that can occur when communicating with the payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The processor rejected the request.
    #[error("payment processor returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The processor answered with a body we could not use.
    #[error("unexpected response from payment processor: {0}")]
    UnexpectedResponse(String),
}
