//! Payment processor integration

mod client;
mod errors;
mod gateway;

pub use client::{PaymentsConfig, StripeClient};
pub use errors::PaymentError;
pub use gateway::*;
