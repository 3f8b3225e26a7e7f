//! Payment processor webhooks

mod handlers;
mod models;
mod signature;

pub(crate) use handlers::*;
