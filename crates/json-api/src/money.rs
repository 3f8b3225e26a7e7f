//! Display amounts.

use rust_decimal::prelude::ToPrimitive as _;
use rusty_money::iso::Currency;
use salvo::prelude::StatusError;

use shop_app::money::to_major;

use crate::extensions::*;

/// Minor units as a JSON number in major units (1999 becomes 19.99).
pub(crate) fn display_amount(minor: u64, currency: &'static Currency) -> Result<f64, StatusError> {
    to_major(minor, currency)
        .or_500("failed to convert amount")?
        .to_f64()
        .ok_or_else(StatusError::internal_server_error)
}
