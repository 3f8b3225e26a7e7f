//! Items service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::payments::PaymentError;

/// Catalog rules an item payload can break.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ItemValidationError {
    #[error("item_name_cannot_be_blank")]
    NameBlank,

    #[error("price_cannot_be_negative")]
    PriceNegative,

    #[error("sale_price_cannot_be_negative")]
    SalePriceNegative,

    #[error("sale_price_cannot_be_greater_than_price")]
    SalePriceGreaterThanPrice,

    #[error("quantity_cannot_be_zero_or_negative")]
    QuantityZeroOrNegative,
}

#[derive(Debug, Error)]
pub enum ItemsServiceError {
    #[error(transparent)]
    Validation(#[from] ItemValidationError),

    #[error("item already exists")]
    AlreadyExists,

    #[error("item not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("payment processor error")]
    Payment(#[from] PaymentError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ItemsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
