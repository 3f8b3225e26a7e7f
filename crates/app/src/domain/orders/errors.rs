//! Orders service errors.

use sqlx::{Error, error::ErrorKind};
use thiserror::Error;

use crate::payments::PaymentError;

/// Name of the check constraint that keeps stock non-negative.
const STOCK_CONSTRAINT: &str = "items_quantity_check";

/// Problems with the shape of a cart request.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CartValidationError {
    #[error("user_id_cannot_be_zero")]
    InvalidUserId,

    #[error("order_items_cannot_be_empty")]
    ItemsEmpty,

    #[error("item_id_cannot_be_less_or_equal_than_zero")]
    InvalidItemId,

    #[error("item_quantity_cannot_be_less_or_equal_than_zero")]
    InvalidItemQuantity,
}

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    Validation(#[from] CartValidationError),

    #[error("some_items_do_not_exist")]
    SomeItemsDoNotExist,

    #[error("insufficient_product_stock_amount")]
    InsufficientStock,

    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("payment processor error")]
    Payment(#[from] PaymentError),

    #[error("could not commit transaction")]
    Commit(#[source] Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        match database_error.kind() {
            ErrorKind::CheckViolation if database_error.constraint() == Some(STOCK_CONSTRAINT) => {
                Self::InsufficientStock
            }
            ErrorKind::UniqueViolation => Self::AlreadyExists,
            ErrorKind::ForeignKeyViolation => Self::InvalidReference,
            ErrorKind::NotNullViolation => Self::MissingRequiredData,
            ErrorKind::CheckViolation => Self::InvalidData,
            ErrorKind::Other | _ => Self::Sql(error),
        }
    }
}

impl OrdersServiceError {
    /// Whether the error is caused by the request rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::SomeItemsDoNotExist
                | Self::InsufficientStock
                | Self::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_map_to_not_found() {
        assert!(matches!(
            OrdersServiceError::from(Error::RowNotFound),
            OrdersServiceError::NotFound
        ));
    }

    #[test]
    fn validation_errors_keep_their_code() {
        let error = OrdersServiceError::from(CartValidationError::ItemsEmpty);

        assert_eq!(error.to_string(), "order_items_cannot_be_empty");
        assert!(error.is_client_error());
    }

    #[test]
    fn storage_errors_are_not_client_errors() {
        assert!(!OrdersServiceError::from(Error::PoolClosed).is_client_error());
    }
}
