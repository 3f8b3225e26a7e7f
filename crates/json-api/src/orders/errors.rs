//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use shop_app::domain::orders::OrdersServiceError;

use crate::payments::payment_status_error;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::Validation(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        OrdersServiceError::SomeItemsDoNotExist => {
            StatusError::bad_request().brief(OrdersServiceError::SomeItemsDoNotExist.to_string())
        }
        OrdersServiceError::InsufficientStock => {
            StatusError::conflict().brief(OrdersServiceError::InsufficientStock.to_string())
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => StatusError::bad_request().brief("Invalid order"),
        OrdersServiceError::Payment(source) => payment_status_error(&source),
        OrdersServiceError::Commit(source) | OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
