//! Item Errors

use salvo::http::StatusError;
use tracing::error;

use shop_app::domain::items::ItemsServiceError;

use crate::payments::payment_status_error;

pub(crate) fn into_status_error(error: ItemsServiceError) -> StatusError {
    match error {
        ItemsServiceError::Validation(source) => StatusError::bad_request().brief(source.to_string()),
        ItemsServiceError::NotFound => StatusError::not_found().brief("Item not found"),
        ItemsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Item with this lookup key already exists")
        }
        ItemsServiceError::InvalidReference
        | ItemsServiceError::MissingRequiredData
        | ItemsServiceError::InvalidData => StatusError::bad_request().brief("Invalid item payload"),
        ItemsServiceError::Payment(source) => payment_status_error(&source),
        ItemsServiceError::Sql(source) => {
            error!("item storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
