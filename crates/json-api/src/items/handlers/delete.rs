//! Delete Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use shop_app::domain::items::records::ItemId;

use crate::{extensions::*, items::errors::into_status_error, state::State};

/// Delete Item Handler
///
/// Archives the product at the payment processor, then hides the item from
/// the catalog.
#[endpoint(
    tags("items"),
    summary = "Delete Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Item deleted"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid API token"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin token required"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment processor error"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<i64>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .items
        .delete_item(ItemId::new(item.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
