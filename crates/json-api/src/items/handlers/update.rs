//! Update Item Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use shop_app::domain::items::records::ItemId;

use crate::{
    extensions::*,
    items::{
        errors::into_status_error,
        models::{ItemRequest, ItemResponse},
    },
    state::State,
};

/// Update Item Handler
///
/// Replaces every field of the item. A changed effective price is published
/// to the payment processor as a new price under the same lookup key.
#[endpoint(
    tags("items"),
    summary = "Update Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid item"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid API token"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin token required"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment processor error"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<i64>,
    json: JsonBody<ItemRequest>,
    depot: &mut Depot,
) -> Result<Json<ItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let item = state
        .app
        .items
        .update_item(ItemId::new(item.into_inner()), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ItemResponse::new(item, state.http.currency, true)?))
}
