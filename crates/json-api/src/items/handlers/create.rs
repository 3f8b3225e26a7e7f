//! Create Item Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    items::{
        errors::into_status_error,
        models::{ItemRequest, ItemResponse},
    },
    state::State,
};

/// Create Item Handler
///
/// Publishes the item to the payment processor, then stores it.
#[endpoint(
    tags("items"),
    summary = "Create Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Item created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid item"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid API token"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin token required"),
        (status_code = StatusCode::CONFLICT, description = "Lookup key already in use"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment processor error"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let item = state
        .app
        .items
        .create_item(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/items/{}", item.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(ItemResponse::new(item, state.http.currency, true)?))
}
