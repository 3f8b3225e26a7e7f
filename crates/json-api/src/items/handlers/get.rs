//! Get Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use shop_app::domain::items::records::ItemId;

use crate::{
    extensions::*,
    items::{errors::into_status_error, models::ItemResponse},
    state::State,
};

/// Get Item Handler
#[endpoint(
    tags("items"),
    summary = "Get Item",
    responses(
        (status_code = StatusCode::OK, description = "Item found"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<ItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let authorized = depot.principal().is_some();

    let item = state
        .app
        .items
        .get_item(ItemId::new(item.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(ItemResponse::new(
        item,
        state.http.currency,
        authorized,
    )?))
}
