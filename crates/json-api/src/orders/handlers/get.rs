//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};

use shop_app::domain::orders::records::OrderId;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Get Order Handler
///
/// Returns one of the caller's orders with its purchased lines.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid API token"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<i64>,
    completed: QueryParam<bool, false>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let details = state
        .app
        .orders
        .get_order(
            principal.user_id,
            OrderId::new(order.into_inner()),
            completed.into_inner().unwrap_or(true),
        )
        .await
        .map_err(into_status_error)?;

    let currency = state.http.currency;

    Ok(Json(
        OrderResponse::new(details.order, currency)?.with_lines(details.lines, currency)?,
    ))
}
