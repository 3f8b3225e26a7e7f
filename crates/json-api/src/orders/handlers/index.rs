//! Order Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{OrderResponse, OrdersResponse},
    },
    pagination::{PaginationResponse, page_request},
    state::State,
};

/// Order Index Handler
///
/// Returns one page of the caller's orders, newest first. Only completed
/// orders are listed unless `completed=false` is passed.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Page of orders"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing or invalid API token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    per_page: QueryParam<i64, false>,
    before: QueryParam<i64, false>,
    after: QueryParam<i64, false>,
    completed: QueryParam<bool, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let page = state
        .app
        .orders
        .list_orders(
            principal.user_id,
            completed.into_inner().unwrap_or(true),
            page_request(per_page, before, after),
        )
        .await
        .map_err(into_status_error)?;

    let orders = page
        .rows
        .into_iter()
        .map(|order| OrderResponse::new(order, state.http.currency))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(OrdersResponse {
        orders,
        pagination: PaginationResponse::from_cursors(req.uri(), page.cursors),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use shop_app::{
        domain::orders::{MockOrdersService, OrdersServiceError},
        pagination::{Cursors, Page, PageRequest},
    };

    use crate::test_helpers::{TEST_CUSTOMER, make_order, orders_service, state_with_orders};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders").get(handler))
    }

    fn never_other_calls(orders: &mut MockOrdersService) {
        orders.expect_prepare_order().never();
        orders.expect_place_order().never();
        orders.expect_finalize_order().never();
        orders.expect_get_order().never();
    }

    #[tokio::test]
    async fn test_index_lists_completed_orders_of_the_caller_by_default() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|user, completed_only, page| {
                *user == TEST_CUSTOMER.user_id
                    && *completed_only
                    && *page == PageRequest::new(0, 0, 0)
            })
            .return_once(|_, _, _| {
                Ok(Page {
                    rows: vec![make_order(2, true), make_order(1, true)],
                    cursors: Cursors::default(),
                })
            });

        never_other_calls(&mut orders);

        let mut res = TestClient::get("http://example.com/orders")
            .send(&make_service(orders))
            .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.orders.len(), 2, "expected two orders");
        assert_eq!(body.orders[0].id, 2);
        assert!((body.orders[0].total_price - 29.98).abs() < f64::EPSILON);
        assert_eq!(body.orders[0].currency, "EUR");
        assert!(body.orders[0].items.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_can_include_pending_orders() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|_, completed_only, page| !*completed_only && *page == PageRequest::new(5, 0, 40))
            .return_once(|_, _, _| {
                Ok(Page {
                    rows: vec![make_order(40, false)],
                    cursors: Cursors {
                        before: Some(41),
                        after: None,
                    },
                })
            });

        never_other_calls(&mut orders);

        let body: OrdersResponse =
            TestClient::get("http://example.com/orders?completed=false&per_page=5&after=40")
                .send(&make_service(orders))
                .await
                .take_json()
                .await?;

        assert!(!body.orders[0].completed);
        assert_eq!(
            body.pagination.cursor_before.as_deref(),
            Some("/orders?completed=false&per_page=5&before=41")
        );
        assert_eq!(body.pagination.cursor_after, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_without_principal_returns_401() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let service = Service::new(
            Router::new()
                .hoop(inject(state_with_orders(orders)))
                .push(Router::with_path("orders").get(handler)),
        );

        let res = TestClient::get("http://example.com/orders")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_service_error_returns_500() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::Sql(sqlx::Error::PoolTimedOut)));

        never_other_calls(&mut orders);

        let res = TestClient::get("http://example.com/orders")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
