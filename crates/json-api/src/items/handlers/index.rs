//! Item Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    items::{
        errors::into_status_error,
        models::{ItemResponse, ItemsResponse},
    },
    pagination::{PaginationResponse, page_request},
    state::State,
};

/// Item Index Handler
///
/// Returns one page of catalog items, newest first, with links to the
/// neighbouring pages.
#[endpoint(
    tags("items"),
    summary = "List Items",
    responses(
        (status_code = StatusCode::OK, description = "Page of items"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid API token"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    per_page: QueryParam<i64, false>,
    before: QueryParam<i64, false>,
    after: QueryParam<i64, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ItemsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let authorized = depot.principal().is_some();

    let page = state
        .app
        .items
        .list_items(page_request(per_page, before, after))
        .await
        .map_err(into_status_error)?;

    let items = page
        .rows
        .into_iter()
        .map(|item| ItemResponse::new(item, state.http.currency, authorized))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ItemsResponse {
        items,
        pagination: PaginationResponse::from_cursors(req.uri(), page.cursors),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shop_app::{
        domain::items::{ItemsServiceError, MockItemsService, records::ItemRecord},
        pagination::{Cursors, Page, PageRequest},
    };

    use crate::test_helpers::{admin_items_service, items_service, make_item};

    use super::*;

    fn route() -> Router {
        Router::with_path("items").get(handler)
    }

    fn expect_only_list(
        items: &mut MockItemsService,
        request: PageRequest,
        page: Page<ItemRecord>,
    ) {
        items
            .expect_list_items()
            .once()
            .withf(move |page| *page == request)
            .return_once(move |_| Ok(page));

        items.expect_get_item().never();
        items.expect_create_item().never();
        items.expect_update_item().never();
        items.expect_delete_item().never();
    }

    #[tokio::test]
    async fn test_index_returns_empty_list_without_cursors() -> TestResult {
        let mut items = MockItemsService::new();

        expect_only_list(
            &mut items,
            PageRequest::new(0, 0, 0),
            Page {
                rows: vec![],
                cursors: Cursors::default(),
            },
        );

        let mut res = TestClient::get("http://example.com/items")
            .send(&items_service(items, route()))
            .await;

        let body: ItemsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.items.is_empty());
        assert_eq!(body.pagination, PaginationResponse::default());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_pagination_params_and_links_neighbours() -> TestResult {
        let mut items = MockItemsService::new();

        expect_only_list(
            &mut items,
            PageRequest::new(2, 0, 9),
            Page {
                rows: vec![make_item(9), make_item(8)],
                cursors: Cursors {
                    before: Some(10),
                    after: Some(7),
                },
            },
        );

        let body: ItemsResponse = TestClient::get("http://example.com/items?per_page=2&after=9")
            .send(&items_service(items, route()))
            .await
            .take_json()
            .await?;

        let ids: Vec<i64> = body.items.iter().map(|item| item.id).collect();

        assert_eq!(ids, vec![9, 8]);
        assert_eq!(body.pagination.before.as_deref(), Some("10"));
        assert_eq!(body.pagination.after.as_deref(), Some("7"));
        assert_eq!(
            body.pagination.cursor_after.as_deref(),
            Some("/items?per_page=2&after=7")
        );
        assert_eq!(
            body.pagination.cursor_before.as_deref(),
            Some("/items?per_page=2&before=10")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_hides_stock_from_anonymous_callers() -> TestResult {
        let mut items = MockItemsService::new();

        expect_only_list(
            &mut items,
            PageRequest::new(0, 0, 0),
            Page {
                rows: vec![make_item(1)],
                cursors: Cursors::default(),
            },
        );

        let body: ItemsResponse = TestClient::get("http://example.com/items")
            .send(&items_service(items, route()))
            .await
            .take_json()
            .await?;

        assert_eq!(body.items.len(), 1, "expected one item");
        assert_eq!(body.items[0].quantity, None);
        assert_eq!(body.items[0].item_sale_price, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_shows_stock_to_authenticated_callers() -> TestResult {
        let mut items = MockItemsService::new();

        expect_only_list(
            &mut items,
            PageRequest::new(0, 0, 0),
            Page {
                rows: vec![make_item(1)],
                cursors: Cursors::default(),
            },
        );

        let body: ItemsResponse = TestClient::get("http://example.com/items")
            .send(&admin_items_service(items, route()))
            .await
            .take_json()
            .await?;

        assert_eq!(body.items[0].quantity, Some(12));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_service_error_returns_500() -> TestResult {
        let mut items = MockItemsService::new();

        items
            .expect_list_items()
            .once()
            .return_once(|_| Err(ItemsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        items.expect_get_item().never();
        items.expect_create_item().never();
        items.expect_update_item().never();
        items.expect_delete_item().never();

        let res = TestClient::get("http://example.com/items")
            .send(&items_service(items, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
