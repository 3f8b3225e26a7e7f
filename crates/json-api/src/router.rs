//! App Router

use salvo::Router;

use crate::{auth::middleware, healthcheck, items, orders, webhooks};

/// Every API route with its auth guard. Catalog reads and writes share a
/// path but not a guard, so they live in sibling routers.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("items")
                .hoop(middleware::optional)
                .get(items::index::handler)
                .push(Router::with_path("{item}").get(items::get::handler)),
        )
        .push(
            Router::with_path("items")
                .hoop(middleware::admin)
                .post(items::create::handler)
                .push(
                    Router::with_path("{item}")
                        .put(items::update::handler)
                        .delete(items::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .hoop(middleware::required)
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(Router::with_path("webhooks/payments").post(webhooks::payments::handler))
}
