//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rusty_money::iso::EUR;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use shop_app::{
    auth::{MockAuthService, Principal, UserId},
    context::AppContext,
    domain::{
        items::{
            MockItemsService,
            records::{ItemId, ItemRecord},
        },
        orders::{
            MockOrdersService,
            records::{OrderId, OrderRecord},
        },
    },
};

use crate::{
    extensions::*,
    state::{HttpSettings, State},
};

pub(crate) const TEST_WEBHOOK_SECRET: &str = "whsec_test";

pub(crate) const TEST_CUSTOMER: Principal = Principal {
    user_id: UserId::new(7),
    is_admin: false,
};

pub(crate) const TEST_ADMIN: Principal = Principal {
    user_id: UserId::new(1),
    is_admin: true,
};

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(TEST_CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

fn state(items: MockItemsService, orders: MockOrdersService, auth: MockAuthService) -> Arc<State> {
    State::shared(
        AppContext {
            items: Arc::new(items),
            orders: Arc::new(orders),
            auth: Arc::new(auth),
        },
        HttpSettings {
            currency: EUR,
            webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
        },
    )
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(MockItemsService::new(), MockOrdersService::new(), auth)
}

pub(crate) fn state_with_items(items: MockItemsService) -> Arc<State> {
    state(items, MockOrdersService::new(), MockAuthService::new())
}

pub(crate) fn state_with_orders(orders: MockOrdersService) -> Arc<State> {
    state(MockItemsService::new(), orders, MockAuthService::new())
}

/// Items routes as seen by an anonymous caller.
pub(crate) fn items_service(items: MockItemsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_items(items)))
            .push(route),
    )
}

/// Items routes as seen by an admin.
pub(crate) fn admin_items_service(items: MockItemsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_items(items)))
            .hoop(inject_admin)
            .push(route),
    )
}

/// Orders routes as seen by [`TEST_CUSTOMER`].
pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_orders(orders)))
            .hoop(inject_customer)
            .push(route),
    )
}

pub(crate) fn make_item(id: i64) -> ItemRecord {
    ItemRecord {
        id: ItemId::new(id),
        name: format!("Item {id}"),
        picture: None,
        price: 1999,
        sale_price: Some(1499),
        description: Some("A fine item".to_string()),
        shippable: true,
        quantity: 12,
        external_product_ref: format!("prod_{id}"),
        external_price_key: format!("key_{id}"),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(id: i64, completed: bool) -> OrderRecord {
    OrderRecord {
        id: OrderId::new(id),
        user_id: TEST_CUSTOMER.user_id,
        total_price: 2998,
        external_session_ref: Some(format!("cs_{id}")),
        client_correlation_id: Uuid::nil(),
        completed,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
