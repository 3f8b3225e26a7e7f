//! Test Helpers

use sqlx::{Postgres, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    domain::{
        items::{
            data::ItemData,
            records::{ItemId, ItemRecord},
        },
        orders::records::OrderId,
    },
    test::TestContext,
};

pub(crate) fn item_data(name: &str, price: i64, quantity: i64) -> ItemData {
    ItemData {
        name: name.to_string(),
        price,
        quantity,
        shippable: true,
        ..ItemData::default()
    }
}

/// Insert a catalog item directly, bypassing the payment processor. The
/// product reference is `prod_{name}`.
pub(crate) async fn seed_item(
    ctx: &TestContext,
    name: &str,
    price: i64,
    sale_price: Option<i64>,
    quantity: i64,
) -> Result<ItemRecord, sqlx::Error> {
    query_as::<Postgres, ItemRecord>(
        "INSERT INTO items (name, price, sale_price, shippable, quantity, \
         external_product_ref, external_price_key) \
         VALUES ($1, $2, $3, TRUE, $4, $5, $6) RETURNING *",
    )
    .bind(name)
    .bind(price)
    .bind(sale_price)
    .bind(quantity)
    .bind(format!("prod_{name}"))
    .bind(Uuid::now_v7().to_string())
    .fetch_one(ctx.db.pool())
    .await
}

pub(crate) async fn stock_of(ctx: &TestContext, item: ItemId) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT quantity FROM items WHERE id = $1")
        .bind(item.into_inner())
        .fetch_one(ctx.db.pool())
        .await
}

pub(crate) async fn count_order_lines(
    ctx: &TestContext,
    order: OrderId,
) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COUNT(*) FROM order_lines WHERE order_id = $1")
        .bind(order.into_inner())
        .fetch_one(ctx.db.pool())
        .await
}
