//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::UserId,
    database::{amount_to_i64, try_get_amount},
    domain::{
        items::records::{ItemId, ItemRecord},
        orders::records::{
            OrderId, OrderLineDetails, OrderLineId, OrderLineRecord, OrderRecord, PreparedOrder,
        },
    },
    pagination::PageRequest,
};

const FIND_ITEMS_FOR_ORDER_SQL: &str = include_str!("sql/find_items_for_order.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const ATTACH_SESSION_SQL: &str = include_str!("sql/attach_session.sql");
const LOCK_ORDER_BY_CORRELATION_ID_SQL: &str = include_str!("sql/lock_order_by_correlation_id.sql");
const FIND_ITEM_IDS_BY_PRODUCT_REFS_SQL: &str =
    include_str!("sql/find_item_ids_by_product_refs.sql");
const COMPLETE_ORDER_SQL: &str = include_str!("sql/complete_order.sql");
const CREATE_ORDER_LINES_SQL: &str = include_str!("sql/create_order_lines.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDER_LINES_SQL: &str = include_str!("sql/list_order_lines.sql");

/// An order line about to be written during finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NewOrderLine {
    pub item_id: ItemId,
    pub price_snapshot: u64,
    pub quantity: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Batch lookup of the live items a cart refers to.
    #[tracing::instrument(name = "orders.repository.find_items", skip(self, tx), err)]
    pub(crate) async fn find_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[i64],
    ) -> Result<Vec<ItemRecord>, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(FIND_ITEMS_FOR_ORDER_SQL)
            .bind(items)
            .fetch_all(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "orders.repository.create_order",
        skip(self, tx, order),
        fields(user_id = %order.user_id, total_price = order.total_price),
        err
    )]
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &PreparedOrder,
        client_correlation_id: Uuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.user_id.into_inner())
            .bind(amount_to_i64(order.total_price, "total_price")?)
            .bind(client_correlation_id)
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "orders.repository.attach_session", skip(self, tx), err)]
    pub(crate) async fn attach_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        session_ref: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(ATTACH_SESSION_SQL)
            .bind(order.into_inner())
            .bind(session_ref)
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock the order row for the rest of the transaction.
    #[tracing::instrument(name = "orders.repository.lock_order", skip(self, tx), err)]
    pub(crate) async fn lock_order_by_correlation_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        client_correlation_id: Uuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_BY_CORRELATION_ID_SQL)
            .bind(client_correlation_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Map processor product references to local item ids. Deleted items
    /// are included: they may have been sold before they were removed.
    #[tracing::instrument(name = "orders.repository.find_item_ids", skip(self, tx), err)]
    pub(crate) async fn find_item_ids_by_product_refs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_refs: &[String],
    ) -> Result<FxHashMap<String, ItemId>, sqlx::Error> {
        let rows: Vec<(i64, String)> = query_as(FIND_ITEM_IDS_BY_PRODUCT_REFS_SQL)
            .bind(product_refs)
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, product_ref)| (product_ref, ItemId::new(id)))
            .collect())
    }

    /// Mark a pending order as paid. Returns `None` when no pending order
    /// carries the correlation id.
    #[tracing::instrument(name = "orders.repository.complete_order", skip(self, tx), err)]
    pub(crate) async fn complete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        client_correlation_id: Uuid,
        total_price: u64,
        session_ref: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(COMPLETE_ORDER_SQL)
            .bind(client_correlation_id)
            .bind(amount_to_i64(total_price, "total_price")?)
            .bind(session_ref)
            .fetch_optional(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "orders.repository.create_order_lines",
        skip(self, tx, lines),
        fields(lines = lines.len()),
        err
    )]
    pub(crate) async fn create_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
        lines: &[NewOrderLine],
    ) -> Result<Vec<OrderLineRecord>, sqlx::Error> {
        let mut item_ids = Vec::with_capacity(lines.len());
        let mut prices = Vec::with_capacity(lines.len());
        let mut quantities = Vec::with_capacity(lines.len());

        for line in lines {
            item_ids.push(line.item_id.into_inner());
            prices.push(amount_to_i64(line.price_snapshot, "price_snapshot")?);
            quantities.push(amount_to_i64(line.quantity, "quantity")?);
        }

        query_as::<Postgres, OrderLineRecord>(CREATE_ORDER_LINES_SQL)
            .bind(order.into_inner())
            .bind(item_ids)
            .bind(prices)
            .bind(quantities)
            .fetch_all(&mut **tx)
            .await
    }

    /// Subtract purchased quantities from stock in one statement; returns
    /// the number of item rows updated.
    #[tracing::instrument(
        name = "orders.repository.decrement_stock",
        skip(self, tx, lines),
        fields(lines = lines.len()),
        err
    )]
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lines: &[NewOrderLine],
    ) -> Result<u64, sqlx::Error> {
        let mut item_ids = Vec::with_capacity(lines.len());
        let mut quantities = Vec::with_capacity(lines.len());

        for line in lines {
            item_ids.push(line.item_id.into_inner());
            quantities.push(amount_to_i64(line.quantity, "quantity")?);
        }

        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(item_ids)
            .bind(quantities)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    #[tracing::instrument(
        name = "orders.repository.list_orders",
        skip(self, tx),
        fields(per_page = page.per_page(), before = page.before(), after = page.after()),
        err
    )]
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        completed_only: bool,
        page: &PageRequest,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let (lower, upper, ascending) = page.query().bounds();

        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.into_inner())
            .bind(completed_only)
            .bind(lower)
            .bind(upper)
            .bind(ascending)
            .bind(page.limit())
            .fetch_all(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "orders.repository.get_order", skip(self, tx), err)]
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        order: OrderId,
        completed_only: bool,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_inner())
            .bind(user.into_inner())
            .bind(completed_only)
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "orders.repository.list_order_lines", skip(self, tx), err)]
    pub(crate) async fn list_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<Vec<OrderLineDetails>, sqlx::Error> {
        query_as::<Postgres, OrderLineDetails>(LIST_ORDER_LINES_SQL)
            .bind(order.into_inner())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: OrderId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            total_price: try_get_amount(row, "total_price")?,
            external_session_ref: row.try_get("external_session_ref")?,
            client_correlation_id: row.try_get("client_correlation_id")?,
            completed: row.try_get("completed")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: OrderLineId::new(row.try_get("id")?),
            order_id: OrderId::new(row.try_get("order_id")?),
            item_id: ItemId::new(row.try_get("item_id")?),
            price_snapshot: try_get_amount(row, "price_snapshot")?,
            quantity: try_get_amount(row, "quantity")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLineDetails {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            item_id: ItemId::new(row.try_get("item_id")?),
            item_name: row.try_get("item_name")?,
            item_picture: row.try_get("item_picture")?,
            item_description: row.try_get("item_description")?,
            price_snapshot: try_get_amount(row, "price_snapshot")?,
            quantity: try_get_amount(row, "quantity")?,
        })
    }
}
