//! Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_optional_amount},
    domain::items::{
        data::ValidatedItem,
        records::{ItemId, ItemRecord},
    },
    pagination::PageRequest,
};

const LIST_ITEMS_SQL: &str = include_str!("sql/list_items.sql");
const GET_ITEM_SQL: &str = include_str!("sql/get_item.sql");
const CREATE_ITEM_SQL: &str = include_str!("sql/create_item.sql");
const UPDATE_ITEM_SQL: &str = include_str!("sql/update_item.sql");
const DELETE_ITEM_SQL: &str = include_str!("sql/delete_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgItemsRepository;

impl PgItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fetch one page worth of live items, plus the overflow row, in the
    /// order the request's walk direction needs.
    #[tracing::instrument(
        name = "items.repository.list_items",
        skip(self, tx),
        fields(per_page = page.per_page(), before = page.before(), after = page.after()),
        err
    )]
    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        page: &PageRequest,
    ) -> Result<Vec<ItemRecord>, sqlx::Error> {
        let (lower, upper, ascending) = page.query().bounds();

        query_as::<Postgres, ItemRecord>(LIST_ITEMS_SQL)
            .bind(lower)
            .bind(upper)
            .bind(ascending)
            .bind(page.limit())
            .fetch_all(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "items.repository.get_item", skip(self, tx), err)]
    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: ItemId,
    ) -> Result<ItemRecord, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(GET_ITEM_SQL)
            .bind(item.into_inner())
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "items.repository.create_item", skip(self, tx, item), err)]
    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &ValidatedItem,
        external_product_ref: &str,
        external_price_key: &str,
    ) -> Result<ItemRecord, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(CREATE_ITEM_SQL)
            .bind(&item.name)
            .bind(item.picture.as_deref())
            .bind(amount_to_i64(item.price, "price")?)
            .bind(
                item.sale_price
                    .map(|sale_price| amount_to_i64(sale_price, "sale_price"))
                    .transpose()?,
            )
            .bind(item.description.as_deref())
            .bind(item.shippable)
            .bind(amount_to_i64(item.quantity, "quantity")?)
            .bind(external_product_ref)
            .bind(external_price_key)
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "items.repository.update_item", skip(self, tx, item), err)]
    pub(crate) async fn update_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: ItemId,
        item: &ValidatedItem,
    ) -> Result<ItemRecord, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(UPDATE_ITEM_SQL)
            .bind(id.into_inner())
            .bind(&item.name)
            .bind(item.picture.as_deref())
            .bind(amount_to_i64(item.price, "price")?)
            .bind(
                item.sale_price
                    .map(|sale_price| amount_to_i64(sale_price, "sale_price"))
                    .transpose()?,
            )
            .bind(item.description.as_deref())
            .bind(item.shippable)
            .bind(amount_to_i64(item.quantity, "quantity")?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Soft delete; returns the number of rows affected.
    #[tracing::instrument(name = "items.repository.delete_item", skip(self, tx), err)]
    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: ItemId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ITEM_SQL)
            .bind(item.into_inner())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ItemId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            picture: row.try_get("picture")?,
            price: try_get_amount(row, "price")?,
            sale_price: try_get_optional_amount(row, "sale_price")?,
            description: row.try_get("description")?,
            shippable: row.try_get("shippable")?,
            quantity: try_get_amount(row, "quantity")?,
            external_product_ref: row.try_get("external_product_ref")?,
            external_price_key: row.try_get("external_price_key")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
