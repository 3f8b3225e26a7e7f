//! Items service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::items::{
        data::{ItemData, ValidatedItem},
        errors::ItemsServiceError,
        records::{ItemId, ItemRecord},
        repository::PgItemsRepository,
    },
    pagination::{Page, PageRequest, paginate},
    payments::{PaymentGateway, PriceParams, ProductParams},
};

#[derive(Clone)]
pub struct PgItemsService {
    db: Db,
    repository: PgItemsRepository,
    payments: Arc<dyn PaymentGateway>,
}

impl PgItemsService {
    #[must_use]
    pub fn new(db: Db, payments: Arc<dyn PaymentGateway>) -> Self {
        Self {
            db,
            repository: PgItemsRepository::new(),
            payments,
        }
    }
}

impl fmt::Debug for PgItemsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgItemsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

fn product_params(item: &ValidatedItem) -> ProductParams {
    ProductParams {
        name: item.name.clone(),
        description: item.description.clone(),
    }
}

#[async_trait]
impl ItemsService for PgItemsService {
    async fn list_items(&self, page: PageRequest) -> Result<Page<ItemRecord>, ItemsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self.repository.list_items(&mut tx, &page).await?;

        tx.commit().await?;

        Ok(paginate(&page, rows))
    }

    async fn get_item(&self, item: ItemId) -> Result<ItemRecord, ItemsServiceError> {
        let mut tx = self.db.begin().await?;

        let item = self.repository.get_item(&mut tx, item).await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn create_item(&self, item: ItemData) -> Result<ItemRecord, ItemsServiceError> {
        let item = item.into_validated()?;

        let lookup_key = item
            .lookup_key
            .clone()
            .unwrap_or_else(|| Uuid::now_v7().to_string());

        let product = self.payments.create_product(product_params(&item)).await?;

        self.payments
            .create_price(PriceParams {
                product_ref: product.id.clone(),
                unit_amount: item.effective_price(),
                lookup_key: lookup_key.clone(),
                transfer_lookup_key: false,
            })
            .await?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_item(&mut tx, &item, &product.id, &lookup_key)
            .await?;

        tx.commit().await?;

        info!(item = %created.id, lookup_key = %created.external_price_key, "created item");

        Ok(created)
    }

    async fn update_item(
        &self,
        id: ItemId,
        item: ItemData,
    ) -> Result<ItemRecord, ItemsServiceError> {
        let item = item.into_validated()?;

        // No transaction is held across processor calls.
        let current = self.get_item(id).await?;

        self.payments
            .update_product(&current.external_product_ref, product_params(&item))
            .await?;

        if item.effective_price() != current.effective_price() {
            // Prices are immutable at the processor; the lookup key moves to
            // the new one and the old price is left behind.
            self.payments
                .create_price(PriceParams {
                    product_ref: current.external_product_ref.clone(),
                    unit_amount: item.effective_price(),
                    lookup_key: current.external_price_key.clone(),
                    transfer_lookup_key: true,
                })
                .await?;
        }

        let mut tx = self.db.begin().await?;

        // Deleted in the meantime: RowNotFound surfaces as NotFound.
        let updated = self.repository.update_item(&mut tx, id, &item).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ItemsServiceError> {
        let current = self.get_item(id).await?;

        self.payments
            .archive_product(&current.external_product_ref)
            .await?;

        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_item(&mut tx, id).await?;

        if rows_affected == 0 {
            return Err(ItemsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(item = %id, "deleted item");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ItemsService: Send + Sync {
    /// Retrieve one page of live catalog items, newest first.
    async fn list_items(&self, page: PageRequest) -> Result<Page<ItemRecord>, ItemsServiceError>;

    /// Retrieve a single live item.
    async fn get_item(&self, item: ItemId) -> Result<ItemRecord, ItemsServiceError>;

    /// Validate an item, register it with the payment processor and store it.
    async fn create_item(&self, item: ItemData) -> Result<ItemRecord, ItemsServiceError>;

    /// Replace an item's data. A changed effective price is published as a new
    /// processor price under the item's existing lookup key.
    async fn update_item(&self, id: ItemId, item: ItemData)
    -> Result<ItemRecord, ItemsServiceError>;

    /// Archive the item at the processor, then soft delete it.
    async fn delete_item(&self, id: ItemId) -> Result<(), ItemsServiceError>;
}
