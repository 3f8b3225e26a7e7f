//! Orders service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::UserId,
    database::Db,
    domain::orders::{
        assembly::{assemble, merge_session_lines},
        data::{CartRequest, PaymentConfirmation},
        errors::OrdersServiceError,
        records::{Finalization, OrderDetails, OrderId, OrderRecord, PlacedOrder, PreparedOrder},
        repository::{NewOrderLine, PgOrdersRepository},
    },
    pagination::{Page, PageRequest, paginate},
    payments::{CheckoutLine, CheckoutParams, PaymentError, PaymentGateway},
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    payments: Arc<dyn PaymentGateway>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, payments: Arc<dyn PaymentGateway>) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            payments,
        }
    }

    /// Pair every prepared line with the processor's current price for its
    /// lookup key.
    async fn checkout_lines(
        &self,
        prepared: &PreparedOrder,
    ) -> Result<Vec<CheckoutLine>, OrdersServiceError> {
        let lookup_keys = prepared
            .lines
            .iter()
            .map(|line| line.lookup_key.clone())
            .collect();

        let prices: FxHashMap<String, String> = self
            .payments
            .find_prices(lookup_keys)
            .await?
            .into_iter()
            .filter_map(|price| price.lookup_key.map(|key| (key, price.id)))
            .collect();

        prepared
            .lines
            .iter()
            .map(|line| {
                let price_ref = prices.get(&line.lookup_key).ok_or_else(|| {
                    PaymentError::UnexpectedResponse(format!(
                        "no active price for lookup key {}",
                        line.lookup_key
                    ))
                })?;

                Ok(CheckoutLine {
                    price_ref: price_ref.clone(),
                    quantity: line.quantity,
                })
            })
            .collect()
    }
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn prepare_order(&self, cart: &CartRequest) -> Result<PreparedOrder, OrdersServiceError> {
        let lines = cart.merged_lines()?;
        let ids: Vec<i64> = lines.iter().map(|(item, _)| item.into_inner()).collect();

        let mut tx = self.db.begin().await?;

        let items = self.repository.find_items(&mut tx, &ids).await?;

        tx.commit().await?;

        assemble(cart.user_id, &lines, items)
    }

    async fn place_order(&self, cart: CartRequest) -> Result<PlacedOrder, OrdersServiceError> {
        let prepared = self.prepare_order(&cart).await?;
        let client_correlation_id = Uuid::now_v7();

        // The pending order exists before the session does, so a payment
        // confirmation always finds its order.
        let mut tx = self.db.begin().await?;

        let pending = self
            .repository
            .create_order(&mut tx, &prepared, client_correlation_id)
            .await?;

        tx.commit().await?;

        let lines = self.checkout_lines(&prepared).await?;

        let session = self
            .payments
            .create_checkout_session(CheckoutParams {
                client_reference_id: client_correlation_id.to_string(),
                lines,
            })
            .await?;

        let mut tx = self.db.begin().await?;

        let order = self
            .repository
            .attach_session(&mut tx, pending.id, &session.id)
            .await?;

        tx.commit().await?;

        info!(
            order = %order.id,
            user_id = %order.user_id,
            total_price = order.total_price,
            "placed order"
        );

        Ok(PlacedOrder {
            order,
            lines: prepared.lines,
            checkout_url: session.url,
        })
    }

    async fn finalize_order(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<Finalization, OrdersServiceError> {
        let purchased = merge_session_lines(
            self.payments
                .list_session_line_items(&confirmation.session_reference)
                .await?,
        )?;

        let mut tx = self.db.begin().await?;

        let order = self
            .repository
            .lock_order_by_correlation_id(&mut tx, confirmation.client_correlation_id)
            .await?;

        if order.completed {
            info!(order = %order.id, "payment confirmation already applied");

            return Ok(Finalization::AlreadyCompleted(order));
        }

        let product_refs: Vec<String> = purchased
            .iter()
            .map(|line| line.product_ref.clone())
            .collect();

        let item_ids = self
            .repository
            .find_item_ids_by_product_refs(&mut tx, &product_refs)
            .await?;

        let lines = purchased
            .iter()
            .map(|line| {
                let Some(item_id) = item_ids.get(&line.product_ref) else {
                    warn!(product_ref = %line.product_ref, "purchased product has no item");

                    return Err(OrdersServiceError::SomeItemsDoNotExist);
                };

                Ok(NewOrderLine {
                    item_id: *item_id,
                    price_snapshot: line.unit_amount,
                    quantity: line.quantity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let order = self
            .repository
            .complete_order(
                &mut tx,
                confirmation.client_correlation_id,
                confirmation.total_price,
                &confirmation.session_reference,
            )
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let recorded = self
            .repository
            .create_order_lines(&mut tx, order.id, &lines)
            .await?;

        let updated = self.repository.decrement_stock(&mut tx, &lines).await?;

        if usize::try_from(updated).ok() != Some(lines.len()) {
            return Err(OrdersServiceError::SomeItemsDoNotExist);
        }

        tx.commit().await.map_err(OrdersServiceError::Commit)?;

        info!(
            order = %order.id,
            lines = recorded.len(),
            total_price = order.total_price,
            "finalized order"
        );

        Ok(Finalization::Completed {
            order,
            lines: recorded,
        })
    }

    async fn list_orders(
        &self,
        user: UserId,
        completed_only: bool,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self
            .repository
            .list_orders(&mut tx, user, completed_only, &page)
            .await?;

        tx.commit().await?;

        Ok(paginate(&page, rows))
    }

    async fn get_order(
        &self,
        user: UserId,
        order: OrderId,
        completed_only: bool,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self
            .repository
            .get_order(&mut tx, user, order, completed_only)
            .await?;

        let lines = self.repository.list_order_lines(&mut tx, order.id).await?;

        tx.commit().await?;

        Ok(OrderDetails { order, lines })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validate a cart and price it against the catalog without writing
    /// anything.
    async fn prepare_order(&self, cart: &CartRequest) -> Result<PreparedOrder, OrdersServiceError>;

    /// Store a pending order for the cart and open a checkout session for it.
    async fn place_order(&self, cart: CartRequest) -> Result<PlacedOrder, OrdersServiceError>;

    /// Apply a payment confirmation: complete the order, snapshot its lines
    /// and take the purchased quantities out of stock, atomically.
    async fn finalize_order(
        &self,
        confirmation: PaymentConfirmation,
    ) -> Result<Finalization, OrdersServiceError>;

    /// One page of a user's orders, newest first.
    async fn list_orders(
        &self,
        user: UserId,
        completed_only: bool,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;

    /// A single order of the user, with its lines.
    async fn get_order(
        &self,
        user: UserId,
        order: OrderId,
        completed_only: bool,
    ) -> Result<OrderDetails, OrdersServiceError>;
}
