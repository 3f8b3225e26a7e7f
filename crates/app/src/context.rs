//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        items::{ItemsService, PgItemsService},
        orders::{OrdersService, PgOrdersService},
    },
    payments::{PaymentGateway, PaymentsConfig, StripeClient},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub items: Arc<dyn ItemsService>,
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL and the payment
    /// processor settings.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        payments: PaymentsConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);
        let payments: Arc<dyn PaymentGateway> = Arc::new(StripeClient::new(payments));

        Ok(Self {
            items: Arc::new(PgItemsService::new(db.clone(), payments.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), payments)),
            auth: Arc::new(PgAuthService::new(db)),
        })
    }
}
