//! Test context for service-level integration tests.

use std::sync::Arc;

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{items::PgItemsService, orders::PgOrdersService},
    payments::MockPaymentGateway,
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub items: PgItemsService,
    pub orders: PgOrdersService,
    pub auth: PgAuthService,
}

impl TestContext {
    /// Fresh database plus services sharing one mocked payment gateway.
    pub async fn new(payments: MockPaymentGateway) -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());
        let payments = Arc::new(payments);

        Self {
            items: PgItemsService::new(db.clone(), payments.clone()),
            orders: PgOrdersService::new(db.clone(), payments),
            auth: PgAuthService::new(db),
            db: test_db,
        }
    }
}
