//! Per-test PostgreSQL databases.
//!
//! One container is started for the whole test binary. Every [`TestDb`] gets
//! its own freshly migrated database inside it, so service tests commit
//! normally and still never see each other's rows. Databases are dropped in
//! the background once their `TestDb` goes away.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

const USER: &str = "shop_test";
const PASSWORD: &str = "shop_test_password";
const DATABASE_PREFIX: &str = "shop_service_test_";

static CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static DROPPER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

/// Database names are interpolated into DDL, so only names this module
/// generates are accepted.
fn is_generated_name(name: &str) -> bool {
    name.len() <= 63
        && name.starts_with(DATABASE_PREFIX)
        && name
            .bytes()
            .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'_')
}

fn generate_name() -> String {
    format!("{DATABASE_PREFIX}{}", Uuid::now_v7().simple())
}

async fn container() -> &'static ContainerAsync<PostgresImage> {
    CONTAINER
        .get_or_init(|| async {
            PostgresImage::default()
                .with_user(USER)
                .with_password(PASSWORD)
                .with_db_name("shop_test")
                .start()
                .await
                .expect("Failed to start PostgreSQL container")
        })
        .await
}

async fn server_url(database: &str) -> String {
    let port = container()
        .await
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}")
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    if !is_generated_name(name) {
        return Ok(());
    }

    let mut conn = PgConnection::connect(&server_url("postgres").await).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\""))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

fn dropper() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("Failed to drop test database '{name}': {error}");
            }
        }
    });

    sender
}

/// A migrated database owned by one test.
#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        DROPPER.get_or_init(|| async { dropper() }).await;

        let name = generate_name();

        let mut admin = PgConnection::connect(&server_url("postgres").await)
            .await
            .expect("Failed to connect to the maintenance database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("Failed to create test database");

        admin
            .close()
            .await
            .expect("Failed to close maintenance connection");

        let pool = PgPool::connect(&server_url(&name).await)
            .await
            .expect("Failed to connect to test database");

        crate::database::migrate(&pool)
            .await
            .expect("Failed to migrate test database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool and drop the database now instead of in the
    /// background.
    pub async fn cleanup(self) -> Result<(), sqlx::Error> {
        self.pool.close().await;

        drop_database(&self.name).await
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = DROPPER.get() {
            let _queued = sender.send(self.name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn generated_names_are_accepted() {
        let name = generate_name();

        assert!(is_generated_name(&name), "{name} should be accepted");
        assert_ne!(generate_name(), name);
    }

    #[test]
    fn foreign_names_are_refused() {
        for name in [
            "postgres",
            "shop_test",
            "shop_service_test_x\"; DROP TABLE items; --",
            "shop_service_test_UPPER",
            &format!("{DATABASE_PREFIX}{}", "a".repeat(64)),
        ] {
            assert!(!is_generated_name(name), "{name} should be refused");
        }
    }

    #[tokio::test]
    async fn new_databases_are_migrated() -> TestResult {
        let test_db = TestDb::new().await;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_name IN ('items', 'orders', 'order_lines', 'api_tokens')",
        )
        .fetch_one(test_db.pool())
        .await?;

        assert_eq!(tables, 4);

        Ok(())
    }

    #[tokio::test]
    async fn databases_are_isolated_from_each_other() -> TestResult {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        sqlx::query("INSERT INTO api_tokens (user_id, token_hash) VALUES (1, 'abc')")
            .execute(first.pool())
            .await?;

        let visible: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens")
            .fetch_one(second.pool())
            .await?;

        assert_eq!(visible, 0);

        Ok(())
    }

    #[tokio::test]
    async fn cleanup_drops_the_database() -> TestResult {
        let test_db = TestDb::new().await;
        let name = test_db.name.clone();

        test_db.cleanup().await?;

        let mut admin = PgConnection::connect(&server_url("postgres").await).await?;

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pg_database WHERE datname = $1")
                .bind(&name)
                .fetch_one(&mut admin)
                .await?;

        assert_eq!(remaining, 0);

        Ok(())
    }
}
