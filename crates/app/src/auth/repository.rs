//! Auth repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::auth::models::{ApiTokenRecord, Principal, UserId};

const FIND_PRINCIPAL_BY_TOKEN_HASH_SQL: &str =
    include_str!("sql/find_principal_by_token_hash.sql");
const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const LIST_API_TOKENS_BY_USER_SQL: &str = include_str!("sql/list_api_tokens_by_user.sql");
const REVOKE_API_TOKEN_SQL: &str = include_str!("sql/revoke_api_token.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAuthRepository;

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(name = "auth.repository.find_principal", skip_all, err)]
    pub(crate) async fn find_principal_by_token_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
    ) -> Result<Option<Principal>, sqlx::Error> {
        query_as::<Postgres, Principal>(FIND_PRINCIPAL_BY_TOKEN_HASH_SQL)
            .bind(token_hash)
            .fetch_optional(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "auth.repository.create_api_token",
        skip(self, tx, token_hash),
        err
    )]
    pub(crate) async fn create_api_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
        user_id: UserId,
        is_admin: bool,
    ) -> Result<ApiTokenRecord, sqlx::Error> {
        query_as::<Postgres, ApiTokenRecord>(CREATE_API_TOKEN_SQL)
            .bind(token_hash)
            .bind(user_id.into_inner())
            .bind(is_admin)
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(name = "auth.repository.list_api_tokens", skip(self, tx), err)]
    pub(crate) async fn list_api_tokens_by_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
    ) -> Result<Vec<ApiTokenRecord>, sqlx::Error> {
        query_as::<Postgres, ApiTokenRecord>(LIST_API_TOKENS_BY_USER_SQL)
            .bind(user_id.into_inner())
            .fetch_all(&mut **tx)
            .await
    }

    /// Revoke an active token. Returns `None` when no active token matches.
    #[tracing::instrument(name = "auth.repository.revoke_api_token", skip_all, err)]
    pub(crate) async fn revoke_api_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
    ) -> Result<Option<ApiTokenRecord>, sqlx::Error> {
        query_as::<Postgres, ApiTokenRecord>(REVOKE_API_TOKEN_SQL)
            .bind(token_hash)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Principal {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_id: UserId::new(row.try_get("user_id")?),
            is_admin: row.try_get("is_admin")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ApiTokenRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: UserId::new(row.try_get("user_id")?),
            is_admin: row.try_get("is_admin")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            revoked_at: row
                .try_get::<Option<SqlxTimestamp>, _>("revoked_at")?
                .map(|timestamp| timestamp.to_jiff()),
        })
    }
}
