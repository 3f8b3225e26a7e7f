//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{
        ApiTokenRecord, AuthServiceError, IssuedApiToken, Principal, UserId, generate_api_token,
        hash_api_token, repository::PgAuthRepository,
    },
    database::Db,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }

    /// Issue a new API token for a user. The raw token is only available in
    /// the returned value.
    ///
    /// # Errors
    ///
    /// Returns an error if the user id is not positive or the insert fails.
    pub async fn issue_api_token(
        &self,
        user_id: UserId,
        is_admin: bool,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        if !user_id.is_valid() {
            return Err(AuthServiceError::InvalidUserId);
        }

        let token = generate_api_token();

        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .create_api_token(&mut tx, &hash_api_token(&token), user_id, is_admin)
            .await?;

        tx.commit().await?;

        info!(user_id = %record.user_id, is_admin, "issued api token");

        Ok(IssuedApiToken { token, record })
    }

    /// List every token of a user, revoked ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ApiTokenRecord>, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let tokens = self
            .repository
            .list_api_tokens_by_user(&mut tx, user_id)
            .await?;

        tx.commit().await?;

        Ok(tokens)
    }

    /// Revoke a raw token. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token: &str) -> Result<bool, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let revoked = self
            .repository
            .revoke_api_token(&mut tx, &hash_api_token(token))
            .await?;

        tx.commit().await?;

        if let Some(record) = &revoked {
            info!(user_id = %record.user_id, token = record.id, "revoked api token");
        }

        Ok(revoked.is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        if bearer_token.is_empty() {
            return Err(AuthServiceError::NotFound);
        }

        let mut tx = self.db.begin().await?;

        let principal = self
            .repository
            .find_principal_by_token_hash(&mut tx, &hash_api_token(bearer_token))
            .await?;

        tx.commit().await?;

        principal.ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the caller it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;
    use testresult::TestResult;

    use crate::{payments::MockPaymentGateway, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn issuing_for_a_non_positive_user_is_rejected() -> TestResult {
        let pool = PgPoolOptions::new().connect_lazy("postgres://offline.invalid/shop")?;
        let service = PgAuthService::new(Db::new(pool));

        let result = service.issue_api_token(UserId::new(0), false).await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidUserId)),
            "expected InvalidUserId, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn empty_bearer_tokens_are_rejected_without_storage() -> TestResult {
        let pool = PgPoolOptions::new().connect_lazy("postgres://offline.invalid/shop")?;
        let service = PgAuthService::new(Db::new(pool));

        let result = service.authenticate_bearer("").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn issued_tokens_authenticate_until_revoked() -> TestResult {
        let ctx = TestContext::new(MockPaymentGateway::new()).await;

        let issued = ctx.auth.issue_api_token(UserId::new(7), true).await?;

        let principal = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(
            principal,
            Principal {
                user_id: UserId::new(7),
                is_admin: true,
            }
        );

        assert!(ctx.auth.revoke_api_token(&issued.token).await?);
        assert!(!ctx.auth.revoke_api_token(&issued.token).await?);

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let tokens = ctx.auth.list_api_tokens(UserId::new(7)).await?;

        assert_eq!(tokens.len(), 1);
        assert!(tokens.iter().all(|token| token.revoked_at.is_some()));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_tokens_are_not_found() {
        let ctx = TestContext::new(MockPaymentGateway::new()).await;

        let result = ctx.auth.authenticate_bearer("shop_unknown").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
