//! Auth middleware.
//!
//! Three guards share one bearer token check:
//!
//! - [`optional`] records the caller when a valid token is present and lets
//!   anonymous requests through;
//! - [`required`] rejects requests without a valid token with 401;
//! - [`admin`] additionally rejects non-admin callers with 403.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use shop_app::auth::{AuthServiceError, Principal};

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn optional(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.headers().contains_key(AUTHORIZATION) {
        match authenticate(req, depot).await {
            Ok(principal) => depot.insert_principal(principal),
            Err(status) => {
                res.render(status);
                ctrl.skip_rest();

                return;
            }
        }
    }

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn required(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match authenticate(req, depot).await {
        Ok(principal) => depot.insert_principal(principal),
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let principal = match authenticate(req, depot).await {
        Ok(principal) => principal,
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    if !principal.is_admin {
        res.render(StatusError::forbidden().brief("Admin token required"));
        ctrl.skip_rest();

        return;
    }

    depot.insert_principal(principal);

    ctrl.call_next(req, depot, res).await;
}

async fn authenticate(req: &Request, depot: &Depot) -> Result<Principal, StatusError> {
    let Some(token) = extract_bearer_token(req) else {
        return Err(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
    };

    let state = depot.obtain_or_500::<Arc<State>>()?;

    match state.app.auth.authenticate_bearer(token).await {
        Ok(principal) => Ok(principal),
        Err(AuthServiceError::NotFound | AuthServiceError::InvalidUserId) => {
            Err(StatusError::unauthorized().brief("Invalid API token"))
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate api token: {source}");

            Err(StatusError::internal_server_error())
        }
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shop_app::auth::{MockAuthService, UserId};

    use crate::test_helpers::state_with_auth;

    use super::*;

    #[salvo::handler]
    async fn echo_principal(depot: &mut Depot, res: &mut Response) {
        let principal = depot.principal().map_or_else(
            || "anonymous".to_string(),
            |principal| format!("{}:{}", principal.user_id, principal.is_admin),
        );

        res.render(principal);
    }

    fn make_service(auth: MockAuthService, guard: impl Handler) -> Service {
        let router = Router::new()
            .hoop(salvo::affix_state::inject(state_with_auth(auth)))
            .hoop(guard)
            .push(Router::new().get(echo_principal));

        Service::new(router)
    }

    fn accepting(user: i64, is_admin: bool) -> MockAuthService {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(move |_| {
                Ok(Principal {
                    user_id: UserId::new(user),
                    is_admin,
                })
            });

        auth
    }

    fn never_called() -> MockAuthService {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        auth
    }

    #[tokio::test]
    async fn test_required_missing_authorization_header_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&make_service(never_called(), required))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_required_non_bearer_authorization_header_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(never_called(), required))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_required_invalid_token_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(auth, required))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_required_storage_error_returns_500() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(auth, required))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn test_required_valid_token_injects_principal() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(accepting(7, false), required))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "7:false");

        Ok(())
    }

    #[tokio::test]
    async fn test_optional_without_header_is_anonymous() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .send(&make_service(never_called(), optional))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "anonymous");

        Ok(())
    }

    #[tokio::test]
    async fn test_optional_with_valid_token_injects_principal() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(accepting(3, true), optional))
            .await;

        assert_eq!(res.take_string().await?, "3:true");

        Ok(())
    }

    #[tokio::test]
    async fn test_optional_with_invalid_token_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(auth, optional))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_rejects_non_admin_tokens_with_403() -> TestResult {
        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(accepting(7, false), admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_accepts_admin_tokens() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(accepting(1, true), admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "1:true");

        Ok(())
    }
}
