//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use shop_app::auth::Principal;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_principal(&mut self, principal: Principal);

    /// The authenticated caller, if the request carried a valid token.
    fn principal(&self) -> Option<Principal>;

    fn principal_or_401(&self) -> Result<Principal, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal(&self) -> Option<Principal> {
        self.obtain::<Principal>().ok().copied()
    }

    fn principal_or_401(&self) -> Result<Principal, StatusError> {
        self.principal()
            .ok_or_else(|| StatusError::unauthorized().brief("Missing or invalid API token"))
    }
}
