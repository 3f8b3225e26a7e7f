//! State

use std::sync::Arc;

use rusty_money::iso::Currency;
use shop_app::context::AppContext;

/// Settings the HTTP layer needs beyond the services.
#[derive(Clone)]
pub(crate) struct HttpSettings {
    /// Currency prices are displayed in.
    pub(crate) currency: &'static Currency,

    /// Secret webhook deliveries are signed with.
    pub(crate) webhook_secret: String,
}

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) http: HttpSettings,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, http: HttpSettings) -> Self {
        Self { app, http }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, http: HttpSettings) -> Arc<Self> {
        Arc::new(Self::new(app, http))
    }
}
