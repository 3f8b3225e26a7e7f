//! Payments Config

use clap::Args;
use rusty_money::iso::Currency;

use shop_app::{
    money::{MoneyError, find_currency},
    payments::PaymentsConfig,
};

/// Payment processor settings.
#[derive(Debug, Args)]
pub struct PaymentsSettings {
    /// Base URL of the Stripe compatible API
    #[arg(long, env = "PAYMENTS_API_BASE", default_value = "https://api.stripe.com")]
    pub api_base: String,

    /// Secret API key
    #[arg(long, env = "PAYMENTS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Secret used to sign webhook deliveries
    #[arg(long, env = "PAYMENTS_WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: String,

    /// ISO 4217 code of the shop currency
    #[arg(long, env = "PAYMENTS_CURRENCY", default_value = "EUR")]
    pub currency: String,

    /// Where the checkout page sends the buyer after paying
    #[arg(long, env = "CHECKOUT_SUCCESS_URL")]
    pub success_url: String,

    /// Where the checkout page sends the buyer after cancelling
    #[arg(long, env = "CHECKOUT_CANCEL_URL")]
    pub cancel_url: String,
}

impl PaymentsSettings {
    /// Resolve the configured currency code.
    ///
    /// # Errors
    ///
    /// Returns an error for codes missing from the ISO table.
    pub fn currency(&self) -> Result<&'static Currency, MoneyError> {
        find_currency(&self.currency)
    }

    /// Client configuration for the payment gateway.
    ///
    /// # Errors
    ///
    /// Returns an error for codes missing from the ISO table.
    pub fn client_config(&self) -> Result<PaymentsConfig, MoneyError> {
        Ok(PaymentsConfig {
            api_base: self.api_base.clone(),
            secret_key: self.secret_key.clone(),
            currency: self.currency()?,
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
        })
    }
}
