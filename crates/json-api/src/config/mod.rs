//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig, logging::LoggingConfig, payments::PaymentsSettings,
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod logging;
pub(crate) mod payments;
pub(crate) mod server;

/// Shop JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "shop-json", about = "Shop JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Payment processor settings.
    #[command(flatten)]
    pub payments: PaymentsSettings,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 9] = [
        "shop-json",
        "--database-url",
        "postgres://localhost/shop",
        "--secret-key",
        "sk_test",
        "--webhook-secret",
        "whsec_test",
        "--success-url",
        "https://shop.test/paid",
    ];

    #[test]
    fn parses_flattened_groups_with_defaults() -> TestResult {
        let config = ServerConfig::try_parse_from(
            REQUIRED
                .iter()
                .copied()
                .chain(["--cancel-url", "https://shop.test/cancelled"]),
        )?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.server.shutdown_grace().as_secs(), 30);
        assert_eq!(config.payments.api_base, "https://api.stripe.com");
        assert_eq!(config.payments.currency()?.iso_alpha_code, "EUR");

        Ok(())
    }

    #[test]
    fn unknown_currencies_are_rejected() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED.iter().copied().chain([
            "--cancel-url",
            "https://shop.test/cancelled",
            "--currency",
            "XXY",
        ]))?;

        assert!(config.payments.client_config().is_err());

        Ok(())
    }
}
