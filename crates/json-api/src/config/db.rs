//! Database Config

use clap::Args;

#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string holding the shop schema
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}
