use clap::Args;
use shop_app::{
    auth::PgAuthService,
    database::{self, Db},
};

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Raw API token to revoke
    #[arg(long)]
    token: String,
}

pub(crate) async fn run(args: RevokeTokenArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(Db::new(pool));

    let revoked = service
        .revoke_api_token(&args.token)
        .await
        .map_err(|error| format!("failed to revoke token: {error}"))?;

    if revoked {
        println!("revoked token");
    } else {
        println!("token was not active");
    }

    Ok(())
}
