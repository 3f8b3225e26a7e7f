use clap::Args;
use shop_app::{
    auth::{PgAuthService, UserId},
    database::{self, Db},
};

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User the token authenticates as
    #[arg(long)]
    user_id: i64,

    /// Allow catalog management with this token
    #[arg(long)]
    admin: bool,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgAuthService::new(Db::new(pool));

    let issued = service
        .issue_api_token(UserId::new(args.user_id), args.admin)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("user_id: {}", issued.record.user_id);
    println!("admin: {}", issued.record.is_admin);
    println!("token_created_at: {}", issued.record.created_at);
    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
