use chrono::Duration;
use clap::Args;
use serde_json::json;

use crate::auth::mint_token;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "Token subject (sub claim)")]
    pub sub: String,

    #[arg(long = "scope", help = "Permission to grant; repeat for several")]
    pub scopes: Vec<String>,

    #[arg(long, default_value_t = 60, help = "Lifetime in minutes")]
    pub ttl_minutes: i64,
}

pub fn handle(args: TokenArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let expires_in = Duration::minutes(args.ttl_minutes);
    let token = mint_token(&config.auth, &args.sub, args.scopes.clone(), expires_in)?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "token": token,
                "sub": args.sub,
                "permissions": args.scopes,
                "expires_in": expires_in.num_seconds(),
            })
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
