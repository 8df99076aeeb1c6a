//! Reaction-role bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p rolebot-gateway
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use rolebot_common::{
    try_init_tracing, try_init_tracing_with_config, AppConfig, AppError, TracingConfig,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Tracing comes up first so a bad config is still logged
    let tracing = match &config {
        Ok(config) => try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)),
        Err(_) => try_init_tracing(),
    };
    if let Err(e) = tracing {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        match e.downcast_ref::<AppError>() {
            Some(app) => error!(
                error = %e,
                code = app.error_code(),
                transient = app.is_transient(),
                "Bot failed"
            ),
            None => error!(error = %e, "Bot failed"),
        }
        std::process::exit(1);
    }
}

async fn run(config: Result<AppConfig, rolebot_common::ConfigError>) -> anyhow::Result<()> {
    let config = config
        .inspect_err(|e| error!(error = %e, "Failed to load configuration"))
        .map_err(AppError::from)?;

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        prefix = %config.bot.prefix,
        serialize_per_message = config.bot.serialize_per_message,
        "Configuration loaded"
    );

    rolebot_gateway::run(config).await?;
    Ok(())
}
