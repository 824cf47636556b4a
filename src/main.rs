/// Roster Admin
///
/// Administrative backend for a game-server community: staff accounts,
/// integration settings for the game server and email relay, and the
/// player roster with its permission groups.

mod account;
mod api;
mod config;
mod context;
mod db;
mod error;
mod roster;
mod server;
mod settings;

use config::{LogFormat, LoggingConfig, ServerConfig};
use context::AppContext;
use error::RosterResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> RosterResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    init_tracing(&config.logging);

    tracing::info!("Roster admin v{} starting", env!("CARGO_PKG_VERSION"));

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
