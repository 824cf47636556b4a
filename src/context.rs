/// Application context and dependency injection
use crate::{
    account::AccountManager,
    config::ServerConfig,
    db::{self, Database, DatabaseOptions},
    error::RosterResult,
    roster::RosterManager,
    settings::SettingsManager,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub account_manager: Arc<AccountManager>,
    pub settings_manager: Arc<SettingsManager>,
    pub roster_manager: Arc<RosterManager>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> RosterResult<Self> {
        // Validate configuration
        config.validate()?;

        // Create data directory if it doesn't exist
        if !config.storage.data_directory.exists() {
            tokio::fs::create_dir_all(&config.storage.data_directory).await?;
        }

        let options = DatabaseOptions {
            max_connections: config.storage.max_connections,
            ..DatabaseOptions::default()
        };

        let account_db = db::open(Database::Accounts, &config.storage.account_db, options.clone()).await?;
        let settings_db =
            db::open(Database::Settings, &config.storage.settings_db, options.clone()).await?;
        let player_db = db::open(Database::Players, &config.storage.player_db, options).await?;

        let ctx = Self::from_pools(config, account_db, settings_db, player_db)?;

        if let Some(admin) = &ctx.config.authentication.bootstrap_admin {
            ctx.account_manager.ensure_bootstrap_admin(admin).await?;
        }

        Ok(ctx)
    }

    /// Wire the services onto already-migrated pools
    pub fn from_pools(
        config: ServerConfig,
        account_db: SqlitePool,
        settings_db: SqlitePool,
        player_db: SqlitePool,
    ) -> RosterResult<Self> {
        let account_manager = Arc::new(AccountManager::new(
            account_db,
            &config.authentication.password_pepper,
        )?);
        let settings_manager = Arc::new(SettingsManager::new(settings_db));
        let roster_manager = Arc::new(RosterManager::new(player_db));

        Ok(Self {
            config: Arc::new(config),
            account_manager,
            settings_manager,
            roster_manager,
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!(
            "{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}

#[cfg(test)]
pub(crate) async fn test_context() -> AppContext {
    AppContext::from_pools(
        crate::config::test_config(),
        db::memory_pool(Database::Accounts).await,
        db::memory_pool(Database::Settings).await,
        db::memory_pool(Database::Players).await,
    )
    .unwrap()
}
