/// Database layer
///
/// Manages connection pools and embedded migrations for the three SQLite
/// files: accounts, integration settings and the player roster.

pub mod account;
pub mod player;
pub mod settings;

use crate::error::{RosterError, RosterResult};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;

static ACCOUNT_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/accounts");
static SETTINGS_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/settings");
static PLAYER_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/players");

/// The independent database files backing the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Database {
    Accounts,
    Settings,
    Players,
}

impl Database {
    fn migrator(self) -> &'static Migrator {
        match self {
            Database::Accounts => &ACCOUNT_MIGRATIONS,
            Database::Settings => &SETTINGS_MIGRATIONS,
            Database::Players => &PLAYER_MIGRATIONS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Database::Accounts => "accounts",
            Database::Settings => "settings",
            Database::Players => "players",
        }
    }
}

/// Database connection options
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub max_connections: u32,
    pub enable_wal: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            enable_wal: true,
        }
    }
}

/// Create a SQLite connection pool
pub async fn create_pool(path: &Path, options: DatabaseOptions) -> RosterResult<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let connect_options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(if options.enable_wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        })
        .busy_timeout(std::time::Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .connect_with(connect_options)
        .await?;

    Ok(pool)
}

/// Create a pool, apply its migrations and check it answers
pub async fn open(
    database: Database,
    path: &Path,
    options: DatabaseOptions,
) -> RosterResult<SqlitePool> {
    let pool = create_pool(path, options).await?;
    run_migrations(database, &pool).await?;
    test_connection(&pool).await?;

    tracing::info!("Opened {} database at {}", database.as_str(), path.display());

    Ok(pool)
}

/// Run the embedded migrations for a database
pub async fn run_migrations(database: Database, pool: &SqlitePool) -> RosterResult<()> {
    database.migrator().run(pool).await.map_err(|e| {
        tracing::error!("Migration of {} database failed: {}", database.as_str(), e);
        RosterError::Migration(e)
    })?;

    Ok(())
}

/// Test database connection
pub async fn test_connection(pool: &SqlitePool) -> RosterResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// In-memory pool with migrations applied
///
/// Pinned to one connection, since every SQLite `:memory:` connection is
/// its own database.
#[cfg(test)]
pub(crate) async fn memory_pool(database: Database) -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(database, &pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_file_and_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("player.sqlite");

        let pool = open(Database::Players, &path, DatabaseOptions::default())
            .await
            .unwrap();

        assert!(path.exists());
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.sqlite");

        let pool = open(Database::Accounts, &path, DatabaseOptions::default())
            .await
            .unwrap();
        run_migrations(Database::Accounts, &pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_settings_table_rejects_second_row() {
        let pool = memory_pool(Database::Settings).await;

        const INSERT: &str =
            "INSERT INTO settings (id, minecraft_server_ip, mcsm_api_address, mcsm_daemon_id,
                mcsm_instance_id, mcsm_api_key, email_service_host, email_service_port,
                email_service_username, email_service_password, updated_at)
             VALUES (?1, '', '', '', '', '', '', '', '', '', '2024-01-01T00:00:00Z')";

        sqlx::query(INSERT).bind(1_i64).execute(&pool).await.unwrap();
        assert!(sqlx::query(INSERT).bind(2_i64).execute(&pool).await.is_err());
    }
}
