/// Integration settings store
///
/// Holds the one record describing the game server, the MCSManager remote
/// API and the email relay. Values are stored as given.
use crate::{db::settings::IntegrationSettings, error::RosterResult};
use chrono::Utc;
use sqlx::SqlitePool;

/// Fixed primary key of the singleton row
const SETTINGS_ROW_ID: i64 = 1;

/// Settings manager service
#[derive(Clone)]
pub struct SettingsManager {
    db: SqlitePool,
}

impl SettingsManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Current settings, `None` until the first save
    pub async fn get(&self) -> RosterResult<Option<IntegrationSettings>> {
        let settings = sqlx::query_as::<_, IntegrationSettings>(
            r#"
            SELECT minecraft_server_ip, mcsm_api_address, mcsm_daemon_id, mcsm_instance_id,
                   mcsm_api_key, email_service_host, email_service_port,
                   email_service_username, email_service_password
            FROM settings
            WHERE id = ?
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(&self.db)
        .await?;

        Ok(settings)
    }

    /// Insert the settings row or overwrite it in place
    pub async fn save(&self, settings: &IntegrationSettings) -> RosterResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (
                id, minecraft_server_ip, mcsm_api_address, mcsm_daemon_id, mcsm_instance_id,
                mcsm_api_key, email_service_host, email_service_port,
                email_service_username, email_service_password, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                minecraft_server_ip = excluded.minecraft_server_ip,
                mcsm_api_address = excluded.mcsm_api_address,
                mcsm_daemon_id = excluded.mcsm_daemon_id,
                mcsm_instance_id = excluded.mcsm_instance_id,
                mcsm_api_key = excluded.mcsm_api_key,
                email_service_host = excluded.email_service_host,
                email_service_port = excluded.email_service_port,
                email_service_username = excluded.email_service_username,
                email_service_password = excluded.email_service_password,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .bind(&settings.minecraft_server_ip)
        .bind(&settings.mcsm_api_address)
        .bind(&settings.mcsm_daemon_id)
        .bind(&settings.mcsm_instance_id)
        .bind(&settings.mcsm_api_key)
        .bind(&settings.email_service_host)
        .bind(&settings.email_service_port)
        .bind(&settings.email_service_username)
        .bind(&settings.email_service_password)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        tracing::info!("Saved integration settings");

        Ok(())
    }
}
