/// Integration settings database model
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single integration settings record
///
/// Column names are snake_case; the JSON names match what the admin
/// frontend already sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    #[serde(rename = "minecraftServerIP")]
    pub minecraft_server_ip: String,
    #[serde(rename = "mcsmApiAddress")]
    pub mcsm_api_address: String,
    #[serde(rename = "mcsmDaemonId")]
    pub mcsm_daemon_id: String,
    #[serde(rename = "mcsmInstanceId")]
    pub mcsm_instance_id: String,
    #[serde(rename = "mcsmApikey")]
    pub mcsm_api_key: String,
    #[serde(rename = "emailServiceHost")]
    pub email_service_host: String,
    #[serde(rename = "emailServicePort")]
    pub email_service_port: String,
    #[serde(rename = "emailServiceUsername")]
    pub email_service_username: String,
    #[serde(rename = "emailServicePassword")]
    pub email_service_password: String,
}
