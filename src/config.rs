/// Configuration management for the roster admin backend
use crate::error::{RosterError, RosterResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Minimum pepper length accepted by `validate`
const MIN_PEPPER_LENGTH: usize = 32;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub authentication: AuthConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Storage configuration
///
/// Accounts, integration settings and the roster live in three separate
/// SQLite files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub account_db: PathBuf,
    pub settings_db: PathBuf,
    pub player_db: PathBuf,
    pub max_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Server-side secret mixed into every password hash
    pub password_pepper: String,
    /// Account ensured at startup, if configured
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the account created on first start
#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> RosterResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("ROSTER_HOSTNAME").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_number(env::var("ROSTER_PORT").ok(), 5000, "ROSTER_PORT")?;

        let data_directory: PathBuf = env::var("ROSTER_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let account_db = env::var("ROSTER_ACCOUNT_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("users.sqlite"));
        let settings_db = env::var("ROSTER_SETTINGS_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("settings.sqlite"));
        let player_db = env::var("ROSTER_PLAYER_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("player.sqlite"));
        let max_connections = parse_number(
            env::var("ROSTER_DB_MAX_CONNECTIONS").ok(),
            10,
            "ROSTER_DB_MAX_CONNECTIONS",
        )?;

        let password_pepper = env::var("ROSTER_PASSWORD_PEPPER")
            .map_err(|_| RosterError::Validation("Password pepper required".to_string()))?;

        let bootstrap_admin = match (
            env::var("ROSTER_ADMIN_USERNAME").ok(),
            env::var("ROSTER_ADMIN_EMAIL").ok(),
            env::var("ROSTER_ADMIN_PASSWORD").ok(),
        ) {
            (Some(username), Some(email), Some(password)) => Some(BootstrapAdmin {
                username,
                email,
                password,
            }),
            (None, None, None) => None,
            _ => {
                return Err(RosterError::Validation(
                    "ROSTER_ADMIN_USERNAME, ROSTER_ADMIN_EMAIL and ROSTER_ADMIN_PASSWORD must be set together"
                        .to_string(),
                ))
            }
        };

        let log_level = env::var("RUST_LOG")
            .unwrap_or_else(|_| "roster_admin=debug,tower_http=debug".to_string());
        let log_format = match env::var("ROSTER_LOG_FORMAT")
            .unwrap_or_else(|_| "text".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            "text" => LogFormat::Text,
            other => {
                return Err(RosterError::Validation(format!(
                    "Unknown log format: {}",
                    other
                )))
            }
        };

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            storage: StorageConfig {
                data_directory,
                account_db,
                settings_db,
                player_db,
                max_connections,
            },
            authentication: AuthConfig {
                password_pepper,
                bootstrap_admin,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> RosterResult<()> {
        if self.service.hostname.is_empty() {
            return Err(RosterError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.storage.max_connections == 0 {
            return Err(RosterError::Validation(
                "Database pool needs at least one connection".to_string(),
            ));
        }

        if self.authentication.password_pepper.len() < MIN_PEPPER_LENGTH {
            return Err(RosterError::Validation(format!(
                "Password pepper must be at least {} characters",
                MIN_PEPPER_LENGTH
            )));
        }

        if let Some(admin) = &self.authentication.bootstrap_admin {
            crate::account::validate_credentials(&admin.username, &admin.email, &admin.password)?;
        }

        Ok(())
    }
}

/// Parse an optional numeric variable; unset means `default`, garbage is rejected
fn parse_number<T: FromStr>(value: Option<String>, default: T, name: &str) -> RosterResult<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| RosterError::Validation(format!("Invalid value for {}: {:?}", name, raw))),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> ServerConfig {
    ServerConfig {
        service: ServiceConfig {
            hostname: "127.0.0.1".to_string(),
            port: 5000,
        },
        storage: StorageConfig {
            data_directory: PathBuf::from("./data"),
            account_db: PathBuf::from(":memory:"),
            settings_db: PathBuf::from(":memory:"),
            player_db: PathBuf::from(":memory:"),
            max_connections: 1,
        },
        authentication: AuthConfig {
            password_pepper: "test-pepper-for-testing-only-0123456789".to_string(),
            bootstrap_admin: None,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Text,
        },
    }
}
