/// Account management system
///
/// Handles staff account registration, credential checks, banning and
/// account administration.

mod manager;
mod password;

pub use manager::AccountManager;
pub use password::PasswordHasher;

use crate::{
    db::account::Account,
    error::{RosterError, RosterResult},
};
use serde::{Deserialize, Serialize};

/// Shortest password accepted at registration or edit
pub const MIN_PASSWORD_LENGTH: usize = 6;

const MAX_USERNAME_LENGTH: usize = 64;

/// Registration request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Account edit request; every field is overwritten
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Account as shown in the user list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_banned: bool,
}

/// Result of a credential check
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Authenticated(Account),
    /// Correct password, but the account is deactivated
    Banned,
    /// Unknown username or wrong password, deliberately indistinguishable
    Rejected,
}

/// Validate the fields shared by registration and edit
pub fn validate_credentials(username: &str, email: &str, password: &str) -> RosterResult<()> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(RosterError::Validation(
            "Username, email and password are required".to_string(),
        ));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(RosterError::Validation("Username too long".to_string()));
    }

    validate_email(email)?;

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RosterError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

/// Basic `local@domain.tld` shape check
fn validate_email(email: &str) -> RosterResult<()> {
    let invalid = || RosterError::Validation("Invalid email format".to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
