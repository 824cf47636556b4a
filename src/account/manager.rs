/// Account manager implementation using runtime queries
use crate::{
    account::{validate_credentials, AccountSummary, AuthOutcome, PasswordHasher},
    config::BootstrapAdmin,
    db::account::{Account, AccountRow},
    error::{RosterError, RosterResult},
};
use chrono::Utc;
use sqlx::SqlitePool;

const DUPLICATE_ACCOUNT: &str = "Username or email already exists";

/// Account manager service
pub struct AccountManager {
    db: SqlitePool,
    hasher: PasswordHasher,
}

impl AccountManager {
    /// Create a new account manager
    pub fn new(db: SqlitePool, password_pepper: &str) -> RosterResult<Self> {
        Ok(Self {
            db,
            hasher: PasswordHasher::new(password_pepper)?,
        })
    }

    /// Register a new, active account
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> RosterResult<Account> {
        validate_credentials(username, email, password)?;

        let password_hash = self.hasher.hash(password)?;

        // One autocommit statement; the UNIQUE constraints decide concurrent races
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(true)
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(|e| RosterError::from_insert(e, DUPLICATE_ACCOUNT))
        .inspect_err(|e| {
            if matches!(e, RosterError::Conflict(_)) {
                tracing::warn!("Registration rejected, {} or {} already taken", username, email);
            }
        })?;

        let id = result.last_insert_rowid();
        tracing::info!("Registered account {} ({})", id, username);

        Ok(Account {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            is_active: true,
            created_at: now,
        })
    }

    /// Check a username/password pair
    pub async fn verify(&self, username: &str, password: &str) -> RosterResult<AuthOutcome> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password_hash, is_active, created_at
             FROM users
             WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        let Some(account) = account else {
            self.hasher.verify_dummy(password);
            return Ok(AuthOutcome::Rejected);
        };

        if !self.hasher.verify(password, &account.password_hash)? {
            return Ok(AuthOutcome::Rejected);
        }

        if !account.is_active {
            return Ok(AuthOutcome::Banned);
        }

        Ok(AuthOutcome::Authenticated(account))
    }

    /// Ban (`false`) or unban (`true`) an account; unknown ids are a no-op
    pub async fn set_active(&self, id: i64, active: bool) -> RosterResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = ?1 WHERE id = ?2")
            .bind(active)
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!(
            "Set account {} active={} ({} row(s))",
            id,
            active,
            result.rows_affected()
        );

        Ok(())
    }

    /// Overwrite username, email and password of an account
    ///
    /// The new username and email must not belong to another account.
    /// Unknown ids are a no-op.
    pub async fn edit(
        &self,
        id: i64,
        username: &str,
        email: &str,
        password: &str,
    ) -> RosterResult<()> {
        validate_credentials(username, email, password)?;

        let password_hash = self.hasher.hash(password)?;

        let result = sqlx::query(
            "UPDATE users SET username = ?1, email = ?2, password_hash = ?3 WHERE id = ?4",
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(|e| RosterError::from_insert(e, DUPLICATE_ACCOUNT))
        .inspect_err(|e| {
            if matches!(e, RosterError::Conflict(_)) {
                tracing::warn!("Edit of account {} collides with another account", id);
            }
        })?;

        tracing::info!("Edited account {} ({} row(s))", id, result.rows_affected());

        Ok(())
    }

    /// List all accounts ordered by id
    pub async fn list(&self) -> RosterResult<Vec<AccountSummary>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, email, is_active FROM users ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AccountSummary {
                id: row.id,
                username: row.username,
                email: row.email,
                is_banned: !row.is_active,
            })
            .collect())
    }

    /// Delete an account; unknown ids are a no-op
    pub async fn delete(&self, id: i64) -> RosterResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!("Deleted account {} ({} row(s))", id, result.rows_affected());

        Ok(())
    }

    /// Create the configured bootstrap admin unless the username exists
    pub async fn ensure_bootstrap_admin(&self, admin: &BootstrapAdmin) -> RosterResult<()> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?1")
            .bind(&admin.username)
            .fetch_optional(&self.db)
            .await?;

        if exists.is_some() {
            tracing::info!("Bootstrap admin {} already exists", admin.username);
            return Ok(());
        }

        match self
            .register(&admin.username, &admin.email, &admin.password)
            .await
        {
            Ok(account) => {
                tracing::info!("Created bootstrap admin {} ({})", account.username, account.id);
                Ok(())
            }
            Err(RosterError::Conflict(_)) => {
                tracing::warn!(
                    "Bootstrap admin email {} belongs to another account, skipping",
                    admin.email
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
