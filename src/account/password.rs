/// Argon2id password hashing with a server-side pepper
use crate::error::{RosterError, RosterResult};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::Rng;

const SALT_LENGTH: usize = 16;

/// Verified in place of a real hash when the username is unknown
const DUMMY_PASSWORD: &str = "roster-admin-timing-equalizer";

/// Salted, peppered password hasher
///
/// Hashes are PHC strings (`$argon2id$v=19$...`). The pepper comes from
/// configuration and is never written to the database.
pub struct PasswordHasher {
    pepper: Vec<u8>,
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(pepper: &str) -> RosterResult<Self> {
        let mut hasher = Self {
            pepper: pepper.as_bytes().to_vec(),
            dummy_hash: String::new(),
        };
        hasher.dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(hasher)
    }

    fn argon2(&self) -> RosterResult<Argon2<'_>> {
        Argon2::new_with_secret(
            &self.pepper,
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| RosterError::PasswordHash(e.to_string()))
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> RosterResult<String> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        rand::thread_rng().fill(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| RosterError::PasswordHash(e.to_string()))?;

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| RosterError::PasswordHash(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC string (constant-time compare)
    pub fn verify(&self, password: &str, stored_hash: &str) -> RosterResult<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| RosterError::PasswordHash(e.to_string()))?;

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Spend the same work as a real verification, result discarded
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEPPER: &str = "test-pepper-for-testing-only-0123456789";

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(PEPPER).unwrap();
        let hash = hasher.hash("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new(PEPPER).unwrap();
        let first = hasher.hash("same password").unwrap();
        let second = hasher.hash("same password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same password", &first).unwrap());
        assert!(hasher.verify("same password", &second).unwrap());
    }

    #[test]
    fn test_pepper_is_required_to_verify() {
        let hasher = PasswordHasher::new(PEPPER).unwrap();
        let other = PasswordHasher::new("another-pepper-entirely-0123456789abc").unwrap();
        let hash = hasher.hash("secret123").unwrap();

        assert!(!other.verify("secret123", &hash).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let hasher = PasswordHasher::new(PEPPER).unwrap();
        assert!(hasher.verify("secret123", "plaintext-password").is_err());
    }
}
