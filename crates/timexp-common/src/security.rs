use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Password hashing and verification for account logins using Argon2id
pub struct PasswordManager;

impl PasswordManager {
    /// Hash a password using Argon2id with secure defaults
    pub fn hash_password(password: &SecretString) -> Result<String> {
        let password_bytes = password.expose_secret().as_bytes();
        if password_bytes.is_empty() {
            return Err(Error::InvalidInput("Password must not be empty".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password_bytes, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a stored hash
    pub fn verify_password(password: &SecretString, hash: &str) -> Result<bool> {
        let password_bytes = password.expose_secret().as_bytes();
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| Error::Auth(format!("Stored password hash is invalid: {}", e)))?;

        match Argon2::default().verify_password(password_bytes, &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Auth(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = SecretString::from("test_password_123".to_string());
        let hash = PasswordManager::hash_password(&password).unwrap();

        assert!(PasswordManager::verify_password(&password, &hash).unwrap());

        let wrong_password = SecretString::from("wrong_password".to_string());
        assert!(!PasswordManager::verify_password(&wrong_password, &hash).unwrap());
    }

    #[test]
    fn test_empty_password_rejected() {
        let password = SecretString::from(String::new());
        assert!(matches!(PasswordManager::hash_password(&password), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let password = SecretString::from("pw".to_string());
        assert!(PasswordManager::verify_password(&password, "not-a-hash").is_err());
    }
}
