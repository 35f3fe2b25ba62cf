//! Password hashing capability.
//!
//! The service layer depends on the [`PasswordHasher`] trait only; the Argon2
//! implementation lives here so callers can swap in a deterministic hasher in
//! tests.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{DomainError, DomainResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One-way password hashing capability.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, plain_text: &str) -> DomainResult<String>;

    /// Verify a plain text password against a stored hash.
    fn verify(&self, plain_text: &str, hash: &str) -> bool;
}

/// Argon2-backed implementation of [`PasswordHasher`].
///
/// Every `hash` call generates a unique salt, so hashing the same password
/// twice yields different PHC strings.
#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a new hasher with default Argon2 parameters.
    pub fn new() -> Self {
        Self
    }

    /// Get Argon2 instance with default config.
    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Self::argon2()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}
