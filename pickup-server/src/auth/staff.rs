//! Staff credential verification
//!
//! The walk-up deployment has a single staff account configured through the
//! environment. The password is argon2-hashed at startup; the plaintext is
//! never kept in state.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use shared::error::{AppError, AppResult};

pub struct StaffDirectory {
    username: String,
    password_hash: String,
}

impl StaffDirectory {
    pub fn new(username: impl Into<String>, password: &str) -> AppResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Failed to hash staff password: {e}")))?
            .to_string();
        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    /// Verify credentials, returning the staff user id on success.
    ///
    /// Wrong username and wrong password produce the same error.
    pub fn verify(&self, username: &str, password: &str) -> AppResult<String> {
        if username != self.username {
            return Err(AppError::invalid_credentials());
        }
        let parsed = PasswordHash::new(&self.password_hash)
            .map_err(|e| AppError::internal(format!("Corrupt staff password hash: {e}")))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AppError::invalid_credentials())?;
        Ok(self.username.clone())
    }
}
