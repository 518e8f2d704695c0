use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use crate::error::AppError;

/// Decides whether a submitted admin credential pair is valid.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// The single fixed admin account configured at startup.
///
/// Only an Argon2 hash of the configured password is kept in memory.
pub struct StaticAdmin {
    username: String,
    password_hash: String,
}

impl StaticAdmin {
    pub fn new(username: &str, password: &str) -> Result<Self, AppError> {
        Ok(Self {
            username: username.to_owned(),
            password_hash: hash_password(password)?,
        })
    }
}

impl Authenticator for StaticAdmin {
    fn authenticate(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        verify_password(password, &self.password_hash).unwrap_or(false)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);

    Ok(result.is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_admin_accepts_exact_pair_only() {
        let admin = StaticAdmin::new("1234", "pass@123").unwrap();

        assert!(admin.authenticate("1234", "pass@123"));
        assert!(!admin.authenticate("1234", "pass@12"));
        assert!(!admin.authenticate("12345", "pass@123"));
        assert!(!admin.authenticate("", ""));
    }
}
