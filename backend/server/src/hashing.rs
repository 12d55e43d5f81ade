use std::sync::LazyLock;

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString},
};
use rand::rngs::OsRng;
use tokio::task::spawn_blocking;

use crate::error::AppError;

/// Verified against when a login names an unknown user, so that path costs the same.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_blocking("not a real password").ok());

fn hash_blocking(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid stored hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub async fn hash_password(password: String) -> Result<String, AppError> {
    spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(AppError::internal)?
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(AppError::internal)?
}

/// Always false.
pub async fn verify_unknown(password: String) -> Result<bool, AppError> {
    spawn_blocking(move || {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            verify_blocking(&password, hash)?;
        }
        Ok(false)
    })
    .await
    .map_err(AppError::internal)?
}
