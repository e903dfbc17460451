use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// PHC-encoded argon2 hash with a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            anyhow!("password hashing failed: {e}")
        })
}

/// `Ok(false)` on a mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let phc = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        anyhow!("malformed password hash: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &phc)
        .is_ok())
}

/// Runs the hash on the blocking pool so request tasks keep making progress.
pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain)).await?
}

pub async fn verify_password_blocking(plain: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_password_is_stored_as_argon2() {
        let stored = hash_password("secret1").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("secret1"));
        assert!(verify_password("secret1", &stored).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret1", &b).unwrap());
    }

    #[test]
    fn near_misses_do_not_verify() {
        let stored = hash_password("secret1").unwrap();
        for attempt in ["Secret1", "secret1 ", "secret", ""] {
            assert!(!verify_password(attempt, &stored).unwrap(), "{attempt:?}");
        }
    }

    #[test]
    fn unreadable_stored_hash_is_an_error() {
        assert!(verify_password("secret1", "").is_err());
        assert!(verify_password("secret1", "plaintext-secret1").is_err());
    }

    #[tokio::test]
    async fn blocking_wrappers_agree_with_sync_versions() {
        let stored = hash_password_blocking("admin-pass".into()).await.unwrap();
        assert!(verify_password_blocking("admin-pass".into(), stored.clone()).await.unwrap());
        assert!(!verify_password_blocking("secret1".into(), stored).await.unwrap());
    }
}
