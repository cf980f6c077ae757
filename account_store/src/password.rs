//! Password hashing and verification
//!
//! Hashing uses bcrypt with the cost factor from `PASSWORD_HASH_COST`, so a
//! single call is deliberately expensive. Both hashing and verification run
//! on the blocking thread pool rather than stalling the async executor.

use std::sync::LazyLock;

use crate::config::PASSWORD_HASH_COST;
use crate::errors::AccountError;

/// A well-formed bcrypt hash with a fixed, non-registerable preimage.
///
/// Authentication verifies against this hash when the email is unknown so
/// that path performs the same bcrypt work as a password mismatch. The
/// verification result is always discarded. Store construction forces this
/// value, so the generation cost is paid at startup rather than on the
/// first unknown-email login.
pub(crate) static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    bcrypt::hash("account-store-unknown-email", *PASSWORD_HASH_COST)
        .expect("bcrypt rejects only cost factors outside 4..=31")
});

/// Hash a plaintext password with bcrypt at the configured cost
pub(crate) async fn hash_password(password: &str) -> Result<String, AccountError> {
    let password = password.to_owned();
    let cost = *PASSWORD_HASH_COST;

    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AccountError::Hash(e.to_string()))?
        .map_err(|e| AccountError::Hash(e.to_string()))
}

/// Verify a plaintext password against a stored bcrypt hash
///
/// bcrypt's comparison is constant-time with respect to the hash contents.
pub(crate) async fn verify_password(password: &str, hash: &str) -> Result<bool, AccountError> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AccountError::Hash(e.to_string()))?
        .map_err(|e| AccountError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify_round_trip() {
        let hash = hash_password("secret1").await.expect("hashing should succeed");

        assert_ne!(hash, "secret1", "Hash must not be the plaintext");
        assert!(hash.starts_with("$2"), "Hash should be a bcrypt string");

        let ok = verify_password("secret1", &hash)
            .await
            .expect("verification should succeed");
        assert!(ok, "Correct password should verify");

        let ok = verify_password("wrong", &hash)
            .await
            .expect("verification should succeed");
        assert!(!ok, "Wrong password should not verify");
    }

    /// Each hash call salts independently, so hashing the same password
    /// twice yields different strings that both verify.
    #[tokio::test]
    async fn test_hashes_are_salted() {
        let first = hash_password("secret1").await.expect("hashing should succeed");
        let second = hash_password("secret1").await.expect("hashing should succeed");

        assert_ne!(first, second);
        assert!(verify_password("secret1", &first).await.expect("verify"));
        assert!(verify_password("secret1", &second).await.expect("verify"));
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_hash() {
        let result = verify_password("secret1", "not-a-bcrypt-hash").await;
        assert!(matches!(result, Err(AccountError::Hash(_))));
    }

    #[tokio::test]
    async fn test_dummy_hash_rejects_ordinary_passwords() {
        let ok = verify_password("secret1", DUMMY_HASH.as_str())
            .await
            .expect("verification should succeed");
        assert!(!ok, "No ordinary password should match the dummy hash");
    }
}
