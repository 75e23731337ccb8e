use anyhow::{Result, anyhow};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// Hash a password with Argon2id into a PHC-format digest for storage.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?
        .to_string();
    Ok(digest)
}

/// Verify a password against a stored digest. A malformed digest verifies as
/// false rather than erroring, keeping the outcome indistinguishable from a
/// plain mismatch.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_round_trip() {
        let digest = hash_password("password123").unwrap();
        assert_ne!(digest, "password123");
        assert!(verify_password("password123", &digest));
        assert!(!verify_password("password124", &digest));
    }

    #[test]
    fn malformed_digest_never_verifies() {
        assert!(!verify_password("password123", "not-a-phc-string"));
    }
}
