use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use tracing::error;

/// Argon2 (default params, random salt). Returns the PHC string to store.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use argon2::{PasswordHash, PasswordVerifier};

    use super::*;

    fn verifies(plain: &str, hash: &str) -> bool {
        let parsed = PasswordHash::new(hash).expect("stored hash should parse");
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }

    #[test]
    fn hash_is_not_the_password() {
        let hash = hash_password("hunter22").expect("hashing should succeed");
        assert!(!hash.contains("hunter22"));
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn hash_verifies_only_the_original() {
        let hash = hash_password("Secur3P@ssw0rd!").expect("hashing should succeed");
        assert!(verifies("Secur3P@ssw0rd!", &hash));
        assert!(!verifies("wrong-password", &hash));
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }
}
