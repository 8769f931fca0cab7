// Password hashing using Argon2id
// Decision: Argon2id in PHC string format; the salt and parameters travel inside the digest
// Decision: Cost is the Argon2 iteration count, memory and lanes stay at crate defaults

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::HashError;

/// Default Argon2 iteration count.
pub const DEFAULT_PASSWORD_COST: u32 = Params::DEFAULT_T_COST;

/// One-way salted password hashing.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Create a hasher with the given Argon2 iteration count.
    pub fn new(cost: u32) -> Result<Self, HashError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| HashError::Hash(format!("invalid cost {}: {}", cost, e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Hash(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored digest.
    /// A mismatch is `Ok(false)`; only an unparseable digest is an error.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, HashError> {
        let parsed_hash =
            PasswordHash::new(digest).map_err(|e| HashError::MalformedDigest(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = CredentialHasher::default();
        let password = "my-secure-password-123!";
        let hash = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes() {
        let hasher = CredentialHasher::default();
        let hash1 = hasher.hash("same-password").unwrap();
        let hash2 = hasher.hash("same-password").unwrap();

        // Salted: same password, different digests
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("same-password", &hash1).unwrap());
        assert!(hasher.verify("same-password", &hash2).unwrap());
    }

    #[test]
    fn test_hash_format() {
        let hash = CredentialHasher::default().hash("test").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_custom_cost_is_embedded_in_digest() {
        let hasher = CredentialHasher::new(3).unwrap();
        let hash = hasher.hash("secret").unwrap();
        assert!(hash.contains("t=3"));

        // A hasher with a different cost still verifies: parameters come from the digest
        assert!(CredentialHasher::default().verify("secret", &hash).unwrap());
    }

    #[test]
    fn test_zero_cost_rejected() {
        assert!(matches!(CredentialHasher::new(0), Err(HashError::Hash(_))));
    }

    #[test]
    fn test_malformed_digest() {
        let result = CredentialHasher::default().verify("secret", "not-a-phc-string");
        assert!(matches!(result, Err(HashError::MalformedDigest(_))));
    }
}
