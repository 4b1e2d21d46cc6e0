//! Salted one-way credential hashing.
//!
//! Encoded form: `sha256$<rounds>$<salt hex>$<digest hex>`. The digest is an
//! iterated SHA-256 chain over the salt and password, so a stored value never
//! reveals the password and two users with the same password hash differently.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::CoreError;

const SCHEME: &str = "sha256";
const DEFAULT_ROUNDS: u32 = 10_000;
const SALT_LEN: usize = 16;

/// A hashed credential as persisted in the `users` collection.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty password and
    /// `CoreError::Other` if the OS random source is unavailable.
    pub fn hash(password: &str) -> Result<Self, CoreError> {
        if password.is_empty() {
            return Err(CoreError::Validation("password must not be empty".into()));
        }
        let mut salt = [0u8; SALT_LEN];
        getrandom::fill(&mut salt)
            .map_err(|e| CoreError::Other(anyhow::anyhow!("OS randomness unavailable: {e}")))?;
        let digest = derive(&salt, password, DEFAULT_ROUNDS);
        Ok(Self(format!(
            "{SCHEME}${DEFAULT_ROUNDS}${}${}",
            hex::encode(salt),
            hex::encode(digest)
        )))
    }

    /// Check a plaintext password against this hash.
    ///
    /// Malformed stored values never verify.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        let mut parts = self.0.split('$');
        let (Some(scheme), Some(rounds), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };
        if scheme != SCHEME {
            return false;
        }
        let (Ok(rounds), Ok(salt), Ok(expected)) =
            (rounds.parse::<u32>(), hex::decode(salt), hex::decode(expected))
        else {
            return false;
        };
        let Ok(expected) = <[u8; 32]>::try_from(expected.as_slice()) else {
            return false;
        };
        let actual = derive(&salt, password, rounds);
        actual[..].ct_eq(&expected[..]).into()
    }

    /// The encoded representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

fn derive(salt: &[u8], password: &str, rounds: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let mut digest: [u8; 32] = hasher.finalize().into();
    for _ in 1..rounds {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(salt);
        digest = hasher.finalize().into();
    }
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = PasswordHash::hash("s3cret").unwrap();
        assert!(hash.verify("s3cret"));
        assert!(!hash.verify("S3cret"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = PasswordHash::hash("admin").unwrap();
        let b = PasswordHash::hash("admin").unwrap();
        assert_ne!(a, b);
        assert!(a.verify("admin") && b.verify("admin"));
    }

    #[test]
    fn encoded_form_never_contains_plaintext() {
        let hash = PasswordHash::hash("plaintext-password").unwrap();
        assert!(!hash.as_str().contains("plaintext-password"));
        assert!(hash.as_str().starts_with("sha256$10000$"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        for raw in ["", "admin", "sha256$x$00$00", "md5$1$00$00", "sha256$1$zz$00"] {
            let hash = PasswordHash(raw.to_string());
            assert!(!hash.verify("admin"), "{raw} should not verify");
        }
    }

    #[test]
    fn truncated_digest_never_verifies() {
        let hash = PasswordHash::hash("admin").unwrap();
        let truncated = &hash.as_str()[..hash.as_str().len() - 2];
        assert!(!PasswordHash(truncated.to_string()).verify("admin"));

        let mut extended = hash.as_str().to_string();
        extended.push_str("00");
        assert!(!PasswordHash(extended).verify("admin"));
    }

    #[test]
    fn empty_password_rejected() {
        assert!(matches!(
            PasswordHash::hash(""),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let hash = PasswordHash::hash("admin").unwrap();
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
