//! Password hashing.
//!
//! The shell never stores plaintext passwords; the user table holds digests
//! and the login check hashes the typed password through an injected
//! [`PasswordHasher`]. Verification against the table is constant-time
//! (see [`Session`](super::Session)).

use sha2::{Digest, Sha256};

/// Length of a stored password digest in bytes.
pub const HASH_LEN: usize = 32;

/// Password digest function injected into the shell.
///
/// Firmware with a hardware hash engine implements this over its peripheral;
/// everyone else uses [`Sha256Hasher`].
pub trait PasswordHasher {
    /// Digest a typed password.
    fn hash(&self, password: &[u8]) -> [u8; HASH_LEN];
}

/// SHA-256 software hasher.
#[derive(Debug, Copy, Clone, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Create the hasher.
    pub const fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, password: &[u8]) -> [u8; HASH_LEN] {
        let mut hasher = Sha256::new();
        hasher.update(password);
        let result = hasher.finalize();
        let mut digest = [0u8; HASH_LEN];
        digest.copy_from_slice(&result);
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let hasher = Sha256Hasher::new();
        assert_eq!(hasher.hash(b"hunter2"), hasher.hash(b"hunter2"));
        assert_ne!(hasher.hash(b"hunter2"), hasher.hash(b"hunter3"));
    }

    #[test]
    fn test_known_vector() {
        // SHA-256 of the empty string.
        let hasher = Sha256Hasher::new();
        let digest = hasher.hash(b"");
        assert_eq!(
            digest[..4],
            [0xe3, 0xb0, 0xc4, 0x42]
        );
    }
}
