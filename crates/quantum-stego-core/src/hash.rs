//! Tag generation: multi-round SHA3-512 with a φ derived salt, hex encoded.
//!
//! The default salt is fixed, so equal input gives an equal tag. That is what makes
//! decoding by catalog lookup work. A random salt is available for one-off tags.

use sha3::{Digest, Sha3_512};

use crate::PHI;

/// 64 hex chars, that is 256 bits of digest or 512 payload bits once embedded
pub const DEFAULT_TAG_LENGTH: usize = 64;
const EXTRA_ROUNDS: usize = 3;

#[derive(Debug, Clone)]
pub struct PqHasher {
    salt: Vec<u8>,
}

impl Default for PqHasher {
    fn default() -> Self {
        Self {
            salt: PHI.to_string().into_bytes(),
        }
    }
}

impl PqHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_salt(salt: impl Into<Vec<u8>>) -> Self {
        Self { salt: salt.into() }
    }

    /// salt is φ times a random 64 bit number, tags become unique per hasher
    pub fn with_random_salt() -> Self {
        let salt = PHI * rand::random::<u64>() as f64;
        Self::with_salt(salt.to_string())
    }

    /// hex digest of `data`, cut to `length` chars (at most 128)
    pub fn hash(&self, data: &str, length: usize) -> String {
        let mut digest = Sha3_512::new()
            .chain_update(data.as_bytes())
            .chain_update(&self.salt)
            .finalize();
        for _ in 0..EXTRA_ROUNDS {
            digest = Sha3_512::new()
                .chain_update(digest)
                .chain_update(&self.salt)
                .finalize();
        }

        digest
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>()
            .chars()
            .take(length)
            .collect()
    }

    pub fn tag(&self, data: &str) -> String {
        self.hash(data, DEFAULT_TAG_LENGTH)
    }
}

/// tag of `data` with the default salt
pub fn generate_pq_hash(data: &str) -> String {
    PqHasher::default().tag(data)
}
