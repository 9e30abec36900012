//! Sealed arbitration results awaiting reveal.

use super::hash::CommitmentHash;
use crate::arbitration::ArbitrationResult;
use crate::core::error::ArbitrationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Random bytes mixed into every commitment hash
pub const SALT_BYTES: usize = 16;

/// `SHA-256(json(result) ‖ hex(salt))`, truncated to 128 bits
pub fn commitment_hash(
    result: &ArbitrationResult,
    salt: &[u8; SALT_BYTES],
) -> Result<CommitmentHash, ArbitrationError> {
    let serialized = serde_json::to_vec(result)
        .map_err(|e| ArbitrationError::infrastructure(format!("serialize result: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&serialized);
    hasher.update(hex::encode(salt).as_bytes());
    Ok(CommitmentHash::from_digest(&hasher.finalize()))
}

/// A stored result, keyed by its hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub hash: CommitmentHash,
    pub result: ArbitrationResult,
    /// Hex-encoded salt
    pub salt: String,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
}

impl Commitment {
    /// Hash `result` with `salt` and wrap it for storage
    pub fn seal(
        result: ArbitrationResult,
        salt: [u8; SALT_BYTES],
        created_at: u64,
    ) -> Result<Self, ArbitrationError> {
        let hash = commitment_hash(&result, &salt)?;
        Ok(Self {
            hash,
            result,
            salt: hex::encode(salt),
            created_at,
        })
    }

    /// Recompute the hash from the stored result and salt
    pub fn verify(&self) -> bool {
        let Ok(bytes) = hex::decode(&self.salt) else {
            return false;
        };
        let Ok(salt) = <[u8; SALT_BYTES]>::try_from(bytes.as_slice()) else {
            return false;
        };
        commitment_hash(&self.result, &salt).is_ok_and(|h| h == self.hash)
    }

    /// Whether this commitment is older than `max_age_ms` at time `now`
    pub fn is_stale(&self, now: u64, max_age_ms: u64) -> bool {
        now.saturating_sub(self.created_at) > max_age_ms
    }
}
