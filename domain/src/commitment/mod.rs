//! Commit/reveal primitives.
//!
//! In commit mode the result is hashed with a fresh salt and stored; only
//! the 128-bit hash leaves the system. A later reveal looks the hash up,
//! publishes the stored result and consumes the record.

pub mod hash;
pub mod record;

pub use hash::{CommitmentHash, CommitmentParseError};
pub use record::{Commitment, SALT_BYTES, commitment_hash};
