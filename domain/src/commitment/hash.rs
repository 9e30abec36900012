//! 128-bit commitment tokens.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a 128-bit commitment: `{0}`")]
pub struct CommitmentParseError(pub String);

/// Token handed to the on-chain consumer in commit mode.
///
/// The same value can be written three ways; all parse to one token and the
/// canonical form is 32 lowercase hex digits.
///
/// ```
/// use arbiter_domain::CommitmentHash;
///
/// let a: CommitmentHash = "255".parse().unwrap();
/// let b: CommitmentHash = "0xff".parse().unwrap();
/// let c: CommitmentHash = "000000000000000000000000000000FF".parse().unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// assert_eq!(a.to_hex(), "000000000000000000000000000000ff");
/// assert_eq!(a.to_decimal(), "255");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitmentHash(u128);

impl CommitmentHash {
    pub fn from_u128(value: u128) -> Self {
        Self(value)
    }

    /// Interpret the first 16 bytes of a digest as a big-endian integer
    pub fn from_digest(digest: &[u8]) -> Self {
        let mut bytes = [0u8; 16];
        let n = digest.len().min(16);
        bytes[..n].copy_from_slice(&digest[..n]);
        Self(u128::from_be_bytes(bytes))
    }

    pub fn as_u128(&self) -> u128 {
        self.0
    }

    /// Canonical storage key: zero-padded lowercase hex
    pub fn to_hex(&self) -> String {
        format!("{:032x}", self.0)
    }

    /// Form returned to the on-chain consumer
    pub fn to_decimal(&self) -> String {
        self.0.to_string()
    }
}

impl std::fmt::Display for CommitmentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for CommitmentHash {
    type Err = CommitmentParseError;

    /// `0x`-prefixed → hex; only decimal digits → decimal; otherwise bare hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let err = || CommitmentParseError(s.to_string());

        let (digits, radix) = if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            (hex, 16)
        } else if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            (token, 10)
        } else {
            (token, 16)
        };

        if digits.is_empty() || (radix == 16 && digits.len() > 32) {
            return Err(err());
        }
        u128::from_str_radix(digits, radix).map(Self).map_err(|_| err())
    }
}

impl Serialize for CommitmentHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CommitmentHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
