//! Canonical piece-commitment identifier.
//!
//! A [`PieceCid`] wraps the 32-byte root digest with a fixed CIDv1-style
//! prefix (version, fil-commitment-unsealed codec, sha2-256-trunc254-padded
//! multihash, digest length). The display form is multibase hex: an `f`
//! followed by the lowercase hex of the raw bytes.

use crate::commit::NodeDigest;
use crate::error::HashError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// CIDv1 + fil-commitment-unsealed (0xf101) + sha2-256-trunc254-padded
/// (0x1012) + 32-byte digest length, varint-encoded.
const CID_PREFIX: [u8; 7] = [0x01, 0x81, 0xe2, 0x03, 0x92, 0x20, 0x20];

/// Byte length of the encoded identifier.
pub const CID_LEN: usize = CID_PREFIX.len() + 32;

/// Canonical commitment identifier for a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceCid {
    digest: NodeDigest,
}

impl PieceCid {
    /// Encode a raw root digest as an identifier.
    #[inline]
    #[must_use]
    pub const fn from_digest(digest: NodeDigest) -> Self {
        Self { digest }
    }

    /// The wrapped 32-byte digest.
    #[inline]
    #[must_use]
    pub const fn digest(&self) -> &NodeDigest {
        &self.digest
    }

    /// Raw byte form: prefix followed by the digest.
    #[must_use]
    pub fn to_bytes(self) -> [u8; CID_LEN] {
        let mut out = [0u8; CID_LEN];
        out[..CID_PREFIX.len()].copy_from_slice(&CID_PREFIX);
        out[CID_PREFIX.len()..].copy_from_slice(&self.digest);
        out
    }

    /// Decode from the raw byte form, validating the prefix.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() != CID_LEN {
            return Err(HashError::MalformedCid("wrong length"));
        }
        if bytes[..CID_PREFIX.len()] != CID_PREFIX {
            return Err(HashError::MalformedCid("unexpected prefix"));
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes[CID_PREFIX.len()..]);
        Ok(Self { digest })
    }
}

impl fmt::Display for PieceCid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", hex::encode(self.to_bytes()))
    }
}

impl FromStr for PieceCid {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hexed = s
            .strip_prefix('f')
            .ok_or(HashError::MalformedCid("missing multibase prefix"))?;
        let bytes =
            hex::decode(hexed).map_err(|_| HashError::MalformedCid("invalid hex encoding"))?;
        Self::try_from_bytes(&bytes)
    }
}

impl Serialize for PieceCid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceCid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
