//! Padded and unpadded piece sizes.
//!
//! The two representations are related by the scheme's fixed 127/128 ratio:
//! every 127 raw bytes occupy 128 bytes once the reserved byte is inserted.
//! A *padded* size is always a power of two ≥ 128; the corresponding
//! unpadded size is therefore always of the form 127·2^n.

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported padded piece: one 32 GiB sector.
pub const MAX_PIECE_PADDED: PaddedPieceSize = PaddedPieceSize(32 << 30);

/// Size of a piece after padding, in bytes. Valid values are powers of two ≥ 128.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaddedPieceSize(pub u64);

/// Size of the raw payload that fits in a padded piece, in bytes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnpaddedPieceSize(pub u64);

impl PaddedPieceSize {
    /// Raw payload capacity of this padded size (`padded − padded/128`).
    #[inline]
    #[must_use]
    pub const fn unpadded(self) -> UnpaddedPieceSize {
        UnpaddedPieceSize(self.0 - self.0 / 128)
    }

    /// Check that the value is a power of two ≥ 128.
    pub const fn validate(self) -> Result<(), HashError> {
        if self.0 >= 128 && self.0.is_power_of_two() {
            Ok(())
        } else {
            Err(HashError::InvalidPaddedSize(self.0))
        }
    }
}

impl UnpaddedPieceSize {
    /// Padded size holding this payload (`unpadded + unpadded/127`).
    #[inline]
    #[must_use]
    pub const fn padded(self) -> PaddedPieceSize {
        PaddedPieceSize(self.0 + self.0 / 127)
    }

    /// Check that the value is of the form 127·2^n.
    pub const fn validate(self) -> Result<(), HashError> {
        if self.0 >= 127 && self.0 % 127 == 0 && (self.0 / 127).is_power_of_two() {
            Ok(())
        } else {
            Err(HashError::InvalidUnpaddedSize(self.0))
        }
    }
}

impl fmt::Display for PaddedPieceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UnpaddedPieceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
