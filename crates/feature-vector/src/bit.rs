//! Feature bit positions
//!
//! Feature bits follow the "it's OK to be odd" convention: an even bit tells
//! the peer the feature is required, the odd bit next to it says the feature is
//! merely supported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest bit position that fits behind the 16-bit byte-length prefix.
pub const MAX_ENCODABLE_BIT: u32 = u16::MAX as u32 * 8 - 1;

/// Position of a single feature flag within a feature vector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FeatureBit(u32);

impl FeatureBit {
    /// Create a feature bit from its position.
    #[must_use]
    pub const fn new(position: u32) -> Self {
        Self(position)
    }

    /// Return the raw bit position.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Even bits signal a feature the advertiser requires.
    #[must_use]
    pub const fn is_required(self) -> bool {
        self.0 & 1 == 0
    }

    /// Odd bits signal a feature the advertiser merely supports.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        !self.is_required()
    }

    /// The other bit of this bit's even/odd pair.
    #[must_use]
    pub const fn pair(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Whether the bit can be carried by the wire encoding.
    #[must_use]
    pub const fn is_encodable(self) -> bool {
        self.0 <= MAX_ENCODABLE_BIT
    }

    /// Index of the wire byte holding this bit, counted from the least
    /// significant byte, and the bit offset within it.
    pub(crate) const fn byte_and_offset(self) -> (usize, u8) {
        ((self.0 / 8) as usize, (self.0 % 8) as u8)
    }
}

impl fmt::Display for FeatureBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FeatureBit {
    fn from(position: u32) -> Self {
        Self(position)
    }
}

impl From<u16> for FeatureBit {
    fn from(position: u16) -> Self {
        Self(u32::from(position))
    }
}

impl From<FeatureBit> for u32 {
    fn from(bit: FeatureBit) -> Self {
        bit.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_optional() {
        assert!(FeatureBit::new(0).is_required());
        assert!(FeatureBit::new(1).is_optional());
        assert!(FeatureBit::new(12).is_required());
        assert!(!FeatureBit::new(13).is_required());
    }

    #[test]
    fn test_pair_is_symmetric() {
        assert_eq!(FeatureBit::new(4).pair(), FeatureBit::new(5));
        assert_eq!(FeatureBit::new(5).pair(), FeatureBit::new(4));
        assert_eq!(FeatureBit::new(9).pair().pair(), FeatureBit::new(9));
    }

    #[test]
    fn test_encodable_limit() {
        assert_eq!(MAX_ENCODABLE_BIT, 524_279);
        assert!(FeatureBit::new(MAX_ENCODABLE_BIT).is_encodable());
        assert!(!FeatureBit::new(MAX_ENCODABLE_BIT + 1).is_encodable());
    }

    #[test]
    fn test_byte_and_offset() {
        assert_eq!(FeatureBit::new(0).byte_and_offset(), (0, 0));
        assert_eq!(FeatureBit::new(7).byte_and_offset(), (0, 7));
        assert_eq!(FeatureBit::new(8).byte_and_offset(), (1, 0));
        assert_eq!(FeatureBit::new(19).byte_and_offset(), (2, 3));
    }
}
