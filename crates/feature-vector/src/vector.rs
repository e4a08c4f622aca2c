//! Named feature vectors
//!
//! A [`FeatureVector`] interprets a [`RawFeatureVector`] against a shared
//! [`FeatureNames`] table. Two adjacent bits `b` and `b ^ 1` that carry the
//! same name are one feature: the even bit means the peer requires it, the odd
//! bit means the peer supports it. Querying either bit of such a pair sees the
//! feature as present when the peer advertised either variant. Bits that are
//! merely numerically adjacent are never conflated.
//!
//! Compatibility follows the "it's OK to be odd" rule: an unknown odd bit can
//! be ignored, an unknown even bit cannot.

use crate::bit::FeatureBit;
use crate::errors::{FeatureError, Result};
use crate::names::FeatureNames;
use crate::raw::RawFeatureVector;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Feature bits paired with the names that give them meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    raw: RawFeatureVector,
    names: Arc<FeatureNames>,
}

impl FeatureVector {
    /// Wrap a raw vector, or an empty one when `raw` is `None`.
    pub fn new(raw: Option<RawFeatureVector>, names: Arc<FeatureNames>) -> Self {
        Self {
            raw: raw.unwrap_or_default(),
            names,
        }
    }

    /// Decode a complete encoded vector and interpret it against `names`.
    pub fn decode(bytes: &[u8], names: Arc<FeatureNames>) -> Result<Self> {
        let raw = RawFeatureVector::decode(bytes)?;
        Ok(Self::new(Some(raw), names))
    }

    /// Set a bit. Pairing plays no part in mutation.
    pub fn set(&mut self, bit: FeatureBit) {
        self.raw.set(bit);
    }

    /// Clear a bit. The other bit of a pair is left as it is.
    pub fn unset(&mut self, bit: FeatureBit) {
        self.raw.unset(bit);
    }

    /// Whether the feature at `bit` is advertised, either directly or through
    /// the other bit of a named pair.
    pub fn has_feature(&self, bit: FeatureBit) -> bool {
        self.raw.is_set(bit) || (self.names.is_pair(bit) && self.raw.is_set(bit.pair()))
    }

    /// Display name for a bit, e.g. `feature1(0)` or `unknown(6)`.
    pub fn name(&self, bit: FeatureBit) -> String {
        match self.names.get(bit) {
            Some(name) => format!("{name}({bit})"),
            None => format!("unknown({bit})"),
        }
    }

    /// Whether the name table has an entry for `bit`.
    pub fn is_known(&self, bit: FeatureBit) -> bool {
        self.names.contains(bit)
    }

    /// Set even bits with no entry in the name table. A non-empty result means
    /// the peer requires something this side does not understand.
    pub fn unknown_required_features(&self) -> Vec<FeatureBit> {
        let unknown: Vec<FeatureBit> = self
            .raw
            .iter()
            .filter(|bit| bit.is_required() && !self.is_known(*bit))
            .collect();

        if !unknown.is_empty() {
            tracing::debug!(?unknown, "peer requires unknown features");
        }
        unknown
    }

    /// Whether every required bit that is set is also known.
    pub fn is_compatible(&self) -> bool {
        self.unknown_required_features().is_empty()
    }

    /// Reject vectors that advertise both the required and the optional bit
    /// of the same named feature.
    pub fn validate_pairs(&self) -> Result<()> {
        for bit in self.raw.iter().filter(|bit| bit.is_required()) {
            if self.names.is_pair(bit) && self.raw.is_set(bit.pair()) {
                return Err(FeatureError::PairExists { bit });
            }
        }
        Ok(())
    }

    /// Set bits in ascending order.
    pub fn features(&self) -> impl Iterator<Item = FeatureBit> + '_ {
        self.raw.iter()
    }

    /// The underlying bits.
    pub fn raw(&self) -> &RawFeatureVector {
        &self.raw
    }

    /// Give up the names and return the underlying bits.
    pub fn into_raw(self) -> RawFeatureVector {
        self.raw
    }

    /// The shared name table.
    pub fn names(&self) -> &Arc<FeatureNames> {
        &self.names
    }

    /// Encode the underlying bits.
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.raw.encode()
    }

    /// Encode the underlying bits into a writer.
    pub fn encode_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.raw.encode_to(writer)
    }

    /// Encoded size of the underlying bits.
    pub fn serialize_size(&self) -> usize {
        self.raw.serialize_size()
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bit) in self.raw.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&self.name(bit))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_names() -> Arc<FeatureNames> {
        Arc::new(
            FeatureNames::new()
                .with(0u32, "feature1")
                .with(3u32, "feature2")
                .with(4u32, "feature3")
                .with(5u32, "feature3"),
        )
    }

    fn bits(positions: &[u32]) -> RawFeatureVector {
        positions.iter().copied().map(FeatureBit::new).collect()
    }

    #[test]
    fn test_none_starts_empty() {
        let fv = FeatureVector::new(None, test_names());
        assert!(fv.raw().is_empty());
        assert_eq!(fv.encode().unwrap(), vec![0x00, 0x00]);
    }

    #[test]
    fn test_names_are_shared() {
        let names = test_names();
        let a = FeatureVector::new(None, Arc::clone(&names));
        let b = FeatureVector::new(Some(bits(&[4])), Arc::clone(&names));
        assert!(Arc::ptr_eq(a.names(), b.names()));
        assert_eq!(Arc::strong_count(&names), 3);
    }

    #[test]
    fn test_validate_pairs() {
        let names = test_names();
        let ok = FeatureVector::new(Some(bits(&[0, 1, 4])), Arc::clone(&names));
        assert_eq!(ok.validate_pairs(), Ok(()));

        let both = FeatureVector::new(Some(bits(&[4, 5])), names);
        assert_eq!(
            both.validate_pairs(),
            Err(FeatureError::PairExists {
                bit: FeatureBit::new(4)
            })
        );
    }

    #[test]
    fn test_display_lists_names() {
        let fv = FeatureVector::new(Some(bits(&[0, 5, 6])), test_names());
        assert_eq!(fv.to_string(), "feature1(0), feature3(5), unknown(6)");
        assert_eq!(FeatureVector::new(None, test_names()).to_string(), "");
    }

    #[test]
    fn test_compatibility() {
        let names = test_names();
        assert!(FeatureVector::new(Some(bits(&[0, 1, 3, 7])), Arc::clone(&names)).is_compatible());
        assert!(!FeatureVector::new(Some(bits(&[0, 8])), names).is_compatible());
    }

    #[test]
    fn test_into_raw_returns_bits() {
        let fv = FeatureVector::new(Some(bits(&[2, 9])), test_names());
        assert_eq!(fv.into_raw(), bits(&[2, 9]));
    }
}
