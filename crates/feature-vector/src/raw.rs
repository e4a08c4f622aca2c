//! Raw feature bit sets and their wire encoding
//!
//! A [`RawFeatureVector`] is a plain set of bit positions. On the wire it is the
//! big-endian integer `Σ 2^bit`, prefixed by its minimal byte length as a
//! big-endian `u16`:
//!
//! ```text
//! {}        -> 00 00
//! {2, 3, 7} -> 00 01 8c
//! {2, 3, 8} -> 00 02 01 0c
//! ```
//!
//! Only minimal encodings are accepted on decode, so decoding and re-encoding
//! always reproduces the input bytes.

use crate::bit::FeatureBit;
use crate::errors::{FeatureError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::{ErrorKind, Read, Write};

/// Size of the big-endian byte-length prefix.
const LENGTH_PREFIX_BYTES: usize = 2;

/// Arbitrary-width set of feature bits with no knowledge of feature names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFeatureVector {
    bits: BTreeSet<FeatureBit>,
}

impl RawFeatureVector {
    /// Create a vector with exactly the given bits set.
    pub fn new(bits: impl IntoIterator<Item = FeatureBit>) -> Self {
        Self {
            bits: bits.into_iter().collect(),
        }
    }

    /// Create an empty vector.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set a bit. Setting an already-set bit is a no-op.
    pub fn set(&mut self, bit: FeatureBit) {
        self.bits.insert(bit);
    }

    /// Clear a bit. Clearing an unset bit is a no-op.
    pub fn unset(&mut self, bit: FeatureBit) {
        self.bits.remove(&bit);
    }

    /// Whether `bit` is set.
    pub fn is_set(&self, bit: FeatureBit) -> bool {
        self.bits.contains(&bit)
    }

    /// Set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = FeatureBit> + '_ {
        self.bits.iter().copied()
    }

    /// Number of set bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Set every bit that is set in `other`.
    pub fn merge(&mut self, other: &RawFeatureVector) {
        self.bits.extend(other.bits.iter().copied());
    }

    /// Total encoded size in bytes, including the length prefix.
    pub fn serialize_size(&self) -> usize {
        LENGTH_PREFIX_BYTES + self.data_len()
    }

    /// Minimal number of data bytes needed to hold the highest set bit.
    fn data_len(&self) -> usize {
        self.bits
            .last()
            .map_or(0, |top| top.byte_and_offset().0 + 1)
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.serialize_size());
        self.encode_to(&mut buf)?;
        Ok(buf)
    }

    /// Encode into a writer.
    pub fn encode_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        if let Some(&top) = self.bits.last() {
            if !top.is_encodable() {
                return Err(FeatureError::Oversized { bit: top });
            }
        }

        // Every set bit is encodable, so the length fits in the prefix.
        let data_len = self.data_len();
        let prefix = data_len as u16;

        let mut buf = vec![0u8; LENGTH_PREFIX_BYTES + data_len];
        buf[..LENGTH_PREFIX_BYTES].copy_from_slice(&prefix.to_be_bytes());
        for bit in &self.bits {
            let (byte, offset) = bit.byte_and_offset();
            // Most significant byte first.
            buf[LENGTH_PREFIX_BYTES + data_len - 1 - byte] |= 1 << offset;
        }

        writer.write_all(&buf)?;
        Ok(())
    }

    /// Decode a complete feature vector field. The slice must hold exactly
    /// one encoded vector.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut cursor = bytes;
        let raw = Self::decode_from(&mut cursor)?;
        if !cursor.is_empty() {
            tracing::debug!(count = cursor.len(), "rejecting feature vector with trailing bytes");
            return Err(FeatureError::TrailingBytes {
                count: cursor.len(),
            });
        }
        Ok(raw)
    }

    /// Decode one feature vector from a stream, consuming exactly the bytes
    /// it occupies.
    pub fn decode_from<R: Read>(reader: &mut R) -> Result<Self> {
        let result = Self::read_vector(reader);
        match &result {
            Ok(raw) => tracing::trace!(
                bytes = raw.serialize_size(),
                bits = raw.len(),
                "decoded feature vector"
            ),
            Err(err) => tracing::debug!(error = %err, "failed to decode feature vector"),
        }
        result
    }

    fn read_vector<R: Read>(reader: &mut R) -> Result<Self> {
        let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
        let got = read_full(reader, &mut prefix)?;
        if got < LENGTH_PREFIX_BYTES {
            return Err(FeatureError::Truncated {
                expected: LENGTH_PREFIX_BYTES,
                available: got,
            });
        }

        let data_len = usize::from(u16::from_be_bytes(prefix));
        let mut data = vec![0u8; data_len];
        let got = read_full(reader, &mut data)?;
        if got < data_len {
            return Err(FeatureError::Truncated {
                expected: LENGTH_PREFIX_BYTES + data_len,
                available: LENGTH_PREFIX_BYTES + got,
            });
        }

        if data.first() == Some(&0) {
            return Err(FeatureError::NonMinimal);
        }

        let mut bits = BTreeSet::new();
        for (index, byte) in data.iter().rev().enumerate() {
            for offset in 0..8u32 {
                if (byte >> offset) & 1 == 1 {
                    // index < 2^16, so the position always fits in u32
                    let position = index as u32 * 8 + offset;
                    bits.insert(FeatureBit::new(position));
                }
            }
        }

        Ok(Self { bits })
    }
}

/// Read until `buf` is full or the stream ends, returning the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(filled)
}

impl FromIterator<FeatureBit> for RawFeatureVector {
    fn from_iter<I: IntoIterator<Item = FeatureBit>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl Extend<FeatureBit> for RawFeatureVector {
    fn extend<I: IntoIterator<Item = FeatureBit>>(&mut self, iter: I) {
        self.bits.extend(iter);
    }
}
