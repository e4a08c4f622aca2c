//! Feature Vector - capability negotiation bits
//!
//! Peers advertise the optional and mandatory protocol extensions they support
//! as a set of feature bits. This crate provides:
//!
//! - [`RawFeatureVector`]: an unbounded bit set with a length-prefixed,
//!   minimal big-endian wire encoding
//! - [`FeatureNames`]: a read-only bit-to-name table, shareable across vectors
//!   and loadable from TOML
//! - [`FeatureVector`]: a raw vector interpreted against a name table, with
//!   even/odd pairing and "it's OK to be odd" compatibility checks
//!
//! ```
//! use feature_vector::{FeatureBit, FeatureNames, FeatureVector, RawFeatureVector};
//! use std::sync::Arc;
//!
//! let names = Arc::new(FeatureNames::new().with(4u32, "gossip").with(5u32, "gossip"));
//! let raw = RawFeatureVector::decode(&[0x00, 0x01, 0x20]).unwrap();
//! let fv = FeatureVector::new(Some(raw), names);
//!
//! assert!(fv.has_feature(FeatureBit::new(4)));
//! assert!(fv.is_compatible());
//! ```

#![forbid(unsafe_code)]

pub mod bit;
pub mod errors;
pub mod names;
pub mod raw;
pub mod vector;

pub use bit::{FeatureBit, MAX_ENCODABLE_BIT};
pub use errors::{FeatureError, Result};
pub use names::FeatureNames;
pub use raw::RawFeatureVector;
pub use vector::FeatureVector;
