//! Feature name tables
//!
//! A [`FeatureNames`] table maps bit positions to human-readable feature names.
//! The table is built once, wrapped in an `Arc`, and shared read-only by every
//! [`FeatureVector`](crate::FeatureVector) that interprets bits against it.
//!
//! Tables can also be loaded from TOML configuration:
//!
//! ```toml
//! [features]
//! 0 = "data-loss-protect"
//! 1 = "data-loss-protect"
//! 3 = "initial-routing-sync"
//! ```

use crate::bit::FeatureBit;
use crate::errors::{FeatureError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Read-only mapping from feature bit to feature name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureNames {
    names: BTreeMap<FeatureBit, String>,
}

/// On-disk layout of a name table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeatureNamesConfig {
    #[serde(default)]
    features: BTreeMap<String, String>,
}

impl FeatureNames {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name for a bit, returning the extended table.
    #[must_use]
    pub fn with(mut self, bit: impl Into<FeatureBit>, name: impl Into<String>) -> Self {
        self.names.insert(bit.into(), name.into());
        self
    }

    /// Load a table from a TOML document with a `[features]` section.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: FeatureNamesConfig = toml::from_str(source)?;

        let mut names = BTreeMap::new();
        for (key, name) in config.features {
            // Keys must be canonical decimal so each bit has exactly one spelling.
            let position = key
                .parse::<u32>()
                .ok()
                .filter(|position| position.to_string() == key)
                .ok_or_else(|| {
                    FeatureError::config(format!(
                        "feature bit `{key}` is not a canonical non-negative integer"
                    ))
                })?;
            if name.trim().is_empty() {
                return Err(FeatureError::config(format!(
                    "feature bit {position} has an empty name"
                )));
            }
            names.insert(FeatureBit::new(position), name);
        }

        tracing::debug!(count = names.len(), "loaded feature name table");
        Ok(Self { names })
    }

    /// Name of `bit`, if it is known.
    pub fn get(&self, bit: FeatureBit) -> Option<&str> {
        self.names.get(&bit).map(String::as_str)
    }

    /// Whether `bit` has a name.
    pub fn contains(&self, bit: FeatureBit) -> bool {
        self.names.contains_key(&bit)
    }

    /// Whether `bit` and its even/odd partner are both known under the same name.
    pub fn is_pair(&self, bit: FeatureBit) -> bool {
        match (self.get(bit), self.get(bit.pair())) {
            (Some(name), Some(partner)) => name == partner,
            _ => false,
        }
    }

    /// Number of named bits.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table names no bits.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Known bits and their names in ascending bit order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureBit, &str)> + '_ {
        self.names.iter().map(|(bit, name)| (*bit, name.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(FeatureBit, S)> for FeatureNames {
    fn from_iter<I: IntoIterator<Item = (FeatureBit, S)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(bit, name)| (bit, name.into()))
                .collect(),
        }
    }
}
