//! Error type for feature vector operations
//!
//! Decoding failures are reported through a single enum so callers can match on
//! the precise reason a peer's advertisement was rejected. Setting, unsetting
//! and querying bits never fail.

use crate::bit::FeatureBit;

/// Error type for feature vector encoding, decoding and configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    /// The declared length runs past the end of the input
    #[error("Truncated feature vector: expected {expected} bytes, {available} available")]
    Truncated {
        /// Bytes the length prefix promised (including the prefix itself)
        expected: usize,
        /// Bytes actually present
        available: usize,
    },

    /// The data bytes start with a redundant zero byte
    #[error("Non-minimal feature vector encoding: leading zero byte")]
    NonMinimal,

    /// Bytes were left over after a complete feature vector
    #[error("Unexpected {count} trailing bytes after feature vector")]
    TrailingBytes {
        /// Number of unconsumed bytes
        count: usize,
    },

    /// A set bit is too high to be carried by the 16-bit length prefix
    #[error("Feature bit {bit} exceeds the maximum encodable bit")]
    Oversized {
        /// The offending bit
        bit: FeatureBit,
    },

    /// Both the required and the optional bit of one feature are set
    #[error("Both bits of feature pair {bit} are set")]
    PairExists {
        /// The even (required) bit of the pair
        bit: FeatureBit,
    },

    /// The feature name table configuration is invalid
    #[error("Feature name config error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// Non-EOF I/O failure while reading or writing a stream
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the underlying stream
        message: String,
    },
}

impl FeatureError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Check if the error means the input bytes were structurally invalid
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. } | Self::NonMinimal | Self::TrailingBytes { .. }
        )
    }
}

/// Standard Result type for feature vector operations
pub type Result<T> = std::result::Result<T, FeatureError>;

impl From<std::io::Error> for FeatureError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for FeatureError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FeatureError::Truncated {
            expected: 4,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Truncated feature vector: expected 4 bytes, 3 available"
        );

        let err = FeatureError::Oversized {
            bit: FeatureBit::new(600_000),
        };
        assert_eq!(
            err.to_string(),
            "Feature bit 600000 exceeds the maximum encodable bit"
        );
    }

    #[test]
    fn test_format_error_classification() {
        assert!(FeatureError::NonMinimal.is_format_error());
        assert!(FeatureError::TrailingBytes { count: 1 }.is_format_error());
        assert!(!FeatureError::config("bad").is_format_error());
        assert!(!FeatureError::PairExists {
            bit: FeatureBit::new(4)
        }
        .is_format_error());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = FeatureError::from(io_err);
        assert!(matches!(err, FeatureError::Io { .. }));
    }
}
