//! Error types for scalebloom operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`], whose error type is
//! [`BloomError`]. Errors are surfaced synchronously and never logged by the library.
//!
//! # Error Propagation
//!
//! ```
//! use scalebloom::{BloomFilter, Result};
//!
//! fn build_pair(capacity: usize, error_rate: f64) -> Result<(BloomFilter, BloomFilter)> {
//!     let a = BloomFilter::new(capacity, error_rate)?;
//!     let b = BloomFilter::new(capacity, error_rate)?;
//!     Ok((a, b))
//! }
//! # assert!(build_pair(1000, 0.01).is_ok());
//! # assert!(build_pair(0, 0.01).is_err());
//! ```

#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::io;

/// Result type alias for scalebloom operations.
pub type Result<T> = std::result::Result<T, BloomError>;

/// Errors that can occur during Bloom filter operations.
///
/// # Design Notes
/// - `Clone` + `PartialEq` enable testing and error comparison
/// - I/O failures are flattened to their kind and message so the enum stays `Clone`
#[derive(Debug, Clone, PartialEq)]
pub enum BloomError {
    /// Bad capacity, error rate, or ratio passed to a constructor or builder.
    InvalidParameter {
        /// Human-readable description of what's invalid.
        message: String,
    },

    /// Two filters cannot be combined because their configuration differs.
    ///
    /// Raised by union and intersection when capacity or slice geometry
    /// differ. Neither operand is modified.
    IncompatibleFilters {
        /// Description of the incompatibility.
        reason: String,
    },

    /// A serialized stream is truncated or malformed.
    ///
    /// No partial filter is ever returned alongside this error.
    Format {
        /// Description of what failed to decode.
        message: String,
    },

    /// Bitwise operation across bit vectors of unequal length.
    ///
    /// Filters check compatibility before touching their bit vectors, so this
    /// escaping to a caller means an internal invariant was broken.
    LengthMismatch {
        /// Length of the left-hand vector in bits.
        left: usize,
        /// Length of the right-hand vector in bits.
        right: usize,
    },

    /// The byte sink or source failed for a reason other than truncation.
    Io {
        /// Kind reported by the underlying I/O error.
        kind: io::ErrorKind,
        /// Message reported by the underlying I/O error.
        message: String,
    },
}

impl fmt::Display for BloomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { message } => {
                write!(f, "Invalid Bloom filter parameter: {}.", message)
            }
            Self::IncompatibleFilters { reason } => {
                write!(
                    f,
                    "Cannot perform operation on incompatible filters: {}.",
                    reason
                )
            }
            Self::Format { message } => {
                write!(f, "Malformed serialized filter: {}.", message)
            }
            Self::LengthMismatch { left, right } => {
                write!(
                    f,
                    "Bit vector length mismatch: {} bits vs {} bits",
                    left, right
                )
            }
            Self::Io { kind, message } => {
                write!(f, "I/O error ({:?}): {}", kind, message)
            }
        }
    }
}

impl std::error::Error for BloomError {}

impl From<io::Error> for BloomError {
    /// Truncated input is a format problem, everything else stays an I/O error.
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::format_error(format!("stream truncated: {}", err))
        } else {
            Self::io(&err)
        }
    }
}

impl BloomError {
    /// Create an `InvalidParameter` error.
    ///
    /// # Examples
    /// ```
    /// use scalebloom::BloomError;
    ///
    /// let err = BloomError::invalid_parameter(format!("capacity must be >= 1, got {}", 0));
    /// assert!(err.is_invalid_parameter());
    /// ```
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an `IncompatibleFilters` error.
    #[must_use]
    pub fn incompatible_filters(reason: impl Into<String>) -> Self {
        Self::IncompatibleFilters {
            reason: reason.into(),
        }
    }

    /// Create a `Format` error.
    #[must_use]
    pub fn format_error(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a `LengthMismatch` error.
    #[must_use]
    pub fn length_mismatch(left: usize, right: usize) -> Self {
        Self::LengthMismatch { left, right }
    }

    /// Create an `Io` error from an underlying I/O error.
    #[must_use]
    pub fn io(err: &io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// True for `InvalidParameter`.
    #[must_use]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// True for `IncompatibleFilters`.
    #[must_use]
    pub fn is_incompatible(&self) -> bool {
        matches!(self, Self::IncompatibleFilters { .. })
    }

    /// True for `Format`.
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
