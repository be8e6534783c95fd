//! Builder for fixed-capacity Bloom filters.
//!
//! # Type-State Pattern
//!
//! This builder uses the type-state pattern to ensure required parameters
//! are provided at compile time. The builder progresses through states:
//!
//! ```text
//! Initial → WithCapacity → Complete → BloomFilter
//!     ↓           ↓            ↓
//!   .capacity()  .error_rate()  .build()
//! ```
//!
//! # Examples
//!
//! ## Minimal Configuration
//!
//! ```
//! use scalebloom::builder::BloomFilterBuilder;
//!
//! let filter = BloomFilterBuilder::new()
//!     .capacity(10_000)
//!     .error_rate(0.01)
//!     .build()
//!     .unwrap();
//! assert!(filter.is_empty());
//! ```
//!
//! ## Error Handling
//!
//! ```
//! use scalebloom::builder::BloomFilterBuilder;
//!
//! let result = BloomFilterBuilder::new()
//!     .capacity(0)  // Invalid!
//!     .error_rate(0.01)
//!     .build();
//!
//! assert!(result.unwrap_err().is_invalid_parameter());
//! ```

use crate::core::params::slice_geometry;
use crate::error::{BloomError, Result};
use crate::filters::BloomFilter;
use std::marker::PhantomData;

/// Type-state marker: Initial state (no parameters set).
pub struct Initial;

/// Type-state marker: Capacity is set.
pub struct WithCapacity;

/// Type-state marker: All required parameters set.
pub struct Complete;

/// Builder for Bloom filters with type-state guarantees.
///
/// # Type Parameters
///
/// - `State`: Current builder state (Initial, WithCapacity, Complete)
pub struct BloomFilterBuilder<State> {
    capacity: Option<usize>,
    error_rate: Option<f64>,
    _state: PhantomData<State>,
}

impl BloomFilterBuilder<Initial> {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capacity: None,
            error_rate: None,
            _state: PhantomData,
        }
    }

    /// Set the number of items the filter is sized for.
    ///
    /// Required. Transitions builder to `WithCapacity` state.
    #[must_use]
    pub fn capacity(self, capacity: usize) -> BloomFilterBuilder<WithCapacity> {
        BloomFilterBuilder {
            capacity: Some(capacity),
            error_rate: self.error_rate,
            _state: PhantomData,
        }
    }
}

impl BloomFilterBuilder<WithCapacity> {
    /// Set the target false-positive rate at capacity.
    ///
    /// Required. Transitions builder to `Complete` state.
    ///
    /// # Examples
    ///
    /// ```
    /// use scalebloom::builder::BloomFilterBuilder;
    ///
    /// let builder = BloomFilterBuilder::new()
    ///     .capacity(10_000)
    ///     .error_rate(0.01);  // 1% false positive rate
    /// ```
    #[must_use]
    pub fn error_rate(self, error_rate: f64) -> BloomFilterBuilder<Complete> {
        BloomFilterBuilder {
            capacity: self.capacity,
            error_rate: Some(error_rate),
            _state: PhantomData,
        }
    }
}

impl BloomFilterBuilder<Complete> {
    fn parameters(&self) -> Result<(usize, f64)> {
        match (self.capacity, self.error_rate) {
            (Some(capacity), Some(error_rate)) => Ok((capacity, error_rate)),
            _ => Err(BloomError::invalid_parameter(
                "capacity and error_rate must both be set",
            )),
        }
    }

    /// Build the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if:
    /// - `capacity == 0`
    /// - `error_rate` not in (0, 1)
    /// - the derived bit count is not addressable
    pub fn build(self) -> Result<BloomFilter> {
        let (capacity, error_rate) = self.parameters()?;
        BloomFilter::new(capacity, error_rate)
    }

    /// Build the filter and return it with metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use scalebloom::builder::BloomFilterBuilder;
    ///
    /// let (filter, metadata) = BloomFilterBuilder::new()
    ///     .capacity(1000)
    ///     .error_rate(0.001)
    ///     .build_with_metadata()
    ///     .unwrap();
    ///
    /// assert_eq!(metadata.num_slices, 10);
    /// assert_eq!(metadata.bits_per_slice, 1438);
    /// assert_eq!(metadata.total_bits, filter.num_bits());
    /// println!("Bits per item: {:.2}", metadata.bits_per_item);
    /// ```
    pub fn build_with_metadata(self) -> Result<(BloomFilter, FilterMetadata)> {
        let (capacity, error_rate) = self.parameters()?;
        let geometry = slice_geometry(capacity, error_rate)?;
        let filter = BloomFilter::try_with_geometry(capacity, error_rate, geometry)?;

        #[allow(clippy::cast_precision_loss)]
        let metadata = FilterMetadata {
            capacity,
            error_rate,
            num_slices: geometry.num_slices,
            bits_per_slice: geometry.bits_per_slice,
            total_bits: geometry.total_bits(),
            bits_per_item: geometry.total_bits() as f64 / capacity as f64,
        };

        Ok((filter, metadata))
    }
}

impl Default for BloomFilterBuilder<Initial> {
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata about a constructed filter.
///
/// Contains the parameters used to create the filter, useful for
/// capacity planning and debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterMetadata {
    /// Number of items the filter is sized for
    pub capacity: usize,
    /// Target false positive rate
    pub error_rate: f64,
    /// Number of slices (k)
    pub num_slices: usize,
    /// Bits per slice (m)
    pub bits_per_slice: usize,
    /// Total bits (k × m)
    pub total_bits: usize,
    /// Bits spent per item at capacity
    pub bits_per_item: f64,
}

impl FilterMetadata {
    /// Bytes taken by the packed bit payload.
    #[must_use]
    pub fn payload_bytes(&self) -> usize {
        crate::core::bitvec::packed_len(self.total_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_minimal() {
        let filter = BloomFilterBuilder::new()
            .capacity(1000)
            .error_rate(0.01)
            .build()
            .unwrap();

        assert!(filter.is_empty());
        assert_eq!(filter.capacity(), 1000);
        assert_eq!(filter.error_rate(), 0.01);
    }

    #[test]
    fn test_builder_matches_constructor() {
        let built = BloomFilterBuilder::new()
            .capacity(200)
            .error_rate(0.001)
            .build()
            .unwrap();
        assert_eq!(built, BloomFilter::new(200, 0.001).unwrap());
    }

    #[test]
    fn test_builder_with_metadata() {
        let (filter, metadata) = BloomFilterBuilder::default()
            .capacity(100)
            .error_rate(0.01)
            .build_with_metadata()
            .unwrap();

        assert_eq!(metadata.num_slices, 7);
        assert_eq!(metadata.bits_per_slice, 137);
        assert_eq!(metadata.total_bits, 959);
        assert_eq!(metadata.payload_bytes(), 120);
        assert!((metadata.bits_per_item - 9.59).abs() < 1e-9);
        assert_eq!(filter.num_bits(), metadata.total_bits);
    }

    #[test]
    fn test_builder_invalid_capacity() {
        let result = BloomFilterBuilder::new().capacity(0).error_rate(0.01).build();
        assert!(result.unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_builder_invalid_error_rate() {
        for rate in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let result = BloomFilterBuilder::new().capacity(100).error_rate(rate).build();
            assert!(result.is_err(), "rate {rate} accepted");
        }
        let result = BloomFilterBuilder::new()
            .capacity(100)
            .error_rate(0.0)
            .build_with_metadata();
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_functionality_strings() {
        let mut filter = BloomFilterBuilder::new()
            .capacity(1000)
            .error_rate(0.01)
            .build()
            .unwrap();

        filter.add("hello");
        filter.add("world");

        assert!(filter.contains("hello"));
        assert!(filter.contains("world"));
    }
}
