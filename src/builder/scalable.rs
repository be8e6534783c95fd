//! Builder for scalable Bloom filters.
//!
//! Scalable Bloom filters automatically grow as more items are inserted,
//! keeping the compounded false positive rate under the configured target.
//!
//! # Growth
//!
//! When the active sub-filter reaches its capacity:
//! 1. Create a new sub-filter with capacity = old_capacity × mode multiplier
//! 2. Tighten the error rate: new_error_rate = old_error_rate × ratio
//! 3. Append it to the chain
//!
//! # Examples
//!
//! ## Defaults
//!
//! ```
//! use scalebloom::builder::ScalableBloomFilterBuilder;
//! use scalebloom::{GrowthMode, ScalableBloomFilter};
//!
//! let filter = ScalableBloomFilterBuilder::new().build().unwrap();
//! assert_eq!(filter, ScalableBloomFilter::default());
//! assert_eq!(filter.mode(), GrowthMode::SmallSetGrowth);
//! ```
//!
//! ## Full Configuration
//!
//! ```
//! use scalebloom::builder::ScalableBloomFilterBuilder;
//! use scalebloom::GrowthMode;
//!
//! let filter = ScalableBloomFilterBuilder::new()
//!     .initial_capacity(1_000)
//!     .error_rate(0.01)
//!     .mode(GrowthMode::LargeSetGrowth) // Quadruple capacity each growth
//!     .ratio(0.85)                      // Tighten error rate by 15%
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.initial_capacity(), 1_000);
//! ```

use crate::error::Result;
use crate::filters::scalable::{
    GrowthMode, ScalableBloomFilter, DEFAULT_ERROR_RATE, DEFAULT_INITIAL_CAPACITY, DEFAULT_RATIO,
};

/// Builder for scalable Bloom filters. Every parameter has a default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalableBloomFilterBuilder {
    initial_capacity: usize,
    error_rate: f64,
    mode: GrowthMode,
    ratio: f64,
}

impl ScalableBloomFilterBuilder {
    /// Create a builder holding the defaults: initial capacity 100, error
    /// rate 0.001, small-set growth, ratio 0.9.
    #[must_use]
    pub fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            error_rate: DEFAULT_ERROR_RATE,
            mode: GrowthMode::default(),
            ratio: DEFAULT_RATIO,
        }
    }

    /// Set the capacity of the first sub-filter (must be > 0).
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the compounded false positive target (must be in (0, 1)).
    #[must_use]
    pub fn error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate;
        self
    }

    /// Set the capacity growth mode.
    #[must_use]
    pub fn mode(mut self, mode: GrowthMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the error tightening ratio (must be in (0, 1)).
    ///
    /// Each new sub-filter's error rate is the previous one's times this
    /// ratio.
    #[must_use]
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Build the scalable Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if:
    /// - `initial_capacity == 0`
    /// - `error_rate` not in (0, 1)
    /// - `ratio` not in (0, 1)
    pub fn build(self) -> Result<ScalableBloomFilter> {
        ScalableBloomFilter::new(self.initial_capacity, self.error_rate, self.mode, self.ratio)
    }
}

impl Default for ScalableBloomFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
