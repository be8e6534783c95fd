//! Scalable Bloom filter with geometric growth.
//!
//! Chains fixed-capacity [`BloomFilter`]s so that a filter can absorb an
//! unbounded number of items while keeping the compounded false-positive
//! rate below the configured target.
//!
//! # Algorithm
//!
//! ```text
//! ScalableBloomFilter = [Filter₀, Filter₁, Filter₂, ...]
//!
//! Where:
//!   - Capacity(Filterᵢ) = n₀ × gⁱ           (g = 2 or 4, see GrowthMode)
//!   - ErrorRate(Filter₀) = P × (1 - r)
//!   - ErrorRate(Filterᵢ) = ErrorRate(Filterᵢ₋₁) × r
//!   - Compounded rate ≤ Σ P(1 - r)rⁱ = P
//! ```
//!
//! Only the last filter receives insertions. It is superseded the moment its
//! count reaches its capacity, and superseded filters are never modified
//! again. Queries OR the answers of every filter, newest first.
//!
//! # Examples
//!
//! ```
//! use scalebloom::{GrowthMode, Insertion, ScalableBloomFilter};
//!
//! # fn main() -> scalebloom::Result<()> {
//! let mut filter = ScalableBloomFilter::new(100, 0.001, GrowthMode::SmallSetGrowth, 0.9)?;
//!
//! for i in 0..1000u32 {
//!     filter.add(&i);
//! }
//!
//! assert!((0..1000u32).all(|i| filter.contains(&i)));
//! assert!(filter.filter_count() > 1);
//! assert_eq!(filter.add(&5u32), Insertion::AlreadyPresent);
//! # Ok(())
//! # }
//! ```
//!
//! # References
//!
//! - Almeida, P. S., Baquero, C., Preguiça, N., & Hutchison, D. (2007).
//!   "Scalable Bloom Filters". Information Processing Letters, 101(6), 255-261.

#![allow(clippy::module_name_repetitions)]

use crate::core::params::{bits_per_slice, num_slices, slice_geometry};
use crate::core::{
    validate_capacity, validate_error_rate, validate_ratio, Insertion, Membership, SliceGeometry,
};
use crate::error::{BloomError, Result};
use crate::filters::BloomFilter;
use crate::hash::ItemBytes;
use std::fmt;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default capacity of the first sub-filter.
pub const DEFAULT_INITIAL_CAPACITY: usize = 100;

/// Default compounded false-positive target.
pub const DEFAULT_ERROR_RATE: f64 = 0.001;

/// Default error tightening ratio between consecutive sub-filters.
pub const DEFAULT_RATIO: f64 = 0.9;

/// Capacity growth between consecutive sub-filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GrowthMode {
    /// Each sub-filter doubles the previous capacity. Tighter memory for sets
    /// expected to stay near the initial capacity.
    #[default]
    SmallSetGrowth,

    /// Each sub-filter quadruples the previous capacity. Fewer sub-filters
    /// to probe for sets expected to grow by orders of magnitude.
    LargeSetGrowth,
}

impl GrowthMode {
    /// Capacity multiplier applied at each growth step.
    #[must_use]
    #[inline]
    pub const fn multiplier(self) -> usize {
        match self {
            Self::SmallSetGrowth => 2,
            Self::LargeSetGrowth => 4,
        }
    }

    /// Mode for a stored multiplier, if it names one.
    ///
    /// ```
    /// use scalebloom::GrowthMode;
    ///
    /// assert_eq!(GrowthMode::from_multiplier(4), Some(GrowthMode::LargeSetGrowth));
    /// assert_eq!(GrowthMode::from_multiplier(3), None);
    /// ```
    #[must_use]
    pub const fn from_multiplier(multiplier: u64) -> Option<Self> {
        match multiplier {
            2 => Some(Self::SmallSetGrowth),
            4 => Some(Self::LargeSetGrowth),
            _ => None,
        }
    }
}

impl fmt::Display for GrowthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SmallSetGrowth => write!(f, "small-set growth (x2)"),
            Self::LargeSetGrowth => write!(f, "large-set growth (x4)"),
        }
    }
}

/// Unbounded probabilistic set built from a growing chain of Bloom filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalableBloomFilter {
    mode: GrowthMode,
    initial_capacity: usize,
    error_rate: f64,
    ratio: f64,
    /// Never empty. The last entry is the active insertion target.
    filters: Vec<BloomFilter>,
}

impl ScalableBloomFilter {
    /// Create a filter whose first sub-filter holds `initial_capacity` items.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidParameter`] if `initial_capacity < 1` or if
    /// `error_rate` or `ratio` is not in `(0, 1)`.
    pub fn new(
        initial_capacity: usize,
        error_rate: f64,
        mode: GrowthMode,
        ratio: f64,
    ) -> Result<Self> {
        validate_capacity(initial_capacity)?;
        validate_error_rate(error_rate)?;
        validate_ratio(ratio)?;

        let first_rate = error_rate * (1.0 - ratio);
        let geometry = slice_geometry(initial_capacity, first_rate)?;
        let first = BloomFilter::try_with_geometry(initial_capacity, first_rate, geometry)?;
        Ok(Self::with_first(mode, initial_capacity, error_rate, ratio, first))
    }

    fn with_first(
        mode: GrowthMode,
        initial_capacity: usize,
        error_rate: f64,
        ratio: f64,
        first: BloomFilter,
    ) -> Self {
        Self {
            mode,
            initial_capacity,
            error_rate,
            ratio,
            filters: vec![first],
        }
    }

    /// Reassemble a filter from decoded sub-filters, oldest first.
    pub(crate) fn from_parts(
        mode: GrowthMode,
        initial_capacity: usize,
        error_rate: f64,
        ratio: f64,
        filters: Vec<BloomFilter>,
    ) -> Result<Self> {
        validate_capacity(initial_capacity)?;
        validate_error_rate(error_rate)?;
        validate_ratio(ratio)?;
        if filters.is_empty() {
            return Err(BloomError::format_error(
                "scalable filter must hold at least one sub-filter",
            ));
        }

        Ok(Self {
            mode,
            initial_capacity,
            error_rate,
            ratio,
            filters,
        })
    }

    /// Add an item.
    ///
    /// Returns [`Insertion::AlreadyPresent`] if any sub-filter already
    /// reports the item. Otherwise adds it to the active sub-filter and
    /// appends a new one if that insertion brought the active filter to its
    /// capacity.
    pub fn add<T: ItemBytes + ?Sized>(&mut self, item: &T) -> Insertion {
        if self.contains(item) {
            return Insertion::AlreadyPresent;
        }

        let saturated = match self.filters.last_mut() {
            Some(active) => {
                active.add(item);
                active.is_at_capacity()
            }
            None => false,
        };
        if saturated {
            self.grow();
        }

        Insertion::Added
    }

    /// Append the next sub-filter in the chain.
    ///
    /// If the next sub-filter cannot be built (error rate underflowing to 0,
    /// or a bit count that cannot be allocated) the active filter keeps
    /// absorbing items at a rising false-positive rate.
    fn grow(&mut self) {
        let Some(active) = self.filters.last() else {
            return;
        };
        let capacity = active.capacity().saturating_mul(self.mode.multiplier());
        let error_rate = active.error_rate() * self.ratio;

        let next = slice_geometry(capacity, error_rate)
            .and_then(|geometry| BloomFilter::try_with_geometry(capacity, error_rate, geometry));
        match next {
            Ok(filter) => {
                debug!(
                    index = self.filters.len(),
                    capacity,
                    error_rate,
                    num_slices = filter.num_slices(),
                    bits_per_slice = filter.bits_per_slice(),
                    "appending sub-filter"
                );
                self.filters.push(filter);
            }
            Err(err) => {
                debug!(
                    index = self.filters.len(),
                    capacity,
                    error_rate,
                    reason = %err,
                    "sub-filter growth refused, active filter keeps absorbing items"
                );
            }
        }
    }

    /// Test membership against every sub-filter, newest first.
    #[must_use]
    pub fn contains<T: ItemBytes + ?Sized>(&self, item: &T) -> bool {
        self.filters.iter().rev().any(|f| f.contains(item))
    }

    /// Filter containing every item of either operand.
    ///
    /// Sub-filters at the same chain position are unioned; the longer chain's
    /// remaining sub-filters are copied over.
    ///
    /// # Errors
    ///
    /// [`BloomError::IncompatibleFilters`] unless both operands share growth
    /// mode, initial capacity, error rate, and ratio.
    pub fn union(&self, other: &Self) -> Result<Self> {
        if self.mode != other.mode
            || self.initial_capacity != other.initial_capacity
            || self.error_rate.to_bits() != other.error_rate.to_bits()
            || self.ratio.to_bits() != other.ratio.to_bits()
        {
            return Err(BloomError::incompatible_filters(format!(
                "scalable configuration ({}, {}, {}, {}) vs ({}, {}, {}, {})",
                self.mode,
                self.initial_capacity,
                self.error_rate,
                self.ratio,
                other.mode,
                other.initial_capacity,
                other.error_rate,
                other.ratio
            )));
        }

        let longest = self.filters.len().max(other.filters.len());
        let mut filters = Vec::with_capacity(longest);
        for i in 0..longest {
            let merged = match (self.filters.get(i), other.filters.get(i)) {
                (Some(a), Some(b)) => a.union(b)?,
                (Some(only), None) | (None, Some(only)) => only.clone(),
                (None, None) => break,
            };
            filters.push(merged);
        }

        Ok(Self {
            mode: self.mode,
            initial_capacity: self.initial_capacity,
            error_rate: self.error_rate,
            ratio: self.ratio,
            filters,
        })
    }

    /// Sum of the sub-filters' cardinality estimates, saturating.
    #[must_use]
    pub fn nstar(&self) -> usize {
        self.filters
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(f.nstar()))
    }

    /// Growth mode.
    #[must_use]
    #[inline]
    pub fn mode(&self) -> GrowthMode {
        self.mode
    }

    /// Capacity of the first sub-filter.
    #[must_use]
    #[inline]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Compounded false-positive target.
    #[must_use]
    #[inline]
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Error tightening ratio.
    #[must_use]
    #[inline]
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Number of sub-filters. Always at least 1.
    #[must_use]
    #[inline]
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Sub-filters, oldest first.
    #[must_use]
    #[inline]
    pub fn filters(&self) -> &[BloomFilter] {
        &self.filters
    }

    /// Sum of sub-filter capacities.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.filters
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(f.capacity()))
    }

    /// Sum of sub-filter counts.
    #[must_use]
    pub fn count(&self) -> usize {
        self.filters
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(f.count()))
    }

    /// True if nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.iter().all(BloomFilter::is_empty)
    }

    /// Heap bytes held by all sub-filters' bit vectors.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.filters.iter().map(BloomFilter::memory_usage).sum()
    }
}

impl Default for ScalableBloomFilter {
    /// Initial capacity 100, error rate 0.001, small-set growth, ratio 0.9.
    fn default() -> Self {
        let first_rate = DEFAULT_ERROR_RATE * (1.0 - DEFAULT_RATIO);
        let k = num_slices(first_rate);
        let geometry = SliceGeometry {
            num_slices: k,
            bits_per_slice: bits_per_slice(DEFAULT_INITIAL_CAPACITY, first_rate, k),
        };
        let first = BloomFilter::with_geometry(DEFAULT_INITIAL_CAPACITY, first_rate, geometry);
        Self::with_first(
            GrowthMode::default(),
            DEFAULT_INITIAL_CAPACITY,
            DEFAULT_ERROR_RATE,
            DEFAULT_RATIO,
            first,
        )
    }
}

impl fmt::Display for ScalableBloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScalableBloomFilter({}, error_rate={}, ratio={}, filters={}, count={}/{})",
            self.mode,
            self.error_rate,
            self.ratio,
            self.filters.len(),
            self.count(),
            self.capacity()
        )
    }
}

impl Membership for ScalableBloomFilter {
    fn add<T: ItemBytes + ?Sized>(&mut self, item: &T) -> Insertion {
        ScalableBloomFilter::add(self, item)
    }

    fn contains<T: ItemBytes + ?Sized>(&self, item: &T) -> bool {
        ScalableBloomFilter::contains(self, item)
    }

    fn count(&self) -> usize {
        ScalableBloomFilter::count(self)
    }

    fn capacity(&self) -> usize {
        ScalableBloomFilter::capacity(self)
    }
}
