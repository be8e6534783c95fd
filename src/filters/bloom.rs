//! Fixed-capacity sliced Bloom filter.
//!
//! The bit vector of `k × m` bits is split into `k` contiguous slices; each
//! item sets exactly one bit per slice. Slicing keeps the `k` hash positions
//! from colliding with each other for the same item and gives every slice
//! the same fill rate, which is what makes the cardinality estimator work.
//!
//! # Properties
//!
//! - **False positives**: bounded by `error_rate` while `count ≤ capacity`,
//!   rising gracefully beyond that
//! - **False negatives**: never
//! - **Composition**: union and intersection of filters with identical
//!   capacity and slice geometry
//! - **Estimation**: [`BloomFilter::nstar`] infers the number of distinct
//!   items from bit density alone
//!
//! # Set Algebra
//!
//! Union ORs the bit vectors and intersection ANDs them. The resulting
//! `count` is an approximation (sum and minimum respectively); use
//! [`BloomFilter::nstar`] on the result for a cardinality estimate.
//!
//! The direct estimate of an intersection overcounts when the operands
//! share few items, since bits set by chance in both survive the AND.
//! [`BloomFilter::nstar_intersection`] avoids that by inclusion–exclusion:
//!
//! ```text
//! |A ∩ B| ≈ n*(A) + n*(B) - n*(A ∪ B)
//! ```
//!
//! # Examples
//!
//! ```
//! use scalebloom::{BloomFilter, Insertion};
//!
//! # fn main() -> scalebloom::Result<()> {
//! let mut filter = BloomFilter::new(1000, 0.001)?;
//!
//! assert_eq!(filter.add("hello"), Insertion::Added);
//! assert_eq!(filter.add("hello"), Insertion::AlreadyPresent);
//! assert!(filter.contains("hello"));
//! assert!(!filter.contains("goodbye"));
//! assert_eq!(filter.count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Estimating Overlap
//!
//! ```
//! use scalebloom::BloomFilter;
//!
//! # fn main() -> scalebloom::Result<()> {
//! let mut a = BloomFilter::new(200, 0.001)?;
//! let mut b = BloomFilter::new(200, 0.001)?;
//! for i in 0..100u32 {
//!     a.add(&i);
//!     b.add(&(i + 50));
//! }
//!
//! let shared = a.nstar_intersection(&b)?;
//! assert!((35..=65).contains(&shared));
//! # Ok(())
//! # }
//! ```

use crate::core::params::{estimate_items, expected_fp_rate, slice_geometry};
use crate::core::{
    validate_capacity, validate_error_rate, BitVec, Insertion, Membership, SliceGeometry,
};
use crate::error::{BloomError, Result};
use crate::hash::{ItemBytes, SliceHasher};
use std::fmt;

/// A fixed-capacity probabilistic set over sliced bits.
///
/// Mutation takes `&mut self`; the filter has no internal synchronization.
/// Share read-only snapshots freely, or wrap in a lock for concurrent writes.
#[derive(Debug, Clone)]
pub struct BloomFilter {
    capacity: usize,
    error_rate: f64,
    geometry: SliceGeometry,
    count: usize,
    bits: BitVec,
    hasher: SliceHasher,
}

impl BloomFilter {
    /// Create an empty filter for `capacity` items at `error_rate`.
    ///
    /// # Errors
    ///
    /// [`BloomError::InvalidParameter`] if `capacity < 1`, if `error_rate`
    /// is not in `(0, 1)`, or if the derived bit count cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use scalebloom::BloomFilter;
    ///
    /// let filter = BloomFilter::new(1000, 0.001).unwrap();
    /// assert_eq!(filter.num_slices(), 10);
    /// assert_eq!(filter.bits_per_slice(), 1438);
    ///
    /// assert!(BloomFilter::new(0, 0.001).is_err());
    /// assert!(BloomFilter::new(1000, 1.5).is_err());
    /// ```
    pub fn new(capacity: usize, error_rate: f64) -> Result<Self> {
        let geometry = slice_geometry(capacity, error_rate)?;
        Self::try_with_geometry(capacity, error_rate, geometry)
    }

    /// Empty filter over an already validated geometry.
    ///
    /// Fails with `InvalidParameter` when the bit storage cannot be allocated.
    pub(crate) fn try_with_geometry(
        capacity: usize,
        error_rate: f64,
        geometry: SliceGeometry,
    ) -> Result<Self> {
        let bits = BitVec::new(geometry.total_bits())?;
        Ok(Self::assemble(capacity, error_rate, geometry, 0, bits))
    }

    /// Empty filter over a small fixed geometry.
    pub(crate) fn with_geometry(capacity: usize, error_rate: f64, geometry: SliceGeometry) -> Self {
        let bits = BitVec::zeroed(geometry.total_bits());
        Self::assemble(capacity, error_rate, geometry, 0, bits)
    }

    /// Rebuild a filter from decoded state.
    ///
    /// The geometry is taken as given rather than re-derived, so a filter
    /// restored from bytes addresses exactly the bits it was written with.
    pub(crate) fn from_parts(
        capacity: usize,
        error_rate: f64,
        geometry: SliceGeometry,
        count: usize,
        bits: BitVec,
    ) -> Result<Self> {
        validate_capacity(capacity)?;
        validate_error_rate(error_rate)?;
        if bits.len() != geometry.total_bits() {
            return Err(BloomError::format_error(format!(
                "bit payload holds {} bits but {}x{} slices need {}",
                bits.len(),
                geometry.num_slices,
                geometry.bits_per_slice,
                geometry.total_bits()
            )));
        }
        Ok(Self::assemble(capacity, error_rate, geometry, count, bits))
    }

    fn assemble(
        capacity: usize,
        error_rate: f64,
        geometry: SliceGeometry,
        count: usize,
        bits: BitVec,
    ) -> Self {
        Self {
            capacity,
            error_rate,
            geometry,
            count,
            bits,
            hasher: SliceHasher::for_geometry(geometry),
        }
    }

    /// Absolute bit positions for an item, one per slice.
    fn positions<T: ItemBytes + ?Sized>(&self, item: &T) -> impl Iterator<Item = usize> {
        let m = self.geometry.bits_per_slice;
        self.hasher
            .indices(&item.item_bytes())
            .into_iter()
            .enumerate()
            .map(move |(slice, idx)| slice * m + idx)
    }

    /// Add an item.
    ///
    /// Returns [`Insertion::AlreadyPresent`] without touching any state if
    /// every addressed bit was already set. Otherwise sets them, increments
    /// `count`, and returns [`Insertion::Added`]. Adding beyond `capacity`
    /// is allowed; the false-positive rate rises.
    pub fn add<T: ItemBytes + ?Sized>(&mut self, item: &T) -> Insertion {
        let positions: Vec<usize> = self.positions(item).collect();
        if positions.iter().all(|&pos| self.bits.get(pos)) {
            return Insertion::AlreadyPresent;
        }

        for pos in positions {
            self.bits.set(pos);
        }
        self.count = self.count.saturating_add(1);
        Insertion::Added
    }

    /// Test membership. Never `false` for an added item.
    #[must_use]
    pub fn contains<T: ItemBytes + ?Sized>(&self, item: &T) -> bool {
        self.positions(item).all(|pos| self.bits.get(pos))
    }

    /// Deep copy of configuration, bit state, and count.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.capacity != other.capacity {
            return Err(BloomError::incompatible_filters(format!(
                "capacity {} vs {}",
                self.capacity, other.capacity
            )));
        }
        if self.geometry != other.geometry {
            return Err(BloomError::incompatible_filters(format!(
                "slice geometry {}x{} vs {}x{}",
                self.geometry.num_slices,
                self.geometry.bits_per_slice,
                other.geometry.num_slices,
                other.geometry.bits_per_slice
            )));
        }
        Ok(())
    }

    /// Filter containing every item of either operand.
    ///
    /// The result's `count` is the sum of both counts, an upper bound that
    /// double-counts shared items.
    ///
    /// # Errors
    ///
    /// [`BloomError::IncompatibleFilters`] if capacity or slice geometry
    /// differ. Neither operand is modified.
    pub fn union(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let mut result = self.clone();
        result.bits = self.bits.union(&other.bits)?;
        result.count = self.count.saturating_add(other.count);
        Ok(result)
    }

    /// Filter containing the items common to both operands.
    ///
    /// The result's `count` is the smaller of the two counts.
    ///
    /// # Errors
    ///
    /// [`BloomError::IncompatibleFilters`] if capacity or slice geometry
    /// differ. Neither operand is modified.
    pub fn intersection(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let mut result = self.clone();
        result.bits = self.bits.intersect(&other.bits)?;
        result.count = self.count.min(other.count);
        Ok(result)
    }

    /// Estimated number of distinct items from bit density.
    ///
    /// Independent of [`count`](Self::count). Returns `usize::MAX` once every
    /// bit is set. Overestimates on the output of
    /// [`intersection`](Self::intersection) when the operands overlap little;
    /// see [`nstar_intersection`](Self::nstar_intersection).
    #[must_use]
    pub fn nstar(&self) -> usize {
        estimate_items(self.bits.count_ones(), self.geometry)
    }

    /// Estimated number of items shared with `other`, by inclusion–exclusion.
    ///
    /// May come out slightly negative for disjoint sets; the value is not
    /// clamped.
    ///
    /// # Errors
    ///
    /// [`BloomError::IncompatibleFilters`] under the same conditions as
    /// [`union`](Self::union).
    pub fn nstar_intersection(&self, other: &Self) -> Result<i64> {
        let union = self.union(other)?;
        let signed = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);

        Ok(signed(self.nstar())
            .saturating_add(signed(other.nstar()))
            .saturating_sub(signed(union.nstar())))
    }

    /// Number of items the filter was sized for.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Target false-positive rate at capacity.
    #[must_use]
    #[inline]
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Number of slices, `k`.
    #[must_use]
    #[inline]
    pub fn num_slices(&self) -> usize {
        self.geometry.num_slices
    }

    /// Bits in each slice, `m`.
    #[must_use]
    #[inline]
    pub fn bits_per_slice(&self) -> usize {
        self.geometry.bits_per_slice
    }

    /// Slice layout.
    #[must_use]
    #[inline]
    pub fn geometry(&self) -> SliceGeometry {
        self.geometry
    }

    /// Total bits, `k × m`.
    #[must_use]
    #[inline]
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of confirmed-new items added. Approximate after set algebra.
    #[must_use]
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// True if `count` is 0.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True once `count` has reached `capacity`.
    #[must_use]
    #[inline]
    pub fn is_at_capacity(&self) -> bool {
        self.count >= self.capacity
    }

    /// Read-only view of the bit vector.
    #[must_use]
    #[inline]
    pub fn bits(&self) -> &BitVec {
        &self.bits
    }

    /// Fraction of bits set, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_ratio(&self) -> f64 {
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }

    /// Theoretical false-positive rate at the current `count`.
    #[must_use]
    pub fn current_fp_rate(&self) -> f64 {
        expected_fp_rate(self.geometry, self.count)
    }

    /// Heap bytes held by the bit vector.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.bits.memory_usage()
    }
}

impl PartialEq for BloomFilter {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity
            && self.error_rate.to_bits() == other.error_rate.to_bits()
            && self.geometry == other.geometry
            && self.count == other.count
            && self.bits == other.bits
    }
}

impl fmt::Display for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BloomFilter(capacity={}, error_rate={}, slices={}x{}, count={}, fill={:.1}%)",
            self.capacity,
            self.error_rate,
            self.geometry.num_slices,
            self.geometry.bits_per_slice,
            self.count,
            self.fill_ratio() * 100.0
        )
    }
}

impl Membership for BloomFilter {
    fn add<T: ItemBytes + ?Sized>(&mut self, item: &T) -> Insertion {
        BloomFilter::add(self, item)
    }

    fn contains<T: ItemBytes + ?Sized>(&self, item: &T) -> bool {
        BloomFilter::contains(self, item)
    }

    fn count(&self) -> usize {
        self.count
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters() -> Vec<char> {
        ('a'..='z').collect()
    }

    #[test]
    fn test_new_derives_geometry() {
        let filter = BloomFilter::new(1000, 0.001).unwrap();
        assert_eq!(filter.num_slices(), 10);
        assert_eq!(filter.bits_per_slice(), 1438);
        assert_eq!(filter.num_bits(), 14_380);
        assert_eq!(filter.capacity(), 1000);
        assert_eq!(filter.error_rate(), 0.001);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        assert!(BloomFilter::new(0, 0.01).unwrap_err().is_invalid_parameter());
        assert!(BloomFilter::new(10, 0.0).unwrap_err().is_invalid_parameter());
        assert!(BloomFilter::new(10, 1.0).unwrap_err().is_invalid_parameter());
        assert!(BloomFilter::new(10, f64::NAN).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_subnormal_error_rate_builds_small_filter() {
        let mut filter = BloomFilter::new(1, 1e-310).unwrap();
        assert_eq!(filter.num_slices(), 1030);
        assert_eq!(filter.bits_per_slice(), 2);
        assert!(filter.add("tiny").is_added());
        assert!(filter.contains("tiny"));

        let smallest = BloomFilter::new(1, f64::from_bits(1)).unwrap();
        assert!(smallest.num_slices() <= crate::core::params::MAX_NUM_SLICES);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_unallocatable_filter_is_error() {
        // One slice of ~1e17 bits: addressable, but no machine can back it.
        let err = BloomFilter::new(1 << 56, 0.5).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_add_reports_both_outcomes() {
        let mut filter = BloomFilter::new(100, 0.001).unwrap();
        assert_eq!(filter.add("x"), Insertion::Added);
        assert_eq!(filter.count(), 1);

        let before = filter.bits().clone();
        assert_eq!(filter.add("x"), Insertion::AlreadyPresent);
        assert_eq!(filter.count(), 1);
        assert_eq!(filter.bits(), &before);
    }

    #[test]
    fn test_one_bit_per_slice() {
        let mut filter = BloomFilter::new(100, 0.001).unwrap();
        filter.add("solo");
        let m = filter.bits_per_slice();
        for slice in 0..filter.num_slices() {
            let set = (0..m).filter(|&j| filter.bits().get(slice * m + j)).count();
            assert_eq!(set, 1, "slice {slice}");
        }
    }

    #[test]
    fn test_add_beyond_capacity_keeps_members() {
        let mut filter = BloomFilter::new(10, 0.01).unwrap();
        for i in 0..100u32 {
            filter.add(&i);
        }
        assert!(filter.is_at_capacity());
        assert!((0..100u32).all(|i| filter.contains(&i)));
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = BloomFilter::new(100, 0.001).unwrap();
        original.add("a");
        let mut copy = original.copy();
        assert_eq!(copy, original);

        copy.add("b");
        assert!(copy.contains("b"));
        assert!(!original.contains("b"));
        assert_eq!(original.count(), 1);
        assert_eq!(copy.count(), 2);
    }

    #[test]
    fn test_union_contains_both_halves() {
        let chars = letters();
        let (low, high) = chars.split_at(chars.len() / 2);
        let mut one = BloomFilter::new(100, 0.001).unwrap();
        let mut two = BloomFilter::new(100, 0.001).unwrap();
        high.iter().for_each(|c| {
            one.add(c);
        });
        low.iter().for_each(|c| {
            two.add(c);
        });

        let union = one.union(&two).unwrap();
        assert!(chars.iter().all(|c| union.contains(c)));
        assert_eq!(union.count(), 26);
    }

    #[test]
    fn test_intersection_keeps_shared_only() {
        let chars = letters();
        let (low, high) = chars.split_at(chars.len() / 2);
        let mut one = BloomFilter::new(100, 0.001).unwrap();
        let mut two = BloomFilter::new(100, 0.001).unwrap();
        chars.iter().for_each(|c| {
            one.add(c);
        });
        low.iter().for_each(|c| {
            two.add(c);
        });

        let inter = one.intersection(&two).unwrap();
        assert!(low.iter().all(|c| inter.contains(c)));
        assert!(high.iter().all(|c| !inter.contains(c)));
        assert_eq!(inter.count(), 13);
    }

    #[test]
    fn test_set_algebra_leaves_operands_untouched() {
        let mut one = BloomFilter::new(100, 0.001).unwrap();
        let mut two = BloomFilter::new(100, 0.001).unwrap();
        one.add("left");
        two.add("right");
        let (one_before, two_before) = (one.clone(), two.clone());

        let _ = one.union(&two).unwrap();
        let _ = one.intersection(&two).unwrap();
        assert_eq!(one, one_before);
        assert_eq!(two, two_before);
    }

    #[test]
    fn test_mismatch_rejected() {
        let big = BloomFilter::new(1000, 0.001).unwrap();
        let small = BloomFilter::new(100, 0.001).unwrap();
        let loose = BloomFilter::new(100, 0.01).unwrap();

        assert!(big.union(&small).unwrap_err().is_incompatible());
        assert!(big.intersection(&small).unwrap_err().is_incompatible());
        assert!(small.union(&loose).unwrap_err().is_incompatible());
        assert!(small.intersection(&loose).unwrap_err().is_incompatible());
        assert!(small.nstar_intersection(&loose).unwrap_err().is_incompatible());
    }

    #[test]
    fn test_nstar_tracks_distinct_items() {
        let mut filter = BloomFilter::new(1000, 0.001).unwrap();
        assert_eq!(filter.nstar(), 0);
        for i in 0..200u8 {
            filter.add(&char::from(i));
        }
        let n = filter.nstar();
        assert!((191..=209).contains(&n), "nstar {n}");
    }

    #[test]
    fn test_nstar_saturated() {
        let mut filter = BloomFilter::new(1, 0.5).unwrap();
        // One slice of two bits: a handful of items fills it.
        for i in 0..64u32 {
            filter.add(&i);
        }
        assert_eq!(filter.fill_ratio(), 1.0);
        assert_eq!(filter.nstar(), usize::MAX);
    }

    #[test]
    fn test_nstar_intersection_disjoint_near_zero() {
        let mut one = BloomFilter::new(200, 0.001).unwrap();
        let mut two = BloomFilter::new(200, 0.001).unwrap();
        for i in 0..100u8 {
            two.add(&char::from(i));
            one.add(&char::from(i + 100));
        }
        let shared = one.nstar_intersection(&two).unwrap();
        assert!(shared < 10, "shared {shared}");
        assert!(one.intersection(&two).unwrap().nstar() > 10);
    }

    #[test]
    fn test_from_parts_checks_payload_length() {
        let geometry = SliceGeometry::new(2, 8).unwrap();
        let short = BitVec::new(15).unwrap();
        assert!(BloomFilter::from_parts(4, 0.1, geometry, 0, short)
            .unwrap_err()
            .is_format());

        let bits = BitVec::new(16).unwrap();
        let filter = BloomFilter::from_parts(4, 0.1, geometry, 3, bits).unwrap();
        assert_eq!(filter.count(), 3);
        assert_eq!(filter.num_slices(), 2);
    }

    #[test]
    fn test_display_summarizes() {
        let mut filter = BloomFilter::new(100, 0.01).unwrap();
        filter.add("a");
        let text = filter.to_string();
        assert!(text.contains("capacity=100"));
        assert!(text.contains("slices=7x137"));
        assert!(text.contains("count=1"));
    }

    #[test]
    fn test_current_fp_rate_grows_with_load() {
        let mut filter = BloomFilter::new(100, 0.01).unwrap();
        assert_eq!(filter.current_fp_rate(), 0.0);
        for i in 0..100u32 {
            filter.add(&i);
        }
        let at_capacity = filter.current_fp_rate();
        assert!(at_capacity > 0.0 && at_capacity < 0.02);
    }
}
