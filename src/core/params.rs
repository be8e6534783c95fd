//! Parameter derivation for sliced Bloom filters.
//!
//! A filter sized for `n` items at false-positive rate `ε` is split into `k`
//! equal slices of `m` bits each, one hash index per slice:
//!
//! - `k = ⌈log₂(1/ε)⌉`
//! - `m = ⌈n × |ln ε| / (k × (ln 2)²)⌉`
//!
//! Both values are fixed at construction. Two filters are composable only if
//! their `(k, m)` pairs match exactly.
//!
//! # Cardinality Estimation
//!
//! With `X` set bits out of `T = k × m`, the number of distinct items that
//! produced the bit state is estimated as
//!
//! ```text
//! n* = -(T / k) × ln(1 - X / T)
//! ```
//!
//! # References
//!
//! - Almeida, Baquero, Preguiça & Hutchison (2007). "Scalable Bloom Filters"
//! - Swamidass & Baldi (2007). "Mathematical correction for fingerprint similarity measures"

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use crate::error::{BloomError, Result};
use std::f64::consts::LN_2;

/// Mathematical constant: (ln 2)² ≈ 0.4804530139182014
const LN2_SQUARED: f64 = LN_2 * LN_2;

/// Largest slice count any positive `f64` error rate produces.
///
/// The smallest positive `f64` is 2⁻¹⁰⁷⁴, so `⌈-log₂ ε⌉ ≤ 1074`; one more is
/// allowed for rounding in `log2`.
pub const MAX_NUM_SLICES: usize = 1075;

/// Slice layout of a filter: `num_slices` slices of `bits_per_slice` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceGeometry {
    /// Number of slices, `k`.
    pub num_slices: usize,
    /// Bits in each slice, `m`.
    pub bits_per_slice: usize,
}

impl SliceGeometry {
    /// Build a geometry from explicit values.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if either value is 0, `k` exceeds
    /// [`MAX_NUM_SLICES`], or `k × m` overflows `usize`.
    pub fn new(num_slices: usize, bits_per_slice: usize) -> Result<Self> {
        if num_slices == 0 || bits_per_slice == 0 {
            return Err(BloomError::invalid_parameter(format!(
                "slice geometry must be at least 1x1, got {}x{}",
                num_slices, bits_per_slice
            )));
        }
        if num_slices > MAX_NUM_SLICES {
            return Err(BloomError::invalid_parameter(format!(
                "{} slices exceeds the maximum of {}",
                num_slices, MAX_NUM_SLICES
            )));
        }
        if num_slices.checked_mul(bits_per_slice).is_none() {
            return Err(BloomError::invalid_parameter(format!(
                "{} slices of {} bits overflows the addressable bit count",
                num_slices, bits_per_slice
            )));
        }
        Ok(Self {
            num_slices,
            bits_per_slice,
        })
    }

    /// Total bits, `k × m`.
    #[must_use]
    #[inline]
    pub const fn total_bits(&self) -> usize {
        self.num_slices * self.bits_per_slice
    }
}

/// Reject capacities below 1.
///
/// # Errors
///
/// `InvalidParameter` if `capacity == 0`.
pub fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity < 1 {
        return Err(BloomError::invalid_parameter(format!(
            "capacity must be at least 1, got {}",
            capacity
        )));
    }
    Ok(())
}

/// Reject error rates outside the open interval (0, 1).
///
/// # Errors
///
/// `InvalidParameter` for NaN, infinities, and values outside (0, 1).
///
/// # Examples
///
/// ```
/// use scalebloom::core::params::validate_error_rate;
///
/// assert!(validate_error_rate(0.001).is_ok());
/// assert!(validate_error_rate(0.0).is_err());
/// assert!(validate_error_rate(1.0).is_err());
/// assert!(validate_error_rate(f64::NAN).is_err());
/// ```
pub fn validate_error_rate(error_rate: f64) -> Result<()> {
    if !(error_rate > 0.0 && error_rate < 1.0) {
        return Err(BloomError::invalid_parameter(format!(
            "error_rate {} is out of bounds, must be in (0, 1)",
            error_rate
        )));
    }
    Ok(())
}

/// Reject tightening ratios outside the open interval (0, 1).
///
/// # Errors
///
/// `InvalidParameter` for NaN, infinities, and values outside (0, 1).
pub fn validate_ratio(ratio: f64) -> Result<()> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(BloomError::invalid_parameter(format!(
            "ratio {} is out of bounds, must be in (0, 1)",
            ratio
        )));
    }
    Ok(())
}

/// Number of slices for an error rate: `⌈log₂(1/ε)⌉`, at least 1.
///
/// Computed as `⌈-log₂ ε⌉`, which stays finite for subnormal rates where
/// `1/ε` overflows. Assumes `error_rate` already passed
/// [`validate_error_rate`], so the result never exceeds [`MAX_NUM_SLICES`].
///
/// # Examples
///
/// ```
/// use scalebloom::core::params::num_slices;
///
/// assert_eq!(num_slices(0.001), 10);
/// assert_eq!(num_slices(0.01), 7);
/// assert_eq!(num_slices(0.5), 1);
/// ```
#[must_use]
pub fn num_slices(error_rate: f64) -> usize {
    ((-error_rate.log2()).ceil() as usize).clamp(1, MAX_NUM_SLICES)
}

/// Bits per slice: `⌈n × |ln ε| / (k × (ln 2)²)⌉`, at least 1.
///
/// The float-to-integer cast saturates for absurd capacities; callers go
/// through [`slice_geometry`] which rejects those.
///
/// # Examples
///
/// ```
/// use scalebloom::core::params::bits_per_slice;
///
/// assert_eq!(bits_per_slice(1000, 0.001, 10), 1438);
/// assert_eq!(bits_per_slice(100, 0.001, 10), 144);
/// ```
#[must_use]
pub fn bits_per_slice(capacity: usize, error_rate: f64, num_slices: usize) -> usize {
    let m = (capacity as f64 * error_rate.ln().abs()) / (num_slices as f64 * LN2_SQUARED);
    (m.ceil() as usize).max(1)
}

/// Validate `(capacity, error_rate)` and derive the slice geometry.
///
/// # Errors
///
/// `InvalidParameter` if the capacity or error rate is out of range, or the
/// resulting bit count cannot be addressed.
///
/// # Examples
///
/// ```
/// use scalebloom::core::params::slice_geometry;
///
/// let g = slice_geometry(1000, 0.001).unwrap();
/// assert_eq!((g.num_slices, g.bits_per_slice), (10, 1438));
/// assert_eq!(g.total_bits(), 14_380);
/// ```
pub fn slice_geometry(capacity: usize, error_rate: f64) -> Result<SliceGeometry> {
    validate_capacity(capacity)?;
    validate_error_rate(error_rate)?;

    let k = num_slices(error_rate);
    let raw_m = (capacity as f64 * error_rate.ln().abs()) / (k as f64 * LN2_SQUARED);
    if !raw_m.is_finite() || raw_m.ceil() >= usize::MAX as f64 {
        return Err(BloomError::invalid_parameter(format!(
            "capacity {} at error_rate {} needs {:.0} bits per slice, beyond addressable memory",
            capacity, error_rate, raw_m
        )));
    }

    SliceGeometry::new(k, bits_per_slice(capacity, error_rate, k))
}

/// Estimate distinct items from observed bit density.
///
/// Returns `usize::MAX` when every bit is set, where the estimator diverges.
///
/// # Examples
///
/// ```
/// use scalebloom::core::params::{estimate_items, SliceGeometry};
///
/// let g = SliceGeometry::new(10, 1438).unwrap();
/// assert_eq!(estimate_items(0, g), 0);
/// assert_eq!(estimate_items(g.total_bits(), g), usize::MAX);
/// ```
#[must_use]
pub fn estimate_items(set_bits: usize, geometry: SliceGeometry) -> usize {
    let total = geometry.total_bits();
    if set_bits >= total {
        return usize::MAX;
    }

    let t = total as f64;
    let k = geometry.num_slices as f64;
    let x = set_bits as f64;
    let n = -(t / k) * (1.0 - x / t).ln();

    n.round().max(0.0) as usize
}

/// Expected false-positive rate of a sliced filter after `n` distinct insertions.
///
/// Each slice holds one bit per item, so `p = (1 - (1 - 1/m)ⁿ)ᵏ`.
#[must_use]
pub fn expected_fp_rate(geometry: SliceGeometry, n: usize) -> f64 {
    let m = geometry.bits_per_slice as f64;
    let fill = 1.0 - (1.0 - 1.0 / m).powf(n as f64);
    fill.powi(geometry.num_slices as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_slices_matches_log2() {
        assert_eq!(num_slices(0.001), 10);
        assert_eq!(num_slices(0.01), 7);
        assert_eq!(num_slices(0.1), 4);
        assert_eq!(num_slices(0.25), 2);
        assert_eq!(num_slices(0.9), 1);
    }

    #[test]
    fn test_bits_per_slice_values() {
        assert_eq!(bits_per_slice(200, 0.001, 10), 288);
        assert_eq!(bits_per_slice(100, 0.01, 7), 137);
        assert_eq!(bits_per_slice(1, 0.9, 1), 1);
    }

    #[test]
    fn test_error_rate_changes_geometry() {
        let a = slice_geometry(100, 0.001).unwrap();
        let b = slice_geometry(100, 0.01).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(slice_geometry(0, 0.01).unwrap_err().is_invalid_parameter());
        assert!(slice_geometry(10, 0.0).unwrap_err().is_invalid_parameter());
        assert!(slice_geometry(10, 1.0).unwrap_err().is_invalid_parameter());
        assert!(slice_geometry(10, -0.5).unwrap_err().is_invalid_parameter());
        assert!(slice_geometry(10, f64::INFINITY).unwrap_err().is_invalid_parameter());
        assert!(validate_ratio(1.0).is_err());
        assert!(validate_ratio(0.0).is_err());
        assert!(validate_ratio(f64::NAN).is_err());
        assert!(validate_ratio(0.9).is_ok());
    }

    #[test]
    fn test_absurd_capacity_rejected() {
        assert!(slice_geometry(usize::MAX, 1e-300).is_err());
    }

    #[test]
    fn test_subnormal_error_rates_stay_bounded() {
        // 1/ε overflows to infinity below ~5.6e-309.
        assert_eq!(num_slices(1e-310), 1030);
        assert!(num_slices(f64::from_bits(1)) <= MAX_NUM_SLICES);
        assert!(num_slices(f64::MIN_POSITIVE) <= MAX_NUM_SLICES);

        let g = slice_geometry(1, 1e-310).unwrap();
        assert_eq!(g.num_slices, 1030);
        assert_eq!(g.bits_per_slice, 2);

        let tiniest = slice_geometry(1, f64::from_bits(1)).unwrap();
        assert!(tiniest.num_slices <= MAX_NUM_SLICES);
    }

    #[test]
    fn test_geometry_overflow_rejected() {
        assert!(SliceGeometry::new(usize::MAX, 1).is_err());
        assert!(SliceGeometry::new(MAX_NUM_SLICES + 1, 1).is_err());
        assert!(SliceGeometry::new(MAX_NUM_SLICES, 1).is_ok());
        assert!(SliceGeometry::new(usize::MAX, 2).is_err());
        assert!(SliceGeometry::new(0, 2).is_err());
        assert!(SliceGeometry::new(2, 0).is_err());
    }

    #[test]
    fn test_estimate_items_inverts_expected_fill() {
        let g = SliceGeometry::new(10, 1438).unwrap();
        // Expected set bits for 200 items: T × (1 - e^(-n/m)) per the occupancy formula.
        let t = g.total_bits() as f64;
        let expected_x = t * (1.0 - (-(200.0) / 1438.0f64).exp());
        let n = estimate_items(expected_x.round() as usize, g);
        assert!((195..=205).contains(&n), "estimate {n}");
    }

    #[test]
    fn test_expected_fp_rate_at_capacity() {
        let g = slice_geometry(1000, 0.01).unwrap();
        let p = expected_fp_rate(g, 1000);
        assert!(p <= 0.012, "fp rate {p}");
        assert_eq!(expected_fp_rate(g, 0), 0.0);
    }
}
