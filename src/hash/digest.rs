//! Salted SHA-512 index derivation.
//!
//! Derives `k` slice-local indices in `[0, m)` from an item's bytes:
//!
//! ```text
//! salt_i   = SHA-512(i as u64 LE)
//! digest_i = SHA-512(salt_i || item)          for i = 0, 1, ...
//! indices  = chunks of digest_0 || digest_1 || ...  (LE integers) mod m
//! ```
//!
//! The chunk width adapts to `m` so that each index carries enough entropy
//! without wasting digest material: 2 bytes below 2¹⁵ bits per slice, 4 bytes
//! below 2³¹, otherwise 8. Each 64-byte digest yields `64 / width` indices,
//! and more salts are chained in until `k` indices exist, so arbitrarily
//! large `k` is supported.
//!
//! No seed is involved: the same bytes produce the same indices in every
//! process, which is what makes persisted filters portable.
//!
//! # Examples
//!
//! ```
//! use scalebloom::hash::slice_indices;
//!
//! let a = slice_indices(b"hello", 10, 1438).unwrap();
//! let b = slice_indices(b"hello", 10, 1438).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 10);
//! assert!(a.iter().all(|&i| i < 1438));
//!
//! assert!(slice_indices(b"hello", 10, 0).is_err());
//! ```

#![allow(clippy::cast_possible_truncation)]

use crate::core::SliceGeometry;
use crate::error::Result;
use sha2::{Digest, Sha512};
use std::fmt;

/// Bytes produced by one SHA-512 digest.
const DIGEST_BYTES: usize = 64;

/// Chunk width in bytes for a slice of `bits_per_slice` bits.
#[must_use]
pub fn chunk_width(bits_per_slice: usize) -> usize {
    let m = bits_per_slice as u64;
    if m >= 1 << 31 {
        8
    } else if m >= 1 << 15 {
        4
    } else {
        2
    }
}

/// Precomputed salted hasher states for one `(k, m)` geometry.
///
/// Building the salts costs one digest each, so filters keep a `SliceHasher`
/// rather than recomputing salts on every query.
#[derive(Clone)]
pub struct SliceHasher {
    num_slices: usize,
    bits_per_slice: u64,
    width: usize,
    salts: Vec<Sha512>,
}

impl SliceHasher {
    /// Prepare a hasher producing `num_slices` indices in `[0, bits_per_slice)`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` under the same rules as [`SliceGeometry::new`].
    pub fn new(num_slices: usize, bits_per_slice: usize) -> Result<Self> {
        SliceGeometry::new(num_slices, bits_per_slice).map(Self::for_geometry)
    }

    /// Hasher for a geometry that already passed validation.
    pub(crate) fn for_geometry(geometry: SliceGeometry) -> Self {
        let SliceGeometry {
            num_slices,
            bits_per_slice,
        } = geometry;

        let width = chunk_width(bits_per_slice);
        let per_digest = DIGEST_BYTES / width;
        let num_salts = num_slices.div_ceil(per_digest);

        let salts = (0..num_salts as u64)
            .map(|i| Sha512::new_with_prefix(Sha512::digest(i.to_le_bytes())))
            .collect();

        Self {
            num_slices,
            bits_per_slice: bits_per_slice as u64,
            width,
            salts,
        }
    }

    /// Number of indices produced per item.
    #[must_use]
    #[inline]
    pub fn num_slices(&self) -> usize {
        self.num_slices
    }

    /// Exclusive upper bound of every index.
    #[must_use]
    #[inline]
    pub fn bits_per_slice(&self) -> usize {
        self.bits_per_slice as usize
    }

    /// Derive the `k` slice-local indices for `bytes`.
    #[must_use]
    pub fn indices(&self, bytes: &[u8]) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.num_slices);

        for salt in &self.salts {
            let mut hasher = salt.clone();
            hasher.update(bytes);
            let digest = hasher.finalize();

            for chunk in digest.chunks_exact(self.width) {
                if out.len() == self.num_slices {
                    return out;
                }
                out.push((decode_chunk(chunk) % self.bits_per_slice) as usize);
            }
        }

        out
    }
}

impl fmt::Debug for SliceHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceHasher")
            .field("num_slices", &self.num_slices)
            .field("bits_per_slice", &self.bits_per_slice)
            .field("width", &self.width)
            .field("salts", &self.salts.len())
            .finish()
    }
}

/// Little-endian unsigned integer from a 2, 4, or 8 byte chunk.
fn decode_chunk(chunk: &[u8]) -> u64 {
    chunk
        .iter()
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Stateless form of [`SliceHasher::indices`].
///
/// # Errors
///
/// `InvalidParameter` if the geometry is rejected by [`SliceGeometry::new`].
pub fn slice_indices(
    bytes: &[u8],
    num_slices: usize,
    bits_per_slice: usize,
) -> Result<Vec<usize>> {
    Ok(SliceHasher::new(num_slices, bits_per_slice)?.indices(bytes))
}
