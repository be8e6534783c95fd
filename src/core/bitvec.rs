//! Packed bit vector backing every Bloom filter.
//!
//! # Overview
//!
//! `BitVec` is a fixed-length bit array backed by `Box<[u64]>`. Each 64-bit
//! word stores 64 bits. Filters are single mutable units, so mutation takes
//! `&mut self` and no atomics are involved.
//!
//! # Memory Layout
//!
//! Bits are packed into 64-bit words in little-endian bit order:
//!
//! ```text
//! Word 0: [bit 0][bit 1]...[bit 63]
//! Word 1: [bit 64][bit 65]...[bit 127]
//! ```
//!
//! # Byte Packing
//!
//! The portable byte form packs 8 bits per byte, bit `i` at byte `i / 8`,
//! position `i % 8` (least significant first). A vector of `N` bits packs
//! into `ceil(N / 8)` bytes; pad bits in the final byte are zero on write
//! and cleared on read.
//!
//! # Examples
//!
//! ```
//! use scalebloom::core::bitvec::BitVec;
//!
//! let mut a = BitVec::new(64).unwrap();
//! let mut b = BitVec::new(64).unwrap();
//! a.set(10);
//! b.set(20);
//!
//! let union = a.union(&b).unwrap();
//! assert!(union.get(10) && union.get(20));
//!
//! let intersection = a.intersect(&b).unwrap();
//! assert_eq!(intersection.count_ones(), 0);
//! ```

use crate::error::{BloomError, Result};

/// Fixed-length packed bit array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVec {
    /// Storage words, each holding 64 bits.
    blocks: Box<[u64]>,

    /// Total number of bits in the vector.
    len: usize,
}

impl BitVec {
    /// Create a new bit vector with all `num_bits` bits cleared.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `num_bits` is 0 or the storage cannot
    /// be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use scalebloom::core::bitvec::BitVec;
    ///
    /// let bv = BitVec::new(1000).unwrap();
    /// assert_eq!(bv.len(), 1000);
    /// assert_eq!(bv.count_ones(), 0);
    /// ```
    pub fn new(num_bits: usize) -> Result<Self> {
        if num_bits == 0 {
            return Err(BloomError::invalid_parameter(
                "BitVec size must be greater than 0",
            ));
        }

        let words = num_bits.div_ceil(64);
        let mut blocks = Vec::new();
        blocks.try_reserve_exact(words).map_err(|_| {
            BloomError::invalid_parameter(format!(
                "cannot allocate {} bits ({} bytes)",
                num_bits,
                words.saturating_mul(8)
            ))
        })?;
        blocks.resize(words, 0u64);

        Ok(Self {
            blocks: blocks.into_boxed_slice(),
            len: num_bits,
        })
    }

    /// All-zero vector of `num_bits` bits, for small fixed sizes known to be
    /// positive.
    pub(crate) fn zeroed(num_bits: usize) -> Self {
        Self {
            blocks: vec![0u64; num_bits.div_ceil(64)].into_boxed_slice(),
            len: num_bits,
        }
    }

    /// Number of bits in the vector.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false` for a successfully constructed vector.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set a bit to 1. Idempotent.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`, matching slice indexing.
    #[inline]
    pub fn set(&mut self, index: usize) {
        assert!(
            index < self.len,
            "BitVec index out of bounds: index={} len={}",
            index,
            self.len
        );
        self.blocks[index / 64] |= 1u64 << (index % 64);
    }

    /// Read a bit.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(
            index < self.len,
            "BitVec index out of bounds: index={} len={}",
            index,
            self.len
        );
        (self.blocks[index / 64] >> (index % 64)) & 1 == 1
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.blocks.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Bitwise OR into a new vector.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if the vectors differ in length.
    pub fn union(&self, other: &Self) -> Result<Self> {
        self.combine(other, |a, b| a | b)
    }

    /// Bitwise AND into a new vector.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if the vectors differ in length.
    pub fn intersect(&self, other: &Self) -> Result<Self> {
        self.combine(other, |a, b| a & b)
    }

    fn combine(&self, other: &Self, op: impl Fn(u64, u64) -> u64) -> Result<Self> {
        if self.len != other.len {
            return Err(BloomError::length_mismatch(self.len, other.len));
        }

        let blocks = self
            .blocks
            .iter()
            .zip(other.blocks.iter())
            .map(|(&a, &b)| op(a, b))
            .collect();

        Ok(Self {
            blocks,
            len: self.len,
        })
    }

    /// Length of the packed byte form, `ceil(len / 8)`.
    #[must_use]
    #[inline]
    pub const fn byte_len(&self) -> usize {
        packed_len(self.len)
    }

    /// Pack the bits 8 per byte, least significant bit first.
    ///
    /// # Examples
    ///
    /// ```
    /// use scalebloom::core::bitvec::BitVec;
    ///
    /// let mut bv = BitVec::new(10).unwrap();
    /// bv.set(0);
    /// bv.set(9);
    /// assert_eq!(bv.to_bytes(), vec![0b0000_0001, 0b0000_0010]);
    /// ```
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        (0..self.byte_len())
            .map(|i| (self.blocks[i / 8] >> ((i % 8) * 8)) as u8)
            .collect()
    }

    /// Rebuild a vector of `len` bits from its packed byte form.
    ///
    /// Pad bits beyond `len` in the final byte are ignored.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `len` is 0
    /// - `Format` if `bytes.len() != ceil(len / 8)`
    pub fn from_bytes(bytes: &[u8], len: usize) -> Result<Self> {
        if bytes.len() != packed_len(len) {
            return Err(BloomError::format_error(format!(
                "bit payload is {} bytes, expected {} for {} bits",
                bytes.len(),
                packed_len(len),
                len
            )));
        }

        let mut bv = Self::new(len)?;

        for (i, &byte) in bytes.iter().enumerate() {
            bv.blocks[i / 8] |= u64::from(byte) << ((i % 8) * 8);
        }

        let tail = len % 64;
        if tail != 0 {
            if let Some(last) = bv.blocks.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }

        Ok(bv)
    }

    /// Heap bytes held by the vector.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.blocks.len() * std::mem::size_of::<u64>()
    }
}

/// Packed byte length of a vector of `num_bits` bits.
#[must_use]
#[inline]
pub const fn packed_len(num_bits: usize) -> usize {
    num_bits.div_ceil(8)
}
