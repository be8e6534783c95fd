//! Binary serialization of filter state.
//!
//! Turns a filter into a self-describing byte stream and back. The format is
//! compact, platform-independent, and has no magic or version prefix; wrap
//! it in an envelope if long-term compatibility across layout changes
//! matters.
//!
//! # Format
//!
//! All integers are little-endian `u64`, all floats little-endian IEEE-754
//! `f64`.
//!
//! ```text
//! [Bloom filter]
//!   error_rate:      8 bytes (f64)
//!   num_slices:      8 bytes (u64)
//!   bits_per_slice:  8 bytes (u64)
//!   capacity:        8 bytes (u64)
//!   count:           8 bytes (u64)
//!   bits:            ceil(num_slices × bits_per_slice / 8) bytes
//!                    bit i at byte i / 8, position i % 8 (LSB first)
//!
//! [Scalable Bloom filter]
//!   multiplier:       8 bytes (u64, 2 or 4)
//!   initial_capacity: 8 bytes (u64)
//!   error_rate:       8 bytes (f64)
//!   ratio:            8 bytes (f64)
//!   filter_count:     8 bytes (u64, >= 1)
//!   filters:          filter_count × [Bloom filter], oldest first
//! ```
//!
//! The slice geometry is stored rather than re-derived so that a restored
//! filter addresses exactly the bits it was written with.
//!
//! # Errors
//!
//! Truncated or malformed input fails with [`BloomError::Format`]; no
//! partial filter is ever returned. Failures of the underlying sink or
//! source other than truncation surface as [`BloomError::Io`].
//!
//! # Examples
//!
//! ```
//! use scalebloom::{BloomFilter, ScalableBloomFilter};
//!
//! # fn main() -> scalebloom::Result<()> {
//! let mut filter = BloomFilter::new(1000, 0.01)?;
//! filter.add("hello");
//!
//! let bytes = filter.to_bytes();
//! assert_eq!(bytes.len(), filter.encoded_len());
//!
//! let restored = BloomFilter::from_bytes(&bytes)?;
//! assert_eq!(restored, filter);
//! assert!(restored.contains("hello"));
//!
//! // Any `Read`/`Write` works, e.g. files or sockets.
//! let mut sbf = ScalableBloomFilter::default();
//! sbf.add(&42u64);
//! let mut buffer = Vec::new();
//! sbf.write_to(&mut buffer)?;
//! let restored = ScalableBloomFilter::read_from(&mut buffer.as_slice())?;
//! assert!(restored.contains(&42u64));
//! # Ok(())
//! # }
//! ```

mod wire;

use crate::core::bitvec::{packed_len, BitVec};
use crate::core::params::MAX_NUM_SLICES;
use crate::core::SliceGeometry;
use crate::error::{BloomError, Result};
use crate::filters::{BloomFilter, GrowthMode, ScalableBloomFilter};
use std::io::{Read, Write};
use tracing::trace;
use wire::{put_f64, put_u64, put_usize, read_f64, read_payload, read_u64, to_usize, FIELD_LEN};

/// Fixed header length of an encoded Bloom filter.
pub const BLOOM_HEADER_LEN: usize = 5 * FIELD_LEN;

/// Fixed header length of an encoded scalable Bloom filter.
pub const SCALABLE_HEADER_LEN: usize = 5 * FIELD_LEN;

/// Detailed decoding failures.
///
/// Every variant converts into [`BloomError::Format`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// Stored error rate outside (0, 1)
    #[error("error rate {0} is not in (0, 1)")]
    InvalidErrorRate(f64),

    /// Stored tightening ratio outside (0, 1)
    #[error("ratio {0} is not in (0, 1)")]
    InvalidRatio(f64),

    /// Stored capacity of zero
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    /// Slice geometry with a zero dimension or an unaddressable bit count
    #[error("invalid slice geometry {num_slices}x{bits_per_slice}")]
    InvalidGeometry {
        /// Stored slice count
        num_slices: u64,
        /// Stored bits per slice
        bits_per_slice: u64,
    },

    /// More slices than any valid error rate produces
    #[error("slice geometry has {num_slices} slices, at most {max} are possible")]
    TooManySlices {
        /// Stored slice count
        num_slices: u64,
        /// Largest slice count a valid error rate yields
        max: usize,
    },

    /// Growth multiplier that names no growth mode
    #[error("unknown growth multiplier {0} (expected 2 or 4)")]
    UnknownMultiplier(u64),

    /// Scalable stream announcing zero sub-filters
    #[error("scalable filter must hold at least one sub-filter")]
    NoSubFilters,

    /// Stored value does not fit this platform's `usize`
    #[error("{field} value {value} does not fit in usize")]
    ValueTooLarge {
        /// Header field name
        field: &'static str,
        /// Stored value
        value: u64,
    },

    /// Stream ended inside the bit payload
    #[error("bit payload truncated: expected {expected} bytes, got {actual}")]
    TruncatedPayload {
        /// Announced payload length
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// Bytes left over after a complete filter
    #[error("{0} trailing bytes after encoded filter")]
    TrailingBytes(usize),
}

impl From<CodecError> for BloomError {
    fn from(err: CodecError) -> Self {
        BloomError::format_error(err.to_string())
    }
}

pub(crate) fn check_rate(error_rate: f64) -> Result<()> {
    if !(error_rate > 0.0 && error_rate < 1.0) {
        return Err(CodecError::InvalidErrorRate(error_rate).into());
    }
    Ok(())
}

pub(crate) fn check_ratio(ratio: f64) -> Result<()> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(CodecError::InvalidRatio(ratio).into());
    }
    Ok(())
}

pub(crate) fn check_capacity(capacity: u64) -> Result<usize> {
    if capacity == 0 {
        return Err(CodecError::ZeroCapacity.into());
    }
    to_usize("capacity", capacity)
}

/// Validated Bloom filter header, ready to receive its bit payload.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BloomHeader {
    error_rate: f64,
    geometry: SliceGeometry,
    capacity: usize,
    count: usize,
}

impl BloomHeader {
    /// Validate raw header fields as stored.
    pub(crate) fn parse(
        error_rate: f64,
        num_slices: u64,
        bits_per_slice: u64,
        capacity: u64,
        count: u64,
    ) -> Result<Self> {
        check_rate(error_rate)?;
        let capacity = check_capacity(capacity)?;
        let count = to_usize("count", count)?;

        if num_slices > MAX_NUM_SLICES as u64 {
            return Err(CodecError::TooManySlices {
                num_slices,
                max: MAX_NUM_SLICES,
            }
            .into());
        }

        let invalid_geometry = || CodecError::InvalidGeometry {
            num_slices,
            bits_per_slice,
        };
        let geometry = SliceGeometry::new(
            usize::try_from(num_slices).map_err(|_| invalid_geometry())?,
            usize::try_from(bits_per_slice).map_err(|_| invalid_geometry())?,
        )
        .map_err(|_| invalid_geometry())?;

        Ok(Self {
            error_rate,
            geometry,
            capacity,
            count,
        })
    }

    /// Bytes of packed bits that must follow this header.
    pub(crate) fn payload_len(&self) -> usize {
        packed_len(self.geometry.total_bits())
    }

    /// Attach the packed bit payload.
    pub(crate) fn into_filter(self, payload: &[u8]) -> Result<BloomFilter> {
        let bits = BitVec::from_bytes(payload, self.geometry.total_bits())?;
        BloomFilter::from_parts(self.capacity, self.error_rate, self.geometry, self.count, bits)
    }
}

/// Decode from a byte slice, rejecting anything after the filter.
fn decode_exact<T>(
    bytes: &[u8],
    decode: impl FnOnce(&mut &[u8]) -> Result<T>,
) -> Result<T> {
    let mut cursor = bytes;
    let value = decode(&mut cursor)?;
    if !cursor.is_empty() {
        return Err(CodecError::TrailingBytes(cursor.len()).into());
    }
    Ok(value)
}

impl BloomFilter {
    fn encode_header(&self, out: &mut Vec<u8>) {
        put_f64(out, self.error_rate());
        put_usize(out, self.num_slices());
        put_usize(out, self.bits_per_slice());
        put_usize(out, self.capacity());
        put_usize(out, self.count());
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        self.encode_header(out);
        out.extend_from_slice(&self.bits().to_bytes());
    }

    /// Exact length of [`to_bytes`](Self::to_bytes) output.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        BLOOM_HEADER_LEN + packed_len(self.num_bits())
    }

    /// Encode the full filter state.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    /// Write the encoded filter to `writer`.
    ///
    /// # Errors
    ///
    /// [`BloomError::Io`] if the writer fails.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let mut header = Vec::with_capacity(BLOOM_HEADER_LEN);
        self.encode_header(&mut header);
        writer.write_all(&header)?;
        writer.write_all(&self.bits().to_bytes())?;
        Ok(())
    }

    /// Read one encoded filter from `reader`, consuming exactly its bytes.
    ///
    /// # Errors
    ///
    /// [`BloomError::Format`] on truncated or malformed input,
    /// [`BloomError::Io`] if the reader fails otherwise.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let error_rate = read_f64(reader)?;
        let num_slices = read_u64(reader)?;
        let bits_per_slice = read_u64(reader)?;
        let capacity = read_u64(reader)?;
        let count = read_u64(reader)?;

        let header = BloomHeader::parse(error_rate, num_slices, bits_per_slice, capacity, count)?;
        let payload = read_payload(reader, header.payload_len())?;
        let filter = header.into_filter(&payload)?;

        trace!(
            capacity = filter.capacity(),
            error_rate,
            num_slices = filter.num_slices(),
            bits_per_slice = filter.bits_per_slice(),
            count = filter.count(),
            "decoded bloom filter"
        );
        Ok(filter)
    }

    /// Decode a filter from a byte slice holding exactly one encoded filter.
    ///
    /// # Errors
    ///
    /// [`BloomError::Format`] on truncated or malformed input, or if bytes
    /// remain after the filter.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_exact(bytes, |cursor| Self::read_from(cursor))
    }
}

impl ScalableBloomFilter {
    fn encode_header(&self, out: &mut Vec<u8>) {
        put_usize(out, self.mode().multiplier());
        put_usize(out, self.initial_capacity());
        put_f64(out, self.error_rate());
        put_f64(out, self.ratio());
        put_usize(out, self.filter_count());
    }

    /// Exact length of [`to_bytes`](Self::to_bytes) output.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        SCALABLE_HEADER_LEN
            + self
                .filters()
                .iter()
                .map(BloomFilter::encoded_len)
                .sum::<usize>()
    }

    /// Encode the configuration and every sub-filter, oldest first.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_header(&mut out);
        for filter in self.filters() {
            filter.encode_into(&mut out);
        }
        out
    }

    /// Write the encoded filter to `writer`, one sub-filter at a time.
    ///
    /// # Errors
    ///
    /// [`BloomError::Io`] if the writer fails.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let mut header = Vec::with_capacity(SCALABLE_HEADER_LEN);
        self.encode_header(&mut header);
        writer.write_all(&header)?;
        for filter in self.filters() {
            filter.write_to(writer)?;
        }
        Ok(())
    }

    /// Read one encoded scalable filter from `reader`.
    ///
    /// The last decoded sub-filter becomes the active insertion target.
    ///
    /// # Errors
    ///
    /// [`BloomError::Format`] on truncated or malformed input,
    /// [`BloomError::Io`] if the reader fails otherwise.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let multiplier = read_u64(reader)?;
        let initial_capacity = read_u64(reader)?;
        let error_rate = read_f64(reader)?;
        let ratio = read_f64(reader)?;
        let filter_count = read_u64(reader)?;

        let mode =
            GrowthMode::from_multiplier(multiplier).ok_or(CodecError::UnknownMultiplier(multiplier))?;
        let initial_capacity = check_capacity(initial_capacity)?;
        check_rate(error_rate)?;
        check_ratio(ratio)?;
        if filter_count == 0 {
            return Err(CodecError::NoSubFilters.into());
        }

        // Grown per decoded filter; the announced count is not trusted.
        let mut filters = Vec::new();
        for _ in 0..filter_count {
            filters.push(BloomFilter::read_from(reader)?);
        }

        let filter =
            ScalableBloomFilter::from_parts(mode, initial_capacity, error_rate, ratio, filters)?;
        trace!(
            mode = %mode,
            initial_capacity,
            filters = filter.filter_count(),
            count = filter.count(),
            "decoded scalable bloom filter"
        );
        Ok(filter)
    }

    /// Decode from a byte slice holding exactly one encoded scalable filter.
    ///
    /// # Errors
    ///
    /// [`BloomError::Format`] on truncated or malformed input, or if bytes
    /// remain after the filter.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_exact(bytes, |cursor| Self::read_from(cursor))
    }
}
