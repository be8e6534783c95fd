//! scalebloom: sliced and scalable Bloom filters.
//!
//! A Bloom filter answers "have I seen this item?" in constant memory. It
//! never forgets an item it was given (no false negatives) and occasionally
//! claims to have seen one it was not (false positives, bounded by a
//! configured error rate).
//!
//! This crate provides:
//!
//! - [`BloomFilter`]: a fixed-capacity *sliced* filter. Its bits are split
//!   into `k` equal slices, each addressed by one salted SHA-512 derived
//!   index. Filters with the same geometry support union, intersection and
//!   cardinality estimation.
//! - [`ScalableBloomFilter`]: a chain of Bloom filters that grows on demand
//!   while keeping the compounded false-positive rate below its target.
//! - A portable little-endian binary format ([`codec`]) and, behind the
//!   `serde` feature, serde implementations for both filter kinds.
//!
//! Hashing is seedless and deterministic, so a filter written by one process
//! answers the same queries when read by another.
//!
//! # Quick Start
//!
//! ```
//! use scalebloom::{BloomFilter, Insertion};
//!
//! # fn main() -> scalebloom::Result<()> {
//! let mut filter = BloomFilter::new(10_000, 0.01)?;
//!
//! assert_eq!(filter.add("hello"), Insertion::Added);
//! assert_eq!(filter.add("hello"), Insertion::AlreadyPresent);
//!
//! assert!(filter.contains("hello"));
//! assert_eq!(filter.count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Growing Without a Known Size
//!
//! ```
//! use scalebloom::{GrowthMode, ScalableBloomFilter};
//!
//! # fn main() -> scalebloom::Result<()> {
//! let mut sbf = ScalableBloomFilter::new(100, 0.001, GrowthMode::SmallSetGrowth, 0.9)?;
//! for i in 0..1_000u32 {
//!     sbf.add(&i);
//! }
//! assert!(sbf.filter_count() > 1);
//! assert!((0..1_000u32).all(|i| sbf.contains(&i)));
//! # Ok(())
//! # }
//! ```
//!
//! # Set Algebra
//!
//! ```
//! use scalebloom::BloomFilter;
//!
//! # fn main() -> scalebloom::Result<()> {
//! let mut left = BloomFilter::new(100, 0.001)?;
//! let mut right = BloomFilter::new(100, 0.001)?;
//! left.add("a");
//! right.add("b");
//!
//! let both = left.union(&right)?;
//! assert!(both.contains("a") && both.contains("b"));
//!
//! let mismatched = BloomFilter::new(200, 0.001)?;
//! assert!(left.union(&mismatched).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! # Using Builders
//!
//! ```
//! use scalebloom::builder::BloomFilterBuilder;
//!
//! # fn main() -> scalebloom::Result<()> {
//! let filter = BloomFilterBuilder::new()
//!     .capacity(1000)
//!     .error_rate(0.001)
//!     .build()?;
//! assert_eq!(filter.num_slices(), 10);
//! assert_eq!(filter.bits_per_slice(), 1438);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`BloomFilter`],
//!   [`ScalableBloomFilter`] and [`GrowthMode`].
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber:
//! `debug` when a scalable filter grows or refuses to, `trace` when a filter
//! is decoded.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::manual_range_contains)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Builders for filter construction
pub mod builder;

/// Binary encoding and decoding of filter state
pub mod codec;

/// Bit storage, geometry math and the shared membership trait
pub mod core;

/// Error types and result aliases
pub mod error;

/// Filter implementations
pub mod filters;

/// Item encoding and index derivation
pub mod hash;

/// Serde implementations (requires `serde` feature)
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod serde_support;

pub use crate::builder::{BloomFilterBuilder, FilterMetadata, ScalableBloomFilterBuilder};
pub use crate::codec::CodecError;
pub use crate::core::{Insertion, Membership};
pub use crate::error::{BloomError, Result};
pub use crate::filters::{BloomFilter, GrowthMode, ScalableBloomFilter};
pub use crate::hash::ItemBytes;

/// Common imports.
///
/// ```
/// use scalebloom::prelude::*;
///
/// let mut filter = BloomFilter::new(1000, 0.01).unwrap();
/// filter.add("hello");
/// assert!(filter.contains("hello"));
/// ```
pub mod prelude {
    pub use crate::builder::{BloomFilterBuilder, ScalableBloomFilterBuilder};
    pub use crate::core::{Insertion, Membership};
    pub use crate::error::{BloomError, Result};
    pub use crate::filters::{BloomFilter, GrowthMode, ScalableBloomFilter};
    pub use crate::hash::ItemBytes;
}
