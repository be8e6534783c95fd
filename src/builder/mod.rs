//! Builder pattern for Bloom filter construction.
//!
//! # Design Philosophy
//!
//! ## Type-State Pattern
//!
//! [`BloomFilterBuilder`] uses the type-state pattern to enforce parameter
//! requirements at compile time: `error_rate` is only reachable after
//! `capacity`, and `build` only after both.
//!
//! [`ScalableBloomFilterBuilder`] has no required parameters; every setter
//! overrides a default.
//!
//! ## Error Handling
//!
//! - **Compile-time errors**: Missing required parameters
//! - **Runtime errors**: Invalid parameter values (out of range)
//!
//! # Examples
//!
//! ## Bloom Filter Builder
//!
//! ```
//! use scalebloom::builder::BloomFilterBuilder;
//!
//! // Type-safe: can't forget required parameters
//! let filter = BloomFilterBuilder::new()
//!     .capacity(10_000)
//!     .error_rate(0.01)
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.capacity(), 10_000);
//! ```
//!
//! ## Scalable Filter Builder
//!
//! ```
//! use scalebloom::builder::ScalableBloomFilterBuilder;
//! use scalebloom::GrowthMode;
//!
//! let filter = ScalableBloomFilterBuilder::new()
//!     .initial_capacity(1_000)
//!     .error_rate(0.01)
//!     .mode(GrowthMode::LargeSetGrowth) // Optional
//!     .ratio(0.85)                      // Optional
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.ratio(), 0.85);
//! ```
//!
//! # Builder Comparison
//!
//! | Builder | Required Parameters | Optional Parameters (default) |
//! |---------|---------------------|-------------------------------|
//! | Bloom | capacity, error_rate | none |
//! | Scalable | none | initial_capacity (100), error_rate (0.001), mode (small-set), ratio (0.9) |

#![allow(clippy::module_name_repetitions)]

pub mod scalable;
pub mod standard;

pub use scalable::ScalableBloomFilterBuilder;
pub use standard::{BloomFilterBuilder, FilterMetadata};

/// Prelude for convenient builder imports.
pub mod prelude {
    pub use super::{BloomFilterBuilder, ScalableBloomFilterBuilder};
}
