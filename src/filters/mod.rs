//! Bloom filter implementations.
//!
//! # Available Filters
//!
//! - [`BloomFilter`] - Fixed capacity, sliced bit layout, set algebra and
//!   cardinality estimation
//! - [`ScalableBloomFilter`] - Chain of Bloom filters that grows to absorb
//!   an unbounded number of items under a compounded error budget
//!
//! # Choosing a Filter
//!
//! | Filter | Use Case | Memory | Operations |
//! |--------|----------|--------|------------|
//! | [`BloomFilter`] | Known size | k × m bits | Add, Query, Union, Intersection, Estimate |
//! | [`ScalableBloomFilter`] | Unknown size | Grows geometrically | Add, Query, Union, Estimate |
//!
//! # Examples
//!
//! ## Bloom Filter
//!
//! ```
//! use scalebloom::filters::BloomFilter;
//!
//! let mut filter = BloomFilter::new(10_000, 0.01).unwrap();
//! filter.add("hello");
//! assert!(filter.contains("hello"));
//! ```
//!
//! ## Scalable Bloom Filter (dynamic growth)
//!
//! ```
//! use scalebloom::filters::ScalableBloomFilter;
//!
//! let mut filter = ScalableBloomFilter::default();
//!
//! // Can insert far more than initial capacity
//! for i in 0..10_000u32 {
//!     filter.add(&i);
//! }
//!
//! println!("Grew to {} sub-filters", filter.filter_count());
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod bloom;
pub use bloom::BloomFilter;

pub mod scalable;
pub use scalable::{GrowthMode, ScalableBloomFilter};
