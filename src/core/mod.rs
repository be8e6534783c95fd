//! Core types, traits, and utilities.
//!
//! This module contains the building blocks shared by every filter:
//!
//! - **Traits**: [`Membership`] and the [`Insertion`] outcome
//! - **Data Structures**: [`BitVec`] (packed bit vector)
//! - **Utilities**: slice geometry derivation and estimators in [`params`]
//!
//! # Module Organization
//!
//! ```text
//! core/
//! ├── filter.rs    - Membership trait, Insertion
//! ├── bitvec.rs    - Bit vector implementation
//! ├── params.rs    - Parameter calculations
//! └── mod.rs       - This file (public API)
//! ```
//!
//! # Examples
//!
//! ```
//! use scalebloom::core::params::slice_geometry;
//! use scalebloom::core::BitVec;
//!
//! let geometry = slice_geometry(10_000, 0.01).unwrap();
//! let mut bits = BitVec::new(geometry.total_bits()).unwrap();
//! bits.set(42);
//! assert_eq!(bits.count_ones(), 1);
//! ```

pub mod bitvec;
pub mod filter;
pub mod params;

pub use bitvec::BitVec;
pub use filter::{Insertion, Membership};
pub use params::{
    estimate_items, expected_fp_rate, slice_geometry, validate_capacity, validate_error_rate,
    validate_ratio, SliceGeometry,
};
