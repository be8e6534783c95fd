//! Item hashing.
//!
//! Turning an item into slice indices is a two-step pipeline:
//!
//! 1. [`ItemBytes`] converts the item into canonical bytes.
//! 2. [`SliceHasher`] derives `k` indices in `[0, m)` from those bytes with
//!    salted SHA-512.
//!
//! # Module Structure
//!
//! ```text
//! hash/
//! ├── item.rs    - ItemBytes canonical byte conversion
//! ├── digest.rs  - Salted SHA-512 index derivation
//! └── mod.rs     - This file (public API)
//! ```
//!
//! # Examples
//!
//! ```
//! use scalebloom::hash::{ItemBytes, SliceHasher};
//!
//! let hasher = SliceHasher::new(7, 137).unwrap();
//! let by_int = hasher.indices(&42u32.item_bytes());
//! let by_text = hasher.indices(&"42".item_bytes());
//! assert_eq!(by_int, by_text);
//! ```

pub mod digest;
pub mod item;

pub use digest::{chunk_width, slice_indices, SliceHasher};
pub use item::ItemBytes;
