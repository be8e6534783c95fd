//! Serde support for filters.
//!
//! Available with the `serde` feature:
//!
//! ```toml
//! [dependencies]
//! scalebloom = { version = "0.1", features = ["serde"] }
//! ```
//!
//! Filters serialize through a versioned intermediate representation holding
//! the configuration, the stored slice geometry and the packed bit payload.
//! Deserialization applies the same validation as the binary codec, so a
//! document that the codec would reject fails here too.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "serde")]
//! # {
//! use scalebloom::{BloomFilter, ScalableBloomFilter};
//!
//! let mut filter = BloomFilter::new(1000, 0.01).unwrap();
//! filter.add("hello");
//!
//! let json = serde_json::to_string(&filter).unwrap();
//! let restored: BloomFilter = serde_json::from_str(&json).unwrap();
//! assert!(restored.contains("hello"));
//!
//! let mut sbf = ScalableBloomFilter::default();
//! sbf.add(&7u64);
//! let bytes = bincode::serialize(&sbf).unwrap();
//! let restored: ScalableBloomFilter = bincode::deserialize(&bytes).unwrap();
//! assert_eq!(restored, sbf);
//! # }
//! ```

pub mod bloom;
pub mod scalable;

/// Version tag written into every serialized filter.
pub const FORMAT_VERSION: u16 = 1;

fn check_version<E: serde::de::Error>(version: u16) -> std::result::Result<(), E> {
    if version != FORMAT_VERSION {
        return Err(E::custom(format!(
            "incompatible serialization version: expected {FORMAT_VERSION}, got {version}"
        )));
    }
    Ok(())
}
