//! Shared membership contract for all filter kinds.
//!
//! Both [`BloomFilter`](crate::filters::BloomFilter) and
//! [`ScalableBloomFilter`](crate::filters::ScalableBloomFilter) implement
//! [`Membership`], so code that only needs "add" and "have I seen this" can be
//! generic over the filter kind.
//!
//! # Examples
//!
//! ```
//! use scalebloom::core::{Insertion, Membership};
//! use scalebloom::{BloomFilter, ScalableBloomFilter};
//!
//! fn dedup<F: Membership>(filter: &mut F, words: &[&str]) -> usize {
//!     words.iter().filter(|w| filter.add(*w).is_added()).count()
//! }
//!
//! let mut fixed = BloomFilter::new(100, 0.001).unwrap();
//! let mut growing = ScalableBloomFilter::default();
//! let words = ["a", "b", "a", "c", "b"];
//! assert_eq!(dedup(&mut fixed, &words), 3);
//! assert_eq!(dedup(&mut growing, &words), 3);
//! assert_eq!(growing.add("a"), Insertion::AlreadyPresent);
//! ```

use crate::hash::ItemBytes;

/// Outcome of adding an item to a filter.
///
/// Keeps "newly added" and "probably already present" as distinct variants
/// instead of a bare boolean whose meaning is easy to invert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Insertion {
    /// At least one addressed bit was clear; the bits were set and the count grew.
    Added,
    /// Every addressed bit was already set; nothing changed.
    AlreadyPresent,
}

impl Insertion {
    /// True if the filter changed.
    #[must_use]
    #[inline]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }

    /// True if the item was probably seen before.
    #[must_use]
    #[inline]
    pub const fn is_already_present(self) -> bool {
        matches!(self, Self::AlreadyPresent)
    }
}

/// Probabilistic set membership: no false negatives, bounded false positives.
pub trait Membership {
    /// Add an item, reporting whether it was already (probably) present.
    fn add<T: ItemBytes + ?Sized>(&mut self, item: &T) -> Insertion;

    /// Test membership. May return `true` for items never added; never
    /// returns `false` for an added item.
    fn contains<T: ItemBytes + ?Sized>(&self, item: &T) -> bool;

    /// Number of confirmed-new items added.
    fn count(&self) -> usize;

    /// Number of items the filter was sized for.
    fn capacity(&self) -> usize;

    /// True if nothing has been added.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_predicates() {
        assert!(Insertion::Added.is_added());
        assert!(!Insertion::Added.is_already_present());
        assert!(Insertion::AlreadyPresent.is_already_present());
        assert!(!Insertion::AlreadyPresent.is_added());
    }
}
