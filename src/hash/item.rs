//! Canonical byte conversion for filter items.
//!
//! Filters hash bytes, not Rust values. [`ItemBytes`] is the narrow boundary
//! that turns an item into the byte sequence the hash scheme consumes:
//!
//! - text (`str`, `String`, `char`) encodes as UTF-8
//! - byte strings (`[u8]`, `Vec<u8>`, `[u8; N]`) pass through unchanged
//! - integers encode as their decimal text, so `42u32` and `"42"` address
//!   the same bits
//!
//! The encoding is part of the persisted format: a filter written by one
//! process and read by another answers the same queries only if both convert
//! items identically.
//!
//! # Examples
//!
//! ```
//! use scalebloom::hash::ItemBytes;
//!
//! assert_eq!(&*"hello".item_bytes(), b"hello");
//! assert_eq!(&*42u64.item_bytes(), b"42");
//! assert_eq!(&*(-7i32).item_bytes(), b"-7");
//! assert_eq!(&*'é'.item_bytes(), "é".as_bytes());
//! ```

use std::borrow::Cow;

/// Conversion of an item into the canonical bytes that get hashed.
pub trait ItemBytes {
    /// Canonical byte form of `self`.
    fn item_bytes(&self) -> Cow<'_, [u8]>;
}

impl ItemBytes for [u8] {
    #[inline]
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> ItemBytes for [u8; N] {
    #[inline]
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl ItemBytes for Vec<u8> {
    #[inline]
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl ItemBytes for str {
    #[inline]
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl ItemBytes for String {
    #[inline]
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl ItemBytes for Cow<'_, str> {
    #[inline]
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl ItemBytes for char {
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        let mut buf = [0u8; 4];
        Cow::Owned(self.encode_utf8(&mut buf).as_bytes().to_vec())
    }
}

impl<T: ItemBytes + ?Sized> ItemBytes for &T {
    #[inline]
    fn item_bytes(&self) -> Cow<'_, [u8]> {
        (**self).item_bytes()
    }
}

macro_rules! impl_item_bytes_for_integers {
    ($($t:ty),* $(,)?) => {
        $(
            impl ItemBytes for $t {
                fn item_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_string().into_bytes())
                }
            }
        )*
    };
}

impl_item_bytes_for_integers!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
