//! Serde implementation for [`BloomFilter`].

use super::{check_version, FORMAT_VERSION};
use crate::codec::BloomHeader;
use crate::error::Result;
use crate::filters::BloomFilter;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serializable form of a Bloom filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BloomFilterSerde {
    version: u16,
    capacity: u64,
    error_rate: f64,
    num_slices: u64,
    bits_per_slice: u64,
    count: u64,
    /// Packed bits, LSB first, same layout as the binary codec.
    bits: Vec<u8>,
}

impl BloomFilterSerde {
    pub(crate) fn from_filter(filter: &BloomFilter) -> Self {
        Self {
            version: FORMAT_VERSION,
            capacity: filter.capacity() as u64,
            error_rate: filter.error_rate(),
            num_slices: filter.num_slices() as u64,
            bits_per_slice: filter.bits_per_slice() as u64,
            count: filter.count() as u64,
            bits: filter.bits().to_bytes(),
        }
    }

    /// Rebuild the filter, assuming the version was already checked.
    fn to_filter(&self) -> Result<BloomFilter> {
        BloomHeader::parse(
            self.error_rate,
            self.num_slices,
            self.bits_per_slice,
            self.capacity,
            self.count,
        )?
        .into_filter(&self.bits)
    }

    pub(crate) fn into_checked<E: de::Error>(self) -> std::result::Result<BloomFilter, E> {
        check_version(self.version)?;
        self.to_filter().map_err(E::custom)
    }
}

impl Serialize for BloomFilter {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        BloomFilterSerde::from_filter(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BloomFilter {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        BloomFilterSerde::deserialize(deserializer)?.into_checked()
    }
}
