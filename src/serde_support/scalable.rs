//! Serde implementation for [`ScalableBloomFilter`].

use super::bloom::BloomFilterSerde;
use super::{check_version, FORMAT_VERSION};
use crate::codec::{check_capacity, check_rate, check_ratio, CodecError};
use crate::error::Result;
use crate::filters::{GrowthMode, ScalableBloomFilter};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScalableBloomFilterSerde {
    version: u16,
    mode: GrowthMode,
    initial_capacity: u64,
    error_rate: f64,
    ratio: f64,
    /// Oldest first; the last entry is the active filter.
    filters: Vec<BloomFilterSerde>,
}

impl ScalableBloomFilterSerde {
    fn from_filter(filter: &ScalableBloomFilter) -> Self {
        Self {
            version: FORMAT_VERSION,
            mode: filter.mode(),
            initial_capacity: filter.initial_capacity() as u64,
            error_rate: filter.error_rate(),
            ratio: filter.ratio(),
            filters: filter
                .filters()
                .iter()
                .map(BloomFilterSerde::from_filter)
                .collect(),
        }
    }

    fn validate_config(&self) -> Result<usize> {
        let initial_capacity = check_capacity(self.initial_capacity)?;
        check_rate(self.error_rate)?;
        check_ratio(self.ratio)?;
        if self.filters.is_empty() {
            return Err(CodecError::NoSubFilters.into());
        }
        Ok(initial_capacity)
    }
}

impl Serialize for ScalableBloomFilter {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ScalableBloomFilterSerde::from_filter(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ScalableBloomFilter {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = ScalableBloomFilterSerde::deserialize(deserializer)?;
        check_version(repr.version)?;
        let initial_capacity = repr.validate_config().map_err(de::Error::custom)?;

        let filters = repr
            .filters
            .into_iter()
            .map(BloomFilterSerde::into_checked)
            .collect::<std::result::Result<Vec<_>, D::Error>>()?;

        ScalableBloomFilter::from_parts(
            repr.mode,
            initial_capacity,
            repr.error_rate,
            repr.ratio,
            filters,
        )
        .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grown() -> ScalableBloomFilter {
        let mut sbf = ScalableBloomFilter::new(50, 0.01, GrowthMode::LargeSetGrowth, 0.9).unwrap();
        for i in 0..400u32 {
            sbf.add(&i);
        }
        sbf
    }

    #[test]
    fn test_json_roundtrip_keeps_chain() {
        let sbf = grown();
        assert!(sbf.filter_count() > 1);

        let json = serde_json::to_string(&sbf).unwrap();
        let restored: ScalableBloomFilter = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, sbf);
        assert_eq!(restored.mode(), GrowthMode::LargeSetGrowth);
        for i in 0..400u32 {
            assert!(restored.contains(&i));
        }
    }

    #[test]
    fn test_bincode_roundtrip_then_grow() {
        let sbf = grown();
        let bytes = bincode::serialize(&sbf).unwrap();
        let mut restored: ScalableBloomFilter = bincode::deserialize(&bytes).unwrap();

        for i in 400..2000u32 {
            restored.add(&i);
        }
        assert!(restored.filter_count() > sbf.filter_count());
        assert!(restored.contains(&0u32));
        assert!(restored.contains(&1999u32));
    }

    #[test]
    fn test_rejects_empty_chain() {
        let mut repr = ScalableBloomFilterSerde::from_filter(&grown());
        repr.filters.clear();
        let json = serde_json::to_string(&repr).unwrap();

        let err = serde_json::from_str::<ScalableBloomFilter>(&json).unwrap_err();
        assert!(err.to_string().contains("sub-filter"));
    }

    #[test]
    fn test_rejects_bad_ratio() {
        let mut repr = ScalableBloomFilterSerde::from_filter(&grown());
        repr.ratio = 0.0;
        let json = serde_json::to_string(&repr).unwrap();
        assert!(serde_json::from_str::<ScalableBloomFilter>(&json).is_err());
    }

    #[test]
    fn test_rejects_corrupt_sub_filter() {
        let mut repr = ScalableBloomFilterSerde::from_filter(&grown());
        let bad = serde_json::to_value(&repr.filters[0]).unwrap();
        let mut bad = bad.as_object().unwrap().clone();
        bad.insert("version".into(), serde_json::json!(99));
        repr.filters[0] = serde_json::from_value(serde_json::Value::Object(bad)).unwrap();
        let json = serde_json::to_string(&repr).unwrap();
        assert!(serde_json::from_str::<ScalableBloomFilter>(&json).is_err());
    }
}
