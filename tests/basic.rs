//! Basic test - just to prove the filters work

use scalebloom::{BloomFilter, Insertion, ScalableBloomFilter};

#[test]
fn test_basic_add_and_find() {
    let mut filter = BloomFilter::new(100, 0.01).unwrap();

    assert_eq!(filter.add("test-item"), Insertion::Added);

    assert!(
        filter.contains("test-item"),
        "Should find the item we just added"
    );
}

#[test]
fn test_many_items() {
    let mut filter = BloomFilter::new(1000, 0.01).unwrap();

    let items = ["apple", "banana", "cherry"];
    for item in &items {
        filter.add(*item);
    }

    for item in &items {
        assert!(filter.contains(*item), "Should find {}", item);
    }
    assert_eq!(filter.count(), 3);
}

#[test]
fn test_no_false_negatives() {
    let mut filter = BloomFilter::new(1000, 0.01).unwrap();

    for i in 0..100u64 {
        filter.add(&i);
    }

    // All added items MUST be found
    for i in 0..100u64 {
        assert!(filter.contains(&i), "False negative for {}", i);
    }
}

#[test]
fn test_integers_and_their_text_are_the_same_item() {
    let mut filter = BloomFilter::new(100, 0.001).unwrap();
    filter.add(&42u32);

    assert!(filter.contains("42"));
    assert_eq!(filter.add("42"), Insertion::AlreadyPresent);
}

#[test]
fn test_scalable_basic() {
    let mut sbf = ScalableBloomFilter::default();
    for i in 0..500u32 {
        sbf.add(&i);
    }

    assert!(sbf.filter_count() > 1, "500 items should outgrow capacity 100");
    for i in 0..500u32 {
        assert!(sbf.contains(&i), "False negative for {}", i);
    }
}

#[test]
fn test_observed_false_positive_rate_near_target() {
    let mut filter = BloomFilter::new(10_000, 0.01).unwrap();
    for i in 0..10_000u32 {
        filter.add(&format!("member-{i}"));
    }

    let trials = 20_000u32;
    let hits = (0..trials)
        .filter(|i| filter.contains(&format!("outsider-{i}")))
        .count();
    let rate = hits as f64 / f64::from(trials);

    // Target 1%; allow generous slack for a single deterministic sample.
    assert!(rate < 0.02, "observed false-positive rate {rate}");
}
