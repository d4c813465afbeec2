use std::collections::BTreeSet;

use uniqueness::{BloomFilter, ConfigError, HyperLogLog, ValidationError};

#[test]
fn test_filter_remembers_passwords() {
    let mut filter = BloomFilter::new(1000, 3).unwrap();
    filter.add("password123").unwrap();
    filter.add("admin123").unwrap();

    assert!(filter.check("password123").unwrap());
    assert!(filter.check("admin123").unwrap());
    assert!(!filter.check("totally-unseen-string").unwrap());
}

#[test]
fn test_filter_rejects_tab() {
    let mut filter = BloomFilter::new(10, 3).unwrap();

    filter.add("abc!!!").unwrap();
    let err = filter.add("abc!!!\t").unwrap_err();

    assert_eq!(
        err,
        ValidationError::InvalidCharacters {
            chars: BTreeSet::from(['\t'])
        }
    );
    assert!(err.to_string().contains("'\\t'"));
}

#[test]
fn test_filter_rejects_zero_parameters() {
    assert_eq!(BloomFilter::new(0, 3).unwrap_err(), ConfigError::ZeroSize);
    assert_eq!(BloomFilter::new(10, 0).unwrap_err(), ConfigError::ZeroHashes);
}

#[test]
fn test_estimator_ten_thousand_distinct() {
    let mut hll = HyperLogLog::new(10).unwrap();
    for i in 0..10_000 {
        hll.add(&format!("generated-string-{i}"));
    }

    let count = hll.count();
    assert!(
        (9_000..=11_000).contains(&count),
        "count {count} is not within 10% of 10000"
    );
}

#[test]
fn test_empty_estimator() {
    let hll = HyperLogLog::new(10).unwrap();

    assert_eq!(hll.registers().filter(|&rank| rank == 0).count(), 1024);
    assert_eq!(hll.count(), 0);
    assert_eq!(hll.count(), 0);
}

#[test]
fn test_estimator_accepts_any_text() {
    let mut hll = HyperLogLog::new(8).unwrap();
    for item in ["", " ", "\t", "ünïcödé", "10.0.0.1"] {
        hll.add(item);
    }
    assert!(hll.count() <= 5);
}
