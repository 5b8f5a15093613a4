//! Tests for the index search path
//!
//! These tests verify:
//! - Index reads stay within the binary-search bound
//! - Boundary keys (first, last, just outside) resolve correctly
//! - Batched window scans give the same answers as strict search
//! - The read cache removes repeat index reads
//! - Corrupt indexes (unsorted, duplicate, truncated) are rejected

#[path = "../common/mod.rs"]
mod common;

use common::{build_blob, ceil_log2, key, raw_blob, value, CountingSource, KEY_SIZE};
use rangekv::{Config, FormatError, LookupEngine, LookupError, MemorySource};

// =============================================================================
// Helper Functions
// =============================================================================

/// Record-at-a-time search, no cache: every step is one range read
fn strict_config() -> Config {
    Config::builder()
        .scan_threshold(1)
        .disable_read_cache()
        .build()
}

fn strict_engine(blob: bytes::Bytes) -> LookupEngine<CountingSource> {
    LookupEngine::with_config(CountingSource::new(blob), strict_config())
}

/// Index reads issued by one `find_record` call (trailer already loaded)
async fn index_reads_for(engine: &LookupEngine<CountingSource>, k: &[u8]) -> u64 {
    engine.trailer().await.unwrap();
    let before = engine.source().read_count();
    engine.find_record(k).await.unwrap();
    (engine.source().read_count() - before) as u64
}

// =============================================================================
// Read Bound Tests
// =============================================================================

#[tokio::test]
async fn test_index_reads_within_log_bound() {
    for &n in &[1u32, 2, 3, 7, 8, 9, 100, 1_000, 4_097] {
        // Keys 2, 4, 6, ... so odd targets are absent
        let engine = strict_engine(build_blob((1..=n).map(|i| i * 2)));
        let bound = ceil_log2(n as u64) + 1;

        let targets = [0, 1, 2, 3, n, n + 1, 2 * n - 1, 2 * n, 2 * n + 1, 10 * n];
        for &target in &targets {
            let reads = index_reads_for(&engine, &key(target)).await;
            assert!(
                reads <= bound,
                "n={} target={} used {} reads (bound {})",
                n,
                target,
                reads,
                bound
            );
        }
    }
}

#[tokio::test]
async fn test_batched_search_never_exceeds_strict_reads() {
    let blob = build_blob(0..300);
    let strict = strict_engine(blob.clone());
    let batched = LookupEngine::with_config(
        CountingSource::new(blob),
        Config::builder()
            .scan_threshold(16)
            .disable_read_cache()
            .build(),
    );

    for target in (0..320).step_by(7) {
        let strict_reads = index_reads_for(&strict, &key(target)).await;
        let batched_reads = index_reads_for(&batched, &key(target)).await;
        assert!(batched_reads <= strict_reads, "target {}", target);
    }
}

#[tokio::test]
async fn test_empty_index_issues_no_index_reads() {
    let engine = strict_engine(build_blob(std::iter::empty()));
    assert_eq!(index_reads_for(&engine, &key(0)).await, 0);
}

// =============================================================================
// Boundary Tests
// =============================================================================

#[tokio::test]
async fn test_boundary_keys() {
    // Smallest key is 10, largest is 20
    for config in [strict_config(), Config::default()] {
        let engine = LookupEngine::with_config(MemorySource::new(build_blob(10..=20)), config);

        assert_eq!(engine.lookup_key(&key(10)).await.unwrap().unwrap(), value(10));
        assert_eq!(engine.lookup_key(&key(20)).await.unwrap().unwrap(), value(20));
        assert!(engine.lookup_key(&key(9)).await.unwrap().is_none());
        assert!(engine.lookup_key(&key(21)).await.unwrap().is_none());
        assert!(engine.lookup_key(&[0u8; 32]).await.unwrap().is_none());
        assert!(engine.lookup_key(&[0xFFu8; 32]).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_unsigned_byte_ordering() {
    // 0x80 must sort after 0x7F (unsigned comparison)
    let low = [0x7Fu8; 32];
    let high = [0x80u8; 32];
    let mut builder = rangekv::BlobBuilder::new(32).unwrap();
    builder.add(high.to_vec(), &b"high"[..]).unwrap();
    builder.add(low.to_vec(), &b"low"[..]).unwrap();
    let engine = LookupEngine::with_config(
        MemorySource::new(builder.finish().unwrap()),
        strict_config(),
    );

    let first = engine.find_record(&low).await.unwrap().unwrap();
    assert_eq!(first.value_offset, 0);
    assert_eq!(engine.lookup_key(&low).await.unwrap().unwrap(), &b"low"[..]);
    assert_eq!(engine.lookup_key(&high).await.unwrap().unwrap(), &b"high"[..]);
}

#[tokio::test]
async fn test_batched_and_strict_agree() {
    let blob = build_blob((0..120).map(|i| i * 3));
    let strict = LookupEngine::with_config(MemorySource::new(blob.clone()), strict_config());
    let batched = LookupEngine::with_config(
        MemorySource::new(blob),
        Config::builder().scan_threshold(32).build(),
    );

    for target in 0..370 {
        let a = strict.lookup_key(&key(target)).await.unwrap();
        let b = batched.lookup_key(&key(target)).await.unwrap();
        assert_eq!(a, b, "target {}", target);
    }
}

// =============================================================================
// Read Cache Tests
// =============================================================================

#[tokio::test]
async fn test_cache_serves_repeat_index_reads() {
    let engine = LookupEngine::with_config(
        CountingSource::new(build_blob(0..1_000)),
        Config::builder().scan_threshold(1).build(),
    );

    engine.lookup_key(&key(421)).await.unwrap();
    let reads_before = engine.source().read_count();
    let hits_before = engine.stats().cache_hits;

    assert_eq!(engine.lookup_key(&key(421)).await.unwrap().unwrap(), value(421));

    // Only the value read reaches the source
    assert_eq!(engine.source().read_count(), reads_before + 1);
    assert!(engine.stats().cache_hits > hits_before);
    assert!(engine.cached_ranges() > 0);
}

#[tokio::test]
async fn test_disabled_cache_rereads() {
    let engine = strict_engine(build_blob(0..1_000));

    engine.lookup_key(&key(421)).await.unwrap();
    let first = engine.source().read_count();
    engine.lookup_key(&key(421)).await.unwrap();

    // trailer is read once, everything else again
    assert_eq!(engine.source().read_count(), 2 * first - 1);
    assert_eq!(engine.stats().cache_hits, 0);
    assert_eq!(engine.cached_ranges(), 0);
}

#[tokio::test]
async fn test_cache_capacity_is_respected() {
    let engine = LookupEngine::with_config(
        MemorySource::new(build_blob(0..1_000)),
        Config::builder()
            .scan_threshold(1)
            .read_cache_capacity(3)
            .build(),
    );

    for i in (0..1_000).step_by(37) {
        assert_eq!(engine.lookup_key(&key(i)).await.unwrap().unwrap(), value(i));
    }
    assert_eq!(engine.cached_ranges(), 3);
}

// =============================================================================
// Corrupt Index Tests
// =============================================================================

#[tokio::test]
async fn test_unsorted_index_detected() {
    let keys: Vec<Vec<u8>> = [5, 7, 3, 9, 1].iter().map(|&i| key(i)).collect();
    let blob = raw_blob(&keys, KEY_SIZE);

    // strict: mid=2 (key 3) > 2, then mid=1 (key 7) is not below key 3
    let strict = LookupEngine::with_config(MemorySource::new(blob.clone()), strict_config());
    let err = strict.lookup_key(&key(2)).await.unwrap_err();
    assert_eq!(
        err.as_format(),
        Some(&FormatError::UnsortedIndex { position: 1 })
    );

    // batched: the whole window is checked, key 3 follows key 7
    let batched = LookupEngine::new(MemorySource::new(blob));
    let err = batched.lookup_key(&key(2)).await.unwrap_err();
    assert_eq!(
        err.as_format(),
        Some(&FormatError::UnsortedIndex { position: 2 })
    );
}

#[tokio::test]
async fn test_duplicate_keys_detected() {
    let keys: Vec<Vec<u8>> = [1, 3, 3].iter().map(|&i| key(i)).collect();
    let blob = raw_blob(&keys, KEY_SIZE);

    // mid=1 (key 3) < 4, then mid=2 (key 3) is not above it
    let strict = LookupEngine::with_config(MemorySource::new(blob.clone()), strict_config());
    let err = strict.lookup_key(&key(4)).await.unwrap_err();
    assert_eq!(
        err.as_format(),
        Some(&FormatError::UnsortedIndex { position: 2 })
    );

    let batched = LookupEngine::new(MemorySource::new(blob));
    assert!(matches!(
        batched.lookup_key(&key(3)).await,
        Err(LookupError::Format(FormatError::UnsortedIndex { position: 2 }))
    ));
}

#[tokio::test]
async fn test_short_record_read_is_truncated_record() {
    let engine = strict_engine(build_blob(0..3));
    let trailer = engine.trailer().await.unwrap();
    let mid = trailer.record_range(1);
    engine.source().short_read_at(mid.start);

    let err = engine.lookup_key(&key(1)).await.unwrap_err();
    assert_eq!(
        err.as_format(),
        Some(&FormatError::TruncatedRecord {
            position: 1,
            expected: trailer.record_size() as usize,
            actual: trailer.record_size() as usize - 1,
        })
    );
}

#[tokio::test]
async fn test_short_window_read_is_truncated_record() {
    let engine = LookupEngine::with_config(
        CountingSource::new(build_blob(0..5)),
        Config::builder().scan_threshold(8).build(),
    );
    let trailer = engine.trailer().await.unwrap();
    let window = trailer.records_range(0, 5);
    engine.source().short_read_at(window.start);

    let err = engine.lookup_key(&key(2)).await.unwrap_err();
    assert!(matches!(
        err.as_format(),
        Some(FormatError::TruncatedRecord { position: 0, .. })
    ));

    // A truncated read never enters the cache
    assert_eq!(engine.cached_ranges(), 0);
}
