//! Cache Hierarchy Tests.
//!
//! Verifies the walk from the nearest level to main memory, inclusive
//! allocation on the miss path, address-space enforcement, and the
//! telescoping of access counts between adjacent levels.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use warpcache_core::cache::{AccessOutcome, CacheHierarchy, MainMemory};
use warpcache_core::common::{AccessError, AccessEvent};

use crate::common::{geometry, l1_hit};

fn two_level(limit: u64) -> CacheHierarchy {
    CacheHierarchy::new(
        &[geometry("L1", 1, 1, 16), geometry("L2", 4, 2, 64)],
        limit,
    )
}

fn three_level(limit: u64) -> CacheHierarchy {
    CacheHierarchy::new(
        &[
            geometry("L1", 4, 2, 16),
            geometry("L2", 8, 2, 32),
            geometry("L3", 8, 4, 64),
        ],
        limit,
    )
}

// ══════════════════════════════════════════════════════════
// 1. Request walk
// ══════════════════════════════════════════════════════════

#[test]
fn cold_request_reaches_memory_then_hits_l1() {
    let mut h = two_level(1024);
    assert_eq!(h.load(0, 3), Ok(AccessOutcome::Memory));
    assert_eq!(h.load(3, 3), Ok(AccessOutcome::Level(0)));
    assert_eq!(h.memory().stats().load_count(), 1);
    assert_eq!(h.memory().stats().name, MainMemory::NAME);
}

/// A block evicted from L1 but still in L2 is serviced by L2.
#[test]
fn l1_victim_found_in_l2() {
    let mut h = two_level(1024);
    let _ = h.load(0, 3).unwrap();
    let _ = h.load(16, 3).unwrap(); // evicts block 0 from the single-line L1
    assert_eq!(h.load(0, 3), Ok(AccessOutcome::Level(1)));
    assert!(l1_hit(&mut h, 0));
}

/// Every level missed on the way down holds the block afterwards.
#[test]
fn miss_path_allocates_everywhere() {
    let mut h = two_level(1024);
    let _ = h.store(200, 3).unwrap();
    assert!(h.levels().iter().all(|level| level.contains(200)));
    assert_eq!(h.memory().stats().store_count(), 1);
    assert_eq!(h.memory().stats().load_count(), 0);
}

#[test]
fn issue_dispatches_on_kind() {
    let mut h = two_level(1024);
    let _ = h.issue(AccessEvent::load(0, 3)).unwrap();
    let _ = h.issue(AccessEvent::store(64, 3)).unwrap();
    let stats = h.stats();
    assert_eq!(stats.levels[0].load_count(), 1);
    assert_eq!(stats.levels[0].store_count(), 1);
}

// ══════════════════════════════════════════════════════════
// 2. Address space
// ══════════════════════════════════════════════════════════

#[test]
fn request_past_limit_is_rejected() {
    let mut h = two_level(48);
    assert_eq!(h.load(45, 3), Ok(AccessOutcome::Memory));
    assert_eq!(
        h.load(46, 3),
        Err(AccessError::AddressOutOfRange {
            address: 46,
            size: 3,
            limit: 48,
        })
    );
    assert!(h.store(48, 1).is_err());
    assert!(h.load(u64::MAX, 3).is_err());
    // Rejected requests leave no trace in the counters.
    assert_eq!(h.stats().levels[0].access_count(), 1);
}

#[test]
fn reset_clears_everything() {
    let mut h = two_level(1024);
    for addr in (0..512).step_by(8) {
        let _ = h.load(addr, 3).unwrap();
    }
    h.reset();
    let stats = h.stats();
    assert!(stats.levels.iter().all(|l| l.access_count() == 0));
    assert_eq!(stats.dram.access_count(), 0);
    assert!(!h.levels()[0].contains(0));
    assert_eq!(h.address_space_bytes(), 1024);
}

// ══════════════════════════════════════════════════════════
// 3. Telescoping
// ══════════════════════════════════════════════════════════

proptest! {
    /// Each level receives exactly the previous level's misses, per kind,
    /// and main memory receives the last level's misses.
    #[test]
    fn counts_telescope(trace in prop::collection::vec((any::<bool>(), 0u64..8189), 1..2000)) {
        let mut h = three_level(8192);
        for &(store, addr) in &trace {
            let outcome = if store { h.store(addr, 3) } else { h.load(addr, 3) };
            prop_assert!(outcome.is_ok());
        }

        let stats = h.stats();
        let first = &stats.levels[0];
        prop_assert_eq!(first.access_count(), trace.len() as u64);
        for pair in stats.levels.windows(2) {
            prop_assert_eq!(pair[1].load_count(), pair[0].load_misses);
            prop_assert_eq!(pair[1].store_count(), pair[0].store_misses);
        }
        let last = &stats.levels[2];
        prop_assert_eq!(stats.dram.load_count(), last.load_misses);
        prop_assert_eq!(stats.dram.store_count(), last.store_misses);
        prop_assert_eq!(stats.dram.miss_count(), 0);
    }
}
