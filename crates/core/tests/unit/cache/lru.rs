//! LRU Replacement Policy Tests.
//!
//! Exercises `LruPolicy` in isolation through the `ReplacementPolicy` trait:
//! initial victim, reordering on access, per-set independence, and reset.

use warpcache_core::cache::policies::{self, LruPolicy, ReplacementPolicy};
use warpcache_core::config::ReplacementPolicy as PolicyType;

// ══════════════════════════════════════════════════════════
// 1. Victim selection
// ══════════════════════════════════════════════════════════

/// Initial stack is [0, 1, 2, 3] with index 0 as MRU, so way 3 is the victim.
#[test]
fn initial_victim_is_last_way() {
    let mut policy = LruPolicy::new(1, 4);
    assert_eq!(policy.stack(0), &[0, 1, 2, 3]);
    assert_eq!(policy.get_victim(0), 3);
}

/// Filling ways 0..4 in order leaves way 0 least recent.
#[test]
fn sequential_fill_reorders() {
    let mut policy = LruPolicy::new(1, 4);
    for way in 0..4 {
        policy.update(0, way);
    }
    assert_eq!(policy.stack(0), &[3, 2, 1, 0]);
    assert_eq!(policy.get_victim(0), 0);
}

/// Re-accessing the LRU way promotes it; the next oldest becomes the victim.
#[test]
fn reaccess_promotes_to_mru() {
    let mut policy = LruPolicy::new(1, 4);
    for way in 0..4 {
        policy.update(0, way);
    }

    policy.update(0, 0);
    assert_eq!(policy.stack(0), &[0, 3, 2, 1]);
    assert_eq!(policy.get_victim(0), 1);

    policy.update(0, 1);
    assert_eq!(policy.get_victim(0), 2);
}

#[test]
fn touching_mru_changes_nothing() {
    let mut policy = LruPolicy::new(1, 4);
    for way in 0..4 {
        policy.update(0, way);
    }
    policy.update(0, 3);
    policy.update(0, 3);
    assert_eq!(policy.stack(0), &[3, 2, 1, 0]);
}

/// Direct-mapped: the only way is always the victim.
#[test]
fn single_way_victim_is_zero() {
    let mut policy = LruPolicy::new(8, 1);
    policy.update(5, 0);
    assert_eq!(policy.get_victim(5), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Sets and reset
// ══════════════════════════════════════════════════════════

#[test]
fn sets_are_independent() {
    let mut policy = LruPolicy::new(2, 2);
    policy.update(0, 1);
    assert_eq!(policy.get_victim(0), 0);
    assert_eq!(policy.get_victim(1), 1);
    assert_eq!(policy.stack(1), &[0, 1]);
}

#[test]
fn reset_restores_initial_order() {
    let mut policy = LruPolicy::new(3, 4);
    for set in 0..3 {
        for way in 0..4 {
            policy.update(set, way);
        }
    }
    policy.reset();
    for set in 0..3 {
        assert_eq!(policy.stack(set), &[0, 1, 2, 3]);
    }
}

/// The factory hands out a working LRU behind the trait object.
#[test]
fn build_returns_lru() {
    let mut policy = policies::build(PolicyType::Lru, 1, 2);
    policy.update(0, 0);
    policy.update(0, 1);
    policy.update(0, 0);
    assert_eq!(policy.get_victim(0), 1);
}
