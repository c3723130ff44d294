//! Cache Replacement Policies.
//!
//! Selects victim lines in set-associative levels.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used.

/// Least Recently Used replacement policy.
pub mod lru;

use std::fmt;

pub use lru::LruPolicy;

use crate::config::ReplacementPolicy as PolicyType;

/// Trait for cache replacement policies.
///
/// Defines the interface for updating usage state and selecting victim lines.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Updates the policy state when `way` of `set` is accessed or filled.
    fn update(&mut self, set: usize, way: usize);

    /// Selects the way to evict from a full `set`.
    fn get_victim(&mut self, set: usize) -> usize;

    /// Returns every set to its initial state.
    fn reset(&mut self);
}

/// Builds the policy selected by configuration.
pub fn build(policy: PolicyType, sets: usize, ways: usize) -> Box<dyn ReplacementPolicy> {
    match policy {
        PolicyType::Lru => Box::new(LruPolicy::new(sets, ways)),
    }
}
