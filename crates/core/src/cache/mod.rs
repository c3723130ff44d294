//! Set-Associative Cache Simulator.
//!
//! This module implements one configurable cache level and the hierarchy that
//! chains levels together in front of main memory. Each level tracks load and
//! store hits and misses; a miss at one level becomes a request of the same
//! kind at the next.

/// Multi-level hierarchy and the main-memory sink.
pub mod hierarchy;

/// Cache replacement policy implementations.
pub mod policies;

pub use hierarchy::{AccessOutcome, CacheHierarchy, HierarchyStats, MainMemory};

use self::policies::ReplacementPolicy;
use crate::common::data::AccessKind;
use crate::config::CacheGeometry;
use crate::stats::LevelStats;

/// Cache line entry containing tag and validity.
#[derive(Clone, Copy, Debug, Default)]
struct CacheLine {
    tag: u64,
    valid: bool,
}

/// One set-associative cache level.
///
/// Lines are stored as an arena of `sets * ways` entries; set `s` owns the
/// slice `[s * ways, (s + 1) * ways)`.
#[derive(Debug)]
pub struct CacheLevel {
    lines: Vec<CacheLine>,
    sets: usize,
    ways: usize,
    block_size: u64,
    policy: Box<dyn ReplacementPolicy>,
    stats: LevelStats,
}

impl CacheLevel {
    /// Creates an empty level from a validated geometry.
    pub fn new(geometry: &CacheGeometry) -> Self {
        Self {
            lines: vec![CacheLine::default(); geometry.sets * geometry.ways],
            sets: geometry.sets,
            ways: geometry.ways,
            block_size: geometry.block_size,
            policy: policies::build(geometry.policy, geometry.sets, geometry.ways),
            stats: LevelStats::new(geometry.name.clone()),
        }
    }

    /// Level name.
    pub fn name(&self) -> &str {
        &self.stats.name
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Block size in bytes.
    pub const fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Capacity in bytes.
    pub const fn capacity(&self) -> u64 {
        self.sets as u64 * self.ways as u64 * self.block_size
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &LevelStats {
        &self.stats
    }

    /// `(set_index, tag)` for `addr`.
    #[inline]
    const fn locate(&self, addr: u64) -> (usize, u64) {
        let block = addr / self.block_size;
        let sets = self.sets as u64;
        ((block % sets) as usize, block / sets)
    }

    /// Checks residency without touching counters or LRU state.
    pub fn contains(&self, addr: u64) -> bool {
        let (set, tag) = self.locate(addr);
        let base = set * self.ways;
        self.lines[base..base + self.ways]
            .iter()
            .any(|line| line.valid && line.tag == tag)
    }

    /// Services one request at this level and returns whether it hit.
    ///
    /// A hit promotes the line to MRU. A miss fills the first invalid way or,
    /// when the set is full, replaces the policy's victim; either way the block
    /// is resident afterwards (write-allocate for stores).
    pub fn access(&mut self, addr: u64, kind: AccessKind) -> bool {
        let (set, tag) = self.locate(addr);
        let base = set * self.ways;
        let slots = &self.lines[base..base + self.ways];

        let hit = if let Some(way) = slots.iter().position(|l| l.valid && l.tag == tag) {
            self.policy.update(set, way);
            true
        } else {
            let way = match slots.iter().position(|l| !l.valid) {
                Some(free) => free,
                None => {
                    let victim = self.policy.get_victim(set);
                    tracing::trace!(
                        level = %self.stats.name,
                        set,
                        way = victim,
                        evicted_tag = self.lines[base + victim].tag,
                        "evict"
                    );
                    victim
                }
            };
            self.lines[base + way] = CacheLine { tag, valid: true };
            self.policy.update(set, way);
            false
        };

        self.stats.record(kind, hit);
        hit
    }

    /// Invalidates every line and clears the counters.
    pub fn reset(&mut self) {
        self.lines.fill(CacheLine::default());
        self.policy.reset();
        self.stats.clear();
    }
}
